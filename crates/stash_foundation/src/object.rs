//! Shared, serializable objects.
//!
//! Objects are polymorphic values that can be stored in containers, shared
//! between several owners, duplicated deeply and flattened into a
//! [`Record`] for serialization.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::record::Record;

/// Upcasting helper for downcasting trait objects.
///
/// Implemented for every `'static` type; call it as `AsAny::as_any(x)` on
/// trait objects so the vtable entry is used rather than the blanket impl
/// for the reference type.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Converts a shared pointer into `Rc<dyn Any>`.
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// An object that can live in a container and go through the codec.
pub trait Serializable: AsAny + fmt::Debug {
    /// Registered type name written to the wire.
    fn type_name(&self) -> &'static str;

    /// Appends this object's items to `record`.
    fn itemize(&self, record: &mut Record);

    /// Creates an independent deep copy.
    fn duplicate(&self) -> ObjectRef;

    /// Deep, content-based equality with another object.
    fn structurally_eq(&self, other: &dyn Serializable) -> bool;

    /// Flattens this object into a record.
    fn to_record(&self) -> Record {
        let mut record = Record::new(self.type_name());
        self.itemize(&mut record);
        record
    }
}

impl dyn Serializable {
    /// Attempts to view this object as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    /// Returns true if the concrete type is `T`.
    #[must_use]
    pub fn is<T: Serializable>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }
}

/// Implements [`Serializable::structurally_eq`] through `PartialEq`.
#[must_use]
pub fn eq_by_value<T: Serializable + PartialEq>(this: &T, other: &dyn Serializable) -> bool {
    other.downcast_ref::<T>().is_some_and(|other| this == other)
}

/// Reference-counted handle to a serializable object.
///
/// Cloning the handle shares the object; [`ObjectRef::duplicate`] copies it.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Serializable>);

impl ObjectRef {
    /// Wraps a new object.
    #[must_use]
    pub fn new<T: Serializable>(object: T) -> Self {
        Self(Rc::new(object))
    }

    /// Wraps an already shared object without copying it.
    #[must_use]
    pub fn from_rc<T: Serializable>(object: Rc<T>) -> Self {
        Self(object)
    }

    /// Returns the number of handles sharing the object.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Returns true if both handles point to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the object's registered type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Borrows the object.
    #[must_use]
    pub fn get(&self) -> &dyn Serializable {
        &*self.0
    }

    /// Attempts to view the object as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.get().downcast_ref::<T>()
    }

    /// Converts into a typed shared pointer, or gives the handle back.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if the object is not a `T`.
    pub fn downcast<T: Serializable>(self) -> Result<Rc<T>, Self> {
        if !self.get().is::<T>() {
            return Err(self);
        }
        match AsAny::into_any_rc(self.0).downcast::<T>() {
            Ok(object) => Ok(object),
            Err(_) => unreachable!("concrete type was checked before downcasting"),
        }
    }

    /// Takes the object out if this is the only handle to it.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if the object is not a `T` or is shared.
    pub fn try_unwrap<T: Serializable>(self) -> Result<T, Self> {
        let object = self.downcast::<T>()?;
        Rc::try_unwrap(object).map_err(Self::from_rc)
    }

    /// Creates an independent deep copy of the object.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.0.duplicate()
    }

    /// Flattens the object into a record.
    #[must_use]
    pub fn to_record(&self) -> Record {
        self.0.to_record()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.structurally_eq(other.get())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
