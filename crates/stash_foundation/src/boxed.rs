//! Boxed values: small owned structs stored by value in container cells.
//!
//! Unlike objects, boxed values are never shared. Storing one copies it and
//! reading it back borrows the container's copy.

use std::fmt;

use crate::object::AsAny;
use crate::record::Record;
use crate::registry::FromRecord;

/// A plain value type that can be stored in a container cell.
pub trait BoxedType: FromRecord + Clone + PartialEq + fmt::Debug + 'static {
    /// Appends this value's items to `record`.
    fn itemize(&self, record: &mut Record);
}

trait ErasedBoxed: AsAny + fmt::Debug {
    fn type_name(&self) -> &'static str;
    fn clone_box(&self) -> Box<dyn ErasedBoxed>;
    fn eq_box(&self, other: &dyn ErasedBoxed) -> bool;
    fn itemize_box(&self, record: &mut Record);
}

impl<T: BoxedType> ErasedBoxed for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn clone_box(&self) -> Box<dyn ErasedBoxed> {
        Box::new(self.clone())
    }

    fn eq_box(&self, other: &dyn ErasedBoxed) -> bool {
        AsAny::as_any(other)
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn itemize_box(&self, record: &mut Record) {
        self.itemize(record);
    }
}

/// Type-erased owned boxed value.
pub struct BoxedValue(Box<dyn ErasedBoxed>);

impl BoxedValue {
    /// Boxes a value.
    #[must_use]
    pub fn new<T: BoxedType>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Returns the registered type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Attempts to view the value as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: BoxedType>(&self) -> Option<&T> {
        AsAny::as_any(&*self.0).downcast_ref::<T>()
    }

    /// Flattens the value into a record.
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(self.type_name());
        self.0.itemize_box(&mut record);
        record
    }
}

impl Clone for BoxedValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl PartialEq for BoxedValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_box(&*other.0)
    }
}

impl fmt::Debug for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
