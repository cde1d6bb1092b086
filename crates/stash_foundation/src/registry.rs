//! Construction of objects and boxed values from records.
//!
//! A [`TypeRegistry`] maps wire type names to constructors. Constructors
//! run inside a [`DeserializeContext`], which collects errors instead of
//! stopping at the first one and limits how deeply records may nest.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::boxed::{BoxedType, BoxedValue};
use crate::error::{DeserializeError, DeserializeErrorCode, ErrorList};
use crate::object::{ObjectRef, Serializable};
use crate::record::Record;
use crate::types::ItemKind;

/// Default limit on record nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A type that can be rebuilt from its [`Record`].
pub trait FromRecord: Sized {
    /// Type name expected in the record.
    const TYPE_NAME: &'static str;

    /// Builds a value from its items.
    ///
    /// Problems are reported through `ctx`; returning `None` means the value
    /// could not be built and at least one fatal error was recorded.
    fn from_record(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Self>;
}

/// Result of constructing a record through the registry.
#[derive(Clone, Debug, PartialEq)]
pub enum Constructed {
    /// A shared object.
    Object(ObjectRef),
    /// An owned boxed value.
    Boxed(BoxedValue),
}

type Constructor = fn(Record, &mut DeserializeContext<'_>) -> Option<Constructed>;

/// Whether a registered type is an object or a boxed type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeClass {
    /// Shared object.
    Object,
    /// Owned boxed value.
    Boxed,
}

#[derive(Clone, Copy)]
struct Entry {
    class: TypeClass,
    construct: Constructor,
}

fn construct_object<T>(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Constructed>
where
    T: Serializable + FromRecord,
{
    T::from_record(record, ctx).map(|object| Constructed::Object(ObjectRef::new(object)))
}

fn construct_boxed<T: BoxedType>(
    record: Record,
    ctx: &mut DeserializeContext<'_>,
) -> Option<Constructed> {
    T::from_record(record, ctx).map(|value| Constructed::Boxed(BoxedValue::new(value)))
}

/// Map from type names to constructors.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, Entry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object type. Re-registering a name replaces it.
    pub fn register_object<T: Serializable + FromRecord>(&mut self) -> &mut Self {
        self.entries.insert(
            T::TYPE_NAME,
            Entry {
                class: TypeClass::Object,
                construct: construct_object::<T>,
            },
        );
        self
    }

    /// Registers a boxed type. Re-registering a name replaces it.
    pub fn register_boxed<T: BoxedType>(&mut self) -> &mut Self {
        self.entries.insert(
            T::TYPE_NAME,
            Entry {
                class: TypeClass::Boxed,
                construct: construct_boxed::<T>,
            },
        );
        self
    }

    /// Returns the class of a registered type name.
    #[must_use]
    pub fn class_of(&self, type_name: &str) -> Option<TypeClass> {
        self.entries.get(type_name).map(|entry| entry.class)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

/// State shared by all constructors during one deserialization.
#[derive(Debug)]
pub struct DeserializeContext<'a> {
    registry: &'a TypeRegistry,
    errors: ErrorList,
    depth: usize,
    max_depth: usize,
}

impl<'a> DeserializeContext<'a> {
    /// Creates a context with the default nesting limit.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self::with_max_depth(registry, DEFAULT_MAX_DEPTH)
    }

    /// Creates a context with an explicit nesting limit.
    #[must_use]
    pub fn with_max_depth(registry: &'a TypeRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            errors: ErrorList::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Returns the registry constructors are looked up in.
    #[must_use]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Records an error.
    pub fn report(&mut self, code: DeserializeErrorCode, message: impl Into<String>) {
        let error = DeserializeError::new(code, message);
        if !error.is_fatal() {
            warn!(code = %error.code, "{}", error.message);
        }
        self.errors.push(error);
    }

    /// Records a non-fatal error about an item the type does not understand.
    pub fn unexpected_item(&mut self, type_name: &str, name: &str, kind: ItemKind) {
        self.report(
            DeserializeErrorCode::Item,
            format!(
                "Unexpected item `{name}` of type {kind} in the representation of {type_name} was ignored."
            ),
        );
    }

    /// Returns the errors collected so far.
    #[must_use]
    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    /// Consumes the context, returning the collected errors.
    #[must_use]
    pub fn into_errors(self) -> ErrorList {
        self.errors
    }

    /// Returns true if a fatal error has been recorded.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.errors.has_fatal()
    }

    /// Builds a record through the registry.
    ///
    /// Unknown type names and nesting beyond the limit are fatal errors.
    pub fn construct(&mut self, record: Record) -> Option<Constructed> {
        let Some(entry) = self.registry.entries.get(record.type_name.as_str()).copied() else {
            self.report(
                DeserializeErrorCode::ObjectType,
                format!("Type `{}` is not a registered serializable type.", record.type_name),
            );
            return None;
        };
        if self.depth >= self.max_depth {
            self.report(
                DeserializeErrorCode::TooDeep,
                format!("Objects are nested deeper than {} levels.", self.max_depth),
            );
            return None;
        }

        self.depth += 1;
        let constructed = (entry.construct)(record, self);
        self.depth -= 1;
        constructed
    }

    /// Builds a record that must produce an object.
    pub fn construct_object(&mut self, record: Record) -> Option<ObjectRef> {
        let type_name = record.type_name.clone();
        match self.construct(record)? {
            Constructed::Object(object) => Some(object),
            Constructed::Boxed(_) => {
                self.report(
                    DeserializeErrorCode::ObjectType,
                    format!("Type `{type_name}` is a boxed type, not an object type."),
                );
                None
            }
        }
    }
}
