//! Typed value cell stored at one key of a container.

use std::fmt;

use crate::boxed::{BoxedType, BoxedValue};
use crate::object::ObjectRef;
use crate::record::ItemValue;
use crate::types::ValueKind;

/// A typed container cell.
///
/// The variant fully determines the payload. Equality requires the same
/// variant and an equal payload: doubles compare bitwise, boxed values and
/// objects compare by content.
#[derive(Clone)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// 8-bit character.
    Char(u8),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Double(f64),
    /// Owned string.
    String(String),
    /// Owned boxed value.
    Boxed(BoxedValue),
    /// Shared object.
    Object(ObjectRef),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Boxed(_) => ValueKind::Boxed,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a character.
    #[must_use]
    pub const fn as_char(&self) -> Option<u8> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Attempts to extract a 32-bit integer.
    #[must_use]
    pub const fn as_int32(&self) -> Option<i32> {
        match self {
            Self::Int32(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a 64-bit integer.
    #[must_use]
    pub const fn as_int64(&self) -> Option<i64> {
        match self {
            Self::Int64(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a double.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(x) => Some(*x),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a boxed value.
    #[must_use]
    pub const fn as_boxed(&self) -> Option<&BoxedValue> {
        match self {
            Self::Boxed(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract a boxed value of a concrete type.
    #[must_use]
    pub fn as_boxed_type<T: BoxedType>(&self) -> Option<&T> {
        self.as_boxed().and_then(BoxedValue::downcast_ref::<T>)
    }

    /// Attempts to extract an object handle.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Deep copy: objects are duplicated rather than shared.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        match self {
            Self::Object(o) => Self::Object(o.duplicate()),
            other => other.clone(),
        }
    }

    /// Converts into the serialized item form.
    #[must_use]
    pub fn to_item_value(&self) -> ItemValue {
        match self {
            Self::Bool(b) => ItemValue::Bool(*b),
            Self::Char(c) => ItemValue::Char(*c),
            Self::Int32(n) => ItemValue::Int32(*n),
            Self::Int64(n) => ItemValue::Int64(*n),
            Self::Double(x) => ItemValue::Double(*x),
            Self::String(s) => ItemValue::String(s.clone()),
            Self::Boxed(b) => ItemValue::Object(b.to_record()),
            Self::Object(o) => ItemValue::Object(o.to_record()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boxed(a), Self::Boxed(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{:?}", char::from(*c)),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}q"),
            Self::Double(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boxed(b) => write!(f, "{b:?}"),
            Self::Object(o) => write!(f, "{o:?}"),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(c: u8) -> Self {
        Self::Char(c)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int32(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int64(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Double(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<BoxedValue> for Value {
    fn from(b: BoxedValue) -> Self {
        Self::Boxed(b)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}
