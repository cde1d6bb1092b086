//! The serialized form of an object: a named record of typed items.
//!
//! Objects flatten themselves into a [`Record`] (see
//! [`crate::Serializable::itemize`]); the codec turns records into bytes and
//! back. Keeping the two steps apart lets framing errors and content errors
//! be reported separately.

use crate::types::ItemKind;

/// A serialized object: its type name and its items, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Registered type name, e.g. `GwyContainer`.
    pub type_name: String,
    /// Items in serialization order.
    pub items: Vec<Item>,
}

/// One named, typed value inside a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Item name.
    pub name: String,
    /// Item payload.
    pub value: ItemValue,
}

/// Payload of an [`Item`].
#[derive(Clone, Debug, PartialEq)]
pub enum ItemValue {
    /// Boolean.
    Bool(bool),
    /// Single byte.
    Char(u8),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Double.
    Double(f64),
    /// String.
    String(String),
    /// Nested record.
    Object(Record),
    /// Array of booleans.
    BoolArray(Vec<bool>),
    /// Array of bytes.
    CharArray(Vec<u8>),
    /// Array of 32-bit integers.
    Int32Array(Vec<i32>),
    /// Array of 64-bit integers.
    Int64Array(Vec<i64>),
    /// Array of doubles.
    DoubleArray(Vec<f64>),
    /// Array of strings.
    StringArray(Vec<String>),
    /// Array of nested records.
    ObjectArray(Vec<Record>),
}

impl ItemValue {
    /// Returns the wire kind of this payload.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Bool(_) => ItemKind::Bool,
            Self::Char(_) => ItemKind::Char,
            Self::Int32(_) => ItemKind::Int32,
            Self::Int64(_) => ItemKind::Int64,
            Self::Double(_) => ItemKind::Double,
            Self::String(_) => ItemKind::String,
            Self::Object(_) => ItemKind::Object,
            Self::BoolArray(_) => ItemKind::BoolArray,
            Self::CharArray(_) => ItemKind::CharArray,
            Self::Int32Array(_) => ItemKind::Int32Array,
            Self::Int64Array(_) => ItemKind::Int64Array,
            Self::DoubleArray(_) => ItemKind::DoubleArray,
            Self::StringArray(_) => ItemKind::StringArray,
            Self::ObjectArray(_) => ItemKind::ObjectArray,
        }
    }
}

impl Record {
    /// Creates a record with no items.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            items: Vec::new(),
        }
    }

    /// Appends an item.
    pub fn push(&mut self, name: impl Into<String>, value: ItemValue) {
        self.items.push(Item {
            name: name.into(),
            value,
        });
    }

    /// Builder variant of [`Record::push`].
    #[must_use]
    pub fn with_item(mut self, name: impl Into<String>, value: ItemValue) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the first item with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ItemValue> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map(|item| &item.value)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the record has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
