//! Type tags for container cells and serialized items.

use std::fmt;

/// The kind of payload held by a [`crate::Value`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean.
    Bool,
    /// 8-bit character.
    Char,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Double,
    /// Owned string.
    String,
    /// Owned boxed value of a registered boxed type.
    Boxed,
    /// Shared handle to a serializable object.
    Object,
}

impl ValueKind {
    /// Returns true for the kinds that round-trip through plain text
    /// without an embedded binary record.
    #[must_use]
    pub const fn is_atomic(self) -> bool {
        !matches!(self, Self::Boxed | Self::Object)
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::String => "string",
            Self::Boxed => "boxed",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The kind of a serialized item, identified on the wire by a one-byte tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// `b`: boolean stored as one byte.
    Bool,
    /// `c`: one byte.
    Char,
    /// `i`: little-endian `i32`.
    Int32,
    /// `q`: little-endian `i64`.
    Int64,
    /// `d`: little-endian IEEE 754 double.
    Double,
    /// `s`: NUL-terminated string.
    String,
    /// `o`: nested record.
    Object,
    /// `B`: array of booleans.
    BoolArray,
    /// `C`: array of bytes.
    CharArray,
    /// `I`: array of `i32`.
    Int32Array,
    /// `Q`: array of `i64`.
    Int64Array,
    /// `D`: array of doubles.
    DoubleArray,
    /// `S`: array of strings.
    StringArray,
    /// `O`: array of nested records.
    ObjectArray,
}

impl ItemKind {
    /// All kinds, in tag order.
    pub const ALL: [ItemKind; 14] = [
        Self::Bool,
        Self::Char,
        Self::Int32,
        Self::Int64,
        Self::Double,
        Self::String,
        Self::Object,
        Self::BoolArray,
        Self::CharArray,
        Self::Int32Array,
        Self::Int64Array,
        Self::DoubleArray,
        Self::StringArray,
        Self::ObjectArray,
    ];

    /// Returns the wire tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Bool => b'b',
            Self::Char => b'c',
            Self::Int32 => b'i',
            Self::Int64 => b'q',
            Self::Double => b'd',
            Self::String => b's',
            Self::Object => b'o',
            Self::BoolArray => b'B',
            Self::CharArray => b'C',
            Self::Int32Array => b'I',
            Self::Int64Array => b'Q',
            Self::DoubleArray => b'D',
            Self::StringArray => b'S',
            Self::ObjectArray => b'O',
        }
    }

    /// Decodes a wire tag byte.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns true for array kinds.
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            Self::BoolArray
                | Self::CharArray
                | Self::Int32Array
                | Self::Int64Array
                | Self::DoubleArray
                | Self::StringArray
                | Self::ObjectArray
        )
    }

    /// Returns the element kind of an array kind, or `self` for scalars.
    #[must_use]
    pub const fn element(self) -> Self {
        match self {
            Self::BoolArray => Self::Bool,
            Self::CharArray => Self::Char,
            Self::Int32Array => Self::Int32,
            Self::Int64Array => Self::Int64,
            Self::DoubleArray => Self::Double,
            Self::StringArray => Self::String,
            Self::ObjectArray => Self::Object,
            scalar => scalar,
        }
    }

    /// Byte width of one element, for fixed-size kinds.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self.element() {
            Self::Bool | Self::Char => Some(1),
            Self::Int32 => Some(4),
            Self::Int64 | Self::Double => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Char => "char",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::String => "string",
            Self::Object => "object",
            Self::BoolArray => "boolean array",
            Self::CharArray => "char array",
            Self::Int32Array => "int32 array",
            Self::Int64Array => "int64 array",
            Self::DoubleArray => "double array",
            Self::StringArray => "string array",
            Self::ObjectArray => "object array",
        };
        f.write_str(name)
    }
}
