//! Error types for the Stash system.
//!
//! Uses `thiserror` for ergonomic error definition. Deserialization problems
//! are collected into an [`ErrorList`] so that one buffer can report several
//! of them at once; I/O failures and text parse failures are kept apart as
//! their own [`ErrorKind`]s.

use std::fmt;

use thiserror::Error;

/// The main error type for fallible Stash operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional description of what was being done, e.g. a file name.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a text parse error.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            line,
            message: message.into(),
        })
    }

    /// Returns the domain this error belongs to.
    #[must_use]
    pub fn domain(&self) -> ErrorDomain {
        match self.kind {
            ErrorKind::Deserialize(_) => ErrorDomain::Deserialize,
            ErrorKind::Io(_) => ErrorDomain::Io,
            ErrorKind::Parse { .. } => ErrorDomain::Text,
        }
    }

    /// Returns the deserialization errors, if this is a deserialization failure.
    #[must_use]
    pub fn deserialize_errors(&self) -> Option<&ErrorList> {
        match &self.kind {
            ErrorKind::Deserialize(list) => Some(list),
            _ => None,
        }
    }
}

impl From<ErrorList> for Error {
    fn from(list: ErrorList) -> Self {
        Self::new(ErrorKind::Deserialize(list))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The serialized data could not be turned back into an object.
    #[error("deserialization failed: {0}")]
    Deserialize(ErrorList),

    /// Reading from or writing to the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// A line of the text format could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

/// Broad class an error belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    /// Binary record content or framing.
    Deserialize,
    /// The underlying byte stream.
    Io,
    /// The line-oriented text format.
    Text,
}

/// Specific deserialization failure codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeserializeErrorCode {
    /// The data ended before the structure it announced.
    Truncated,
    /// Unconsumed bytes remain after the object.
    Padding,
    /// The data is structurally invalid: bad tags, bad strings, values
    /// violating an object's invariants.
    Invalid,
    /// The type name is unknown or not usable where it appears.
    ObjectType,
    /// An item was unexpected or had the wrong type and was ignored.
    Item,
    /// An item appeared more than once; the last occurrence was kept.
    Replaced,
    /// Objects are nested deeper than the configured limit.
    TooDeep,
}

impl DeserializeErrorCode {
    /// Returns true if an error with this code prevents the object from
    /// being constructed.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Item | Self::Replaced)
    }
}

impl fmt::Display for DeserializeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Truncated => "truncated",
            Self::Padding => "padding",
            Self::Invalid => "invalid",
            Self::ObjectType => "object-type",
            Self::Item => "item",
            Self::Replaced => "replaced",
            Self::TooDeep => "too-deep",
        };
        f.write_str(name)
    }
}

/// One deserialization problem.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeserializeError {
    /// What went wrong.
    pub code: DeserializeErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl DeserializeError {
    /// Creates a new deserialization error.
    #[must_use]
    pub fn new(code: DeserializeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this error prevents construction.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.code.is_fatal()
    }

    /// Deserialization errors always belong to [`ErrorDomain::Deserialize`].
    #[must_use]
    pub const fn domain(&self) -> ErrorDomain {
        ErrorDomain::Deserialize
    }
}

/// Accumulated deserialization errors, fatal and non-fatal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<DeserializeError>);

impl ErrorList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn push(&mut self, error: DeserializeError) {
        self.0.push(error);
    }

    /// Appends all errors of another list.
    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any error is fatal.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.0.iter().any(DeserializeError::is_fatal)
    }

    /// Returns true if any error has the given code.
    #[must_use]
    pub fn contains(&self, code: DeserializeErrorCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    /// Iterates over the errors in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &DeserializeError> {
        self.0.iter()
    }

    /// Returns the errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[DeserializeError] {
        &self.0
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no errors");
        }
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}

impl IntoIterator for ErrorList {
    type Item = DeserializeError;
    type IntoIter = std::vec::IntoIter<DeserializeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a DeserializeError;
    type IntoIter = std::slice::Iter<'a, DeserializeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<DeserializeError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = DeserializeError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
