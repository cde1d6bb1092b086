//! Key registry, typed values, serializable objects and errors for Stash.
//!
//! This crate provides:
//! - [`Key`] and [`KeyRegistry`] - Interned hierarchical path strings
//! - [`Value`] - The typed cell stored at one container key
//! - [`Serializable`], [`ObjectRef`], [`BoxedValue`] - Shared objects and boxed values
//! - [`Record`] - The serialized form every object flattens into
//! - [`TypeRegistry`] - Constructors for rebuilding objects from records
//! - [`Error`], [`ErrorList`] - Error types
//! - [`Subscribers`] - Plumbing for synchronous change notification

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod boxed;
pub mod error;
pub mod intern;
pub mod object;
pub mod record;
pub mod registry;
pub mod rgba;
pub mod signal;
pub mod types;
pub mod unit;
pub mod value;

pub use boxed::{BoxedType, BoxedValue};
pub use error::{
    DeserializeError, DeserializeErrorCode, Error, ErrorDomain, ErrorKind, ErrorList,
};
pub use intern::{IntoKey, Key, KeyRegistry, intern, try_lookup};
pub use object::{AsAny, ObjectRef, Serializable, eq_by_value};
pub use record::{Item, ItemValue, Record};
pub use registry::{
    Constructed, DEFAULT_MAX_DEPTH, DeserializeContext, FromRecord, TypeClass, TypeRegistry,
};
pub use rgba::Rgba;
pub use signal::{SubscriptionId, Subscribers};
pub use types::{ItemKind, ValueKind};
pub use unit::Unit;
pub use value::Value;

/// Result type for Stash operations.
pub type Result<T> = std::result::Result<T, Error>;
