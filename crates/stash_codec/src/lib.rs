//! Binary and text serialization for Stash.
//!
//! This crate provides:
//! - [`binary`] - The length-prefixed, tagged binary format for any serializable object
//! - [`text`] - A line-per-cell text dump of a container
//! - [`CodecConfig`] - Decoding limits
//! - [`builtin_registry`] - A type registry with every type this workspace defines
//!
//! # Example
//!
//! ```
//! use stash_codec::{builtin_registry, from_bytes, to_bytes};
//! use stash_container::Container;
//!
//! let mut container = Container::new();
//! container.set_string("/0/data/title", "Mud");
//!
//! let bytes = to_bytes(&container);
//! let decoded = from_bytes(&bytes, &builtin_registry()).unwrap();
//! assert_eq!(decoded.consumed, bytes.len());
//! assert_eq!(decoded.object.downcast_ref::<Container>(), Some(&container));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binary;
pub mod config;
pub mod registry;
pub mod text;

pub use binary::{
    Deserialized, decode_record, encode_record, from_bytes, from_bytes_with, read_from, to_bytes,
    write_to,
};
pub use config::CodecConfig;
pub use registry::builtin_registry;
pub use text::{from_text, load_text_into, to_text};
