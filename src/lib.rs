//! Stash - Observable hierarchical data storage
//!
//! This crate re-exports all layers of the Stash system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: stash_codec      — Binary and text formats, builtin type registry
//! Layer 1: stash_container  — Path-keyed typed container with change notification
//!          stash_intset     — Integer range set
//! Layer 0: stash_foundation — Keys, values, object model, errors
//! ```

pub use stash_codec as codec;
pub use stash_container as container;
pub use stash_foundation as foundation;
pub use stash_intset as intset;
