//! Observable hierarchical key/value container for Stash.
//!
//! This crate provides:
//! - [`Container`] - Typed cells addressed by interned paths such as `/0/data/title`
//! - [`Watch`] - Subscription filters: every change, one key, or a key prefix
//! - [`transfer`] - Copying subtrees between containers
//!
//! A container is itself a serializable object (`GwyContainer`), so
//! containers nest and go through the codec like any other object.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod container;
mod prefix;
mod serial;
pub mod transfer;
pub mod watch;

pub use container::Container;
pub use transfer::transfer;
pub use watch::Watch;
