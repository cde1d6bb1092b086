//! Integer range set for Stash.
//!
//! [`IntSet`] stores sparse integer membership as a sorted list of closed,
//! disjoint, non-adjacent [`IntRange`]s and reports every change to its
//! subscribers. It is a serializable object (`GwyIntSet`), so it can be
//! stored in a container and written by the codec.
//!
//! With the `serde` feature, [`IntSet`] and [`IntRange`] also implement
//! serde's traits; deserialization validates the canonical form.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod range;
mod serial;
pub mod set;

pub use range::{IntRange, RangesError};
pub use set::{IntSet, IntSetEvent, IntSetIter};
