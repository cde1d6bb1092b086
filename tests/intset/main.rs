//! Integration tests for Layer 1: Integer range set
//!
//! Tests canonical form, single-value and bulk mutation, notification
//! shapes, the iterator protocol and randomized operation sequences.

mod notifications;
mod operations;
mod random;
