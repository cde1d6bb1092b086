//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Key, Value, the object model and errors.

mod errors;
