//! Integration tests for Layer 2: Codecs
//!
//! Tests the binary object format, the text container dump and the
//! built-in type registry working together.

mod binary;
mod text;
