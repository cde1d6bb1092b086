//! Configuration for decoding.

use stash_foundation::DEFAULT_MAX_DEPTH;

/// Limits and tolerances applied when decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Deepest allowed nesting of records inside records.
    pub max_depth: usize,

    /// Whether bytes after the top-level record are tolerated.
    ///
    /// When false they are a fatal padding error.
    pub allow_trailing: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: false,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration for untrusted input: shallow nesting only and
    /// no trailing bytes.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_depth: 16,
            allow_trailing: false,
        }
    }

    /// Creates a configuration that accepts deep nesting and trailing bytes,
    /// for reading one record out of a larger buffer.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_depth: 1024,
            allow_trailing: true,
        }
    }

    /// Builder method to set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to allow or reject trailing bytes.
    #[must_use]
    pub fn with_allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }
}
