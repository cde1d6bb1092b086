//! Subscription filters for container change notification.

use stash_foundation::{IntoKey, Key};

use crate::prefix;

/// Which changes a container subscriber is told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Watch {
    /// Every change.
    All,
    /// Changes to exactly this key.
    Key(Key),
    /// Changes to keys equal to this prefix or below it.
    Prefix(String),
}

impl Watch {
    /// Watches a single key or path, interning the path.
    pub fn key(key: impl IntoKey) -> Self {
        Self::Key(key.into_key())
    }

    /// Watches a prefix.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Returns true if a change at `key` is of interest. `path` resolves
    /// the key's name and is only called for prefix watches.
    pub(crate) fn matches(&self, key: Key, path: impl FnOnce() -> std::sync::Arc<str>) -> bool {
        match self {
            Self::All => true,
            Self::Key(watched) => *watched == key,
            Self::Prefix(watched) => prefix::matches(&path(), watched),
        }
    }
}

impl From<Key> for Watch {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}
