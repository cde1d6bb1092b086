//! Interning of hierarchical path strings into keys.
//!
//! Paths such as `/0/data/title` are interned into [`Key`]s so that cells
//! can be stored and compared by a small integer. The registry is
//! append-only: a key, once handed out, names the same string for the
//! lifetime of the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Interned path identifier.
///
/// Two keys are equal iff the strings they were interned from are
/// byte-equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Key(pub(crate) u32);

impl Key {
    /// Returns the raw index of this key.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the path this key was interned from.
    ///
    /// # Panics
    ///
    /// Panics if the key was not produced by [`KeyRegistry::global`].
    #[must_use]
    #[track_caller]
    pub fn name(self) -> Arc<str> {
        match KeyRegistry::with_global(|registry| registry.resolve(self)) {
            Some(name) => name,
            None => panic!("{self:?} was never interned by the global key registry"),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Bidirectional mapping between path strings and [`Key`]s.
///
/// A registry on its own is not thread-safe; the process-wide instance
/// returned by [`KeyRegistry::global`] is guarded by an `RwLock`.
#[derive(Clone, Debug, Default)]
pub struct KeyRegistry {
    /// String storage, indexed by key.
    strings: Vec<Arc<str>>,
    /// Map from string to key.
    index: HashMap<Arc<str>, Key>,
}

static GLOBAL: OnceLock<RwLock<KeyRegistry>> = OnceLock::new();

impl KeyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry used by containers.
    pub fn global() -> &'static RwLock<KeyRegistry> {
        GLOBAL.get_or_init(|| RwLock::new(KeyRegistry::new()))
    }

    /// Runs `f` with shared access to the global registry.
    pub fn with_global<R>(f: impl FnOnce(&KeyRegistry) -> R) -> R {
        let guard = Self::global()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Interns a path, returning its [`Key`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned paths exceeds `u32::MAX`.
    pub fn intern(&mut self, path: &str) -> Key {
        if let Some(&key) = self.index.get(path) {
            return key;
        }

        let key = Key(u32::try_from(self.strings.len()).expect("too many interned keys"));
        let arc: Arc<str> = path.into();
        self.strings.push(arc.clone());
        self.index.insert(arc, key);
        key
    }

    /// Looks up a path without interning it.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Key> {
        self.index.get(path).copied()
    }

    /// Gets the path for a key.
    #[must_use]
    pub fn resolve(&self, key: Key) -> Option<Arc<str>> {
        self.strings.get(key.0 as usize).cloned()
    }

    /// Returns the number of interned paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Interns `path` in the global registry.
pub fn intern(path: &str) -> Key {
    if let Some(key) = try_lookup(path) {
        return key;
    }
    KeyRegistry::global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .intern(path)
}

/// Looks `path` up in the global registry without interning it.
#[must_use]
pub fn try_lookup(path: &str) -> Option<Key> {
    KeyRegistry::with_global(|registry| registry.lookup(path))
}

/// Anything that can address a container cell: a [`Key`] or a path string.
///
/// Writing operations call [`IntoKey::into_key`], which interns; reading
/// operations call [`IntoKey::lookup_key`], which never grows the registry.
pub trait IntoKey {
    /// Converts into a key, interning the path if necessary.
    fn into_key(self) -> Key;

    /// Converts into a key only if the path is already interned.
    fn lookup_key(self) -> Option<Key>;
}

impl IntoKey for Key {
    fn into_key(self) -> Key {
        self
    }

    fn lookup_key(self) -> Option<Key> {
        Some(self)
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Key {
        intern(self)
    }

    fn lookup_key(self) -> Option<Key> {
        try_lookup(self)
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Key {
        intern(self)
    }

    fn lookup_key(self) -> Option<Key> {
        try_lookup(self)
    }
}

impl IntoKey for String {
    fn into_key(self) -> Key {
        intern(&self)
    }

    fn lookup_key(self) -> Option<Key> {
        try_lookup(&self)
    }
}

impl IntoKey for &Arc<str> {
    fn into_key(self) -> Key {
        intern(self)
    }

    fn lookup_key(self) -> Option<Key> {
        try_lookup(self)
    }
}
