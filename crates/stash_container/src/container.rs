//! The container: typed cells addressed by interned hierarchical paths.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use stash_foundation::{
    BoxedType, BoxedValue, IntoKey, Key, ObjectRef, SubscriptionId, Subscribers, Value, ValueKind,
};
use tracing::{debug, trace};

use crate::prefix;
use crate::watch::Watch;

type Callback = Box<dyn FnMut(&Container, Key)>;

struct Watcher {
    watch: Watch,
    callback: Callback,
}

/// Sparse store of typed values keyed by hierarchical paths such as
/// `/0/data/title`.
///
/// Every operation accepts either a [`Key`] or a path string. Writing
/// operations intern paths; reading operations never do, so probing for a
/// path that was never stored does not grow the key registry.
///
/// Cells iterate in insertion order. Equality compares the set of
/// `(key, value)` pairs and ignores order.
///
/// # Notification
///
/// Subscribers registered with [`Container::connect`] are called after a
/// mutation has fully taken effect, once per changed key. Setting a value
/// equal to the stored one is not a change. Handlers receive the container
/// by shared reference and cannot mutate it.
#[derive(Default)]
pub struct Container {
    cells: IndexMap<Key, Value>,
    watchers: Subscribers<Watcher>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the container holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if a cell exists at `key`.
    #[must_use]
    pub fn contains(&self, key: impl IntoKey) -> bool {
        key.lookup_key()
            .is_some_and(|key| self.cells.contains_key(&key))
    }

    /// Returns the cell at `key`.
    #[must_use]
    pub fn value(&self, key: impl IntoKey) -> Option<&Value> {
        self.cells.get(&key.lookup_key()?)
    }

    /// Returns the kind of the cell at `key`.
    #[must_use]
    pub fn value_kind(&self, key: impl IntoKey) -> Option<ValueKind> {
        self.value(key).map(Value::kind)
    }

    // Setters

    /// Stores `value` at `key`, replacing any previous cell of any kind.
    ///
    /// Returns false, keeping the existing cell and notifying nobody, if an
    /// equal value is already stored there.
    pub fn set_value(&mut self, key: impl IntoKey, value: Value) -> bool {
        let key = key.into_key();
        self.store(key, value)
    }

    pub(crate) fn store(&mut self, key: Key, value: Value) -> bool {
        match self.cells.get_mut(&key) {
            Some(cell) if *cell == value => return false,
            Some(cell) => *cell = value,
            None => {
                self.cells.insert(key, value);
            }
        }
        self.emit(key);
        true
    }

    /// Stores a boolean.
    pub fn set_bool(&mut self, key: impl IntoKey, value: bool) {
        self.set_value(key, Value::Bool(value));
    }

    /// Stores a character.
    pub fn set_char(&mut self, key: impl IntoKey, value: u8) {
        self.set_value(key, Value::Char(value));
    }

    /// Stores a 32-bit integer.
    pub fn set_int32(&mut self, key: impl IntoKey, value: i32) {
        self.set_value(key, Value::Int32(value));
    }

    /// Stores a 64-bit integer.
    pub fn set_int64(&mut self, key: impl IntoKey, value: i64) {
        self.set_value(key, Value::Int64(value));
    }

    /// Stores a double.
    pub fn set_double(&mut self, key: impl IntoKey, value: f64) {
        self.set_value(key, Value::Double(value));
    }

    /// Stores a copy of a string.
    pub fn set_string(&mut self, key: impl IntoKey, value: &str) {
        self.set_value(key, Value::String(value.to_owned()));
    }

    /// Stores a boxed value.
    pub fn set_boxed<T: BoxedType>(&mut self, key: impl IntoKey, value: T) {
        self.set_value(key, Value::Boxed(BoxedValue::new(value)));
    }

    /// Stores a new reference to a shared object.
    pub fn set_object(&mut self, key: impl IntoKey, object: &ObjectRef) {
        self.set_value(key, Value::Object(object.clone()));
    }

    /// Moves a string into the container.
    pub fn take_string(&mut self, key: impl IntoKey, value: String) {
        self.set_value(key, Value::String(value));
    }

    /// Moves a boxed value into the container.
    pub fn take_boxed(&mut self, key: impl IntoKey, value: BoxedValue) {
        self.set_value(key, Value::Boxed(value));
    }

    /// Moves an object reference into the container without adding a
    /// reference of its own.
    pub fn take_object(&mut self, key: impl IntoKey, object: ObjectRef) {
        self.set_value(key, Value::Object(object));
    }

    // Getters

    #[track_caller]
    fn expect<'a, T>(
        &'a self,
        key: impl IntoKey,
        expected: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> T {
        let Some(key) = key.lookup_key() else {
            panic!("container has no {expected} value at a path that was never interned");
        };
        let Some(value) = self.cells.get(&key) else {
            panic!("container has no {expected} value at `{}`", key.name());
        };
        match extract(value) {
            Some(extracted) => extracted,
            None => panic!(
                "container value at `{}` is {}, not {expected}",
                key.name(),
                describe(value)
            ),
        }
    }

    /// Returns the boolean at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no boolean at `key`; use [`Container::gis_bool`]
    /// when absence is expected.
    #[must_use]
    #[track_caller]
    pub fn get_bool(&self, key: impl IntoKey) -> bool {
        self.expect(key, "bool", Value::as_bool)
    }

    /// Returns the character at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no character at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_char(&self, key: impl IntoKey) -> u8 {
        self.expect(key, "char", Value::as_char)
    }

    /// Returns the 32-bit integer at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no 32-bit integer at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_int32(&self, key: impl IntoKey) -> i32 {
        self.expect(key, "int32", Value::as_int32)
    }

    /// Returns the 64-bit integer at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no 64-bit integer at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_int64(&self, key: impl IntoKey) -> i64 {
        self.expect(key, "int64", Value::as_int64)
    }

    /// Returns the double at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no double at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_double(&self, key: impl IntoKey) -> f64 {
        self.expect(key, "double", Value::as_double)
    }

    /// Borrows the string at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no string at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_string(&self, key: impl IntoKey) -> &str {
        self.expect(key, "string", Value::as_str)
    }

    /// Borrows the boxed value of type `T` at `key`.
    ///
    /// # Panics
    ///
    /// Panics if there is no `T` at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_boxed<T: BoxedType>(&self, key: impl IntoKey) -> &T {
        self.expect(key, T::TYPE_NAME, Value::as_boxed_type::<T>)
    }

    /// Borrows the object handle at `key`. Clone it to keep a reference.
    ///
    /// # Panics
    ///
    /// Panics if there is no object at `key`.
    #[must_use]
    #[track_caller]
    pub fn get_object(&self, key: impl IntoKey) -> &ObjectRef {
        self.expect(key, "object", Value::as_object)
    }

    fn gis<'a, T>(
        &'a self,
        key: impl IntoKey,
        out: &mut T,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> bool {
        match self.value(key).and_then(extract) {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Reads a boolean into `out` if one is stored at `key`.
    pub fn gis_bool(&self, key: impl IntoKey, out: &mut bool) -> bool {
        self.gis(key, out, Value::as_bool)
    }

    /// Reads a character into `out` if one is stored at `key`.
    pub fn gis_char(&self, key: impl IntoKey, out: &mut u8) -> bool {
        self.gis(key, out, Value::as_char)
    }

    /// Reads a 32-bit integer into `out` if one is stored at `key`.
    pub fn gis_int32(&self, key: impl IntoKey, out: &mut i32) -> bool {
        self.gis(key, out, Value::as_int32)
    }

    /// Reads a 64-bit integer into `out` if one is stored at `key`.
    pub fn gis_int64(&self, key: impl IntoKey, out: &mut i64) -> bool {
        self.gis(key, out, Value::as_int64)
    }

    /// Reads a double into `out` if one is stored at `key`.
    pub fn gis_double(&self, key: impl IntoKey, out: &mut f64) -> bool {
        self.gis(key, out, Value::as_double)
    }

    /// Copies a string into `out` if one is stored at `key`.
    pub fn gis_string(&self, key: impl IntoKey, out: &mut String) -> bool {
        self.gis(key, out, |value| value.as_str().map(str::to_owned))
    }

    /// Copies a boxed value of type `T` into `out` if one is stored at `key`.
    pub fn gis_boxed<T: BoxedType>(&self, key: impl IntoKey, out: &mut T) -> bool {
        self.gis(key, out, |value| value.as_boxed_type::<T>().cloned())
    }

    /// Puts a new reference to the object at `key` into `out` if there is
    /// one.
    pub fn gis_object(&self, key: impl IntoKey, out: &mut Option<ObjectRef>) -> bool {
        self.gis(key, out, |value| value.as_object().map(|o| Some(o.clone())))
    }

    // Removal and renaming

    /// Removes the cell at `key`. Returns false if there was none.
    pub fn remove(&mut self, key: impl IntoKey) -> bool {
        let Some(key) = key.lookup_key() else {
            return false;
        };
        if self.cells.shift_remove(&key).is_none() {
            return false;
        }
        self.emit(key);
        true
    }

    /// Removes every cell at or below `prefix`, or every cell for `None` or
    /// an empty prefix. Returns the number of cells removed.
    ///
    /// Subscribers are notified once per removed key, in insertion order,
    /// after all the cells are gone.
    pub fn remove_prefix(&mut self, prefix: Option<&str>) -> usize {
        let prefix = prefix.map_or("", prefix::normalize);
        let removed: Vec<Key> = if prefix.is_empty() {
            self.cells.drain(..).map(|(key, _)| key).collect()
        } else {
            let mut removed = Vec::new();
            self.cells.retain(|&key, _| {
                if prefix::matches(&key.name(), prefix) {
                    removed.push(key);
                    false
                } else {
                    true
                }
            });
            removed
        };

        debug!(prefix, count = removed.len(), "removed container cells");
        for &key in &removed {
            self.emit(key);
        }
        removed.len()
    }

    /// Removes every cell. Returns the number of cells removed.
    pub fn clear(&mut self) -> usize {
        self.remove_prefix(None)
    }

    /// Moves the cell at `old` to `new`.
    ///
    /// Fails without changing anything if `old` holds nothing, or if `new`
    /// is occupied and `force` is false. A forced rename onto an occupied
    /// key replaces that cell in place; otherwise the cell moves to the end
    /// of the iteration order. Subscribers are told about `new` only.
    ///
    /// Renaming a key to itself succeeds iff the key is present and
    /// notifies nobody.
    pub fn rename(&mut self, old: impl IntoKey, new: impl IntoKey, force: bool) -> bool {
        let Some(old) = old.lookup_key() else {
            return false;
        };
        if !self.cells.contains_key(&old) {
            return false;
        }
        let new = new.into_key();
        if old == new {
            return true;
        }
        if !force && self.cells.contains_key(&new) {
            return false;
        }
        let Some(value) = self.cells.shift_remove(&old) else {
            return false;
        };
        self.cells.insert(new, value);
        self.emit(new);
        true
    }

    // Enumeration

    /// Returns all keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.cells.keys().copied().collect()
    }

    /// Returns all key paths in insertion order.
    #[must_use]
    pub fn keys_as_strings(&self) -> Vec<Arc<str>> {
        self.cells.keys().map(|key| key.name()).collect()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &Value)> + '_ {
        self.cells.iter().map(|(&key, value)| (key, value))
    }

    /// Calls `f` with every cell at or below `prefix`, or with every cell
    /// for `None`.
    pub fn foreach(&self, prefix: Option<&str>, mut f: impl FnMut(Key, &Value)) {
        match prefix.map(prefix::normalize) {
            None | Some("") => {
                for (&key, value) in &self.cells {
                    f(key, value);
                }
            }
            Some(prefix) => {
                for (&key, value) in &self.cells {
                    if prefix::matches(&key.name(), prefix) {
                        f(key, value);
                    }
                }
            }
        }
    }

    // Copying

    /// Deep copy without subscribers. Objects are duplicated, not shared.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|(&key, value)| (key, value.duplicate()))
                .collect(),
            watchers: Subscribers::new(),
        }
    }

    /// Deep copy of the cells at or below any of `prefixes`.
    #[must_use]
    pub fn duplicate_by_prefix(&self, prefixes: &[&str]) -> Self {
        let mut copy = Self::new();
        for (&key, value) in &self.cells {
            let path = key.name();
            if prefixes.iter().any(|prefix| prefix::matches(&path, prefix)) {
                copy.cells.insert(key, value.duplicate());
            }
        }
        copy
    }

    // Notification

    /// Subscribes `callback` to the changes selected by `watch`.
    pub fn connect(
        &mut self,
        watch: Watch,
        callback: impl FnMut(&Container, Key) + 'static,
    ) -> SubscriptionId {
        self.watchers.add(Watcher {
            watch,
            callback: Box::new(callback),
        })
    }

    /// Unsubscribes. Returns false if the handle is unknown.
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        self.watchers.remove(id)
    }

    fn emit(&mut self, key: Key) {
        if self.watchers.is_empty() {
            return;
        }
        trace!(?key, "container cell changed");
        let mut watchers = self.watchers.take();
        let mut path: Option<Arc<str>> = None;
        for (_, watcher) in &mut watchers {
            let hit = watcher
                .watch
                .matches(key, || Arc::clone(path.get_or_insert_with(|| key.name())));
            if hit {
                (watcher.callback)(self, key);
            }
        }
        self.watchers.restore(watchers);
    }

    pub(crate) fn insert_silently(&mut self, key: Key, value: Value) -> Option<Value> {
        self.cells.insert(key, value)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Boxed(boxed) => boxed.type_name().to_owned(),
        Value::Object(object) => format!("object {}", object.type_name()),
        other => other.kind().to_string(),
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len()
            && self
                .cells
                .iter()
                .all(|(key, value)| other.cells.get(key) == Some(value))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Container")?;
        f.debug_map()
            .entries(self.cells.iter().map(|(key, value)| (key.name(), value)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = (Key, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (Key, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
