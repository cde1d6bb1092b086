//! Subscriber lists for synchronous change notification.

use std::fmt;

/// Handle identifying one subscription, used to disconnect it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of subscribers.
///
/// Owners emit by taking the entries out, invoking them against `&self`
/// and restoring them, so handlers may read the owner but never mutate it.
pub struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, T)>,
}

impl<T> Subscribers<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Adds a subscriber, returning its handle.
    pub fn add(&mut self, subscriber: T) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    /// Removes a subscriber. Returns false if the handle is unknown.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes all subscribers out for the duration of an emission.
    pub fn take(&mut self) -> Vec<(SubscriptionId, T)> {
        std::mem::take(&mut self.entries)
    }

    /// Puts subscribers back after an emission.
    pub fn restore(&mut self, mut entries: Vec<(SubscriptionId, T)>) {
        entries.append(&mut self.entries);
        self.entries = entries;
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
