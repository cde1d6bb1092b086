//! The integer range set.

use std::fmt;

use stash_foundation::{SubscriptionId, Subscribers};
use tracing::trace;

use crate::range::{self, IntRange, RangesError};

/// Change reported to [`IntSet`] subscribers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntSetEvent {
    /// A single value became a member.
    Added(i32),
    /// A single value stopped being a member.
    Removed(i32),
    /// The whole content was replaced at once.
    Assigned,
}

type Handler = Box<dyn FnMut(&IntSet, IntSetEvent)>;

/// Sparse set of integers stored as sorted, disjoint, non-adjacent closed
/// intervals.
///
/// Mutations notify subscribers synchronously after they take effect.
/// Single-value changes report [`IntSetEvent::Added`] or
/// [`IntSetEvent::Removed`]; wholesale replacement through [`IntSet::assign`]
/// or [`IntSet::fill`] reports a single [`IntSetEvent::Assigned`].
#[derive(Default)]
pub struct IntSet {
    ranges: Vec<IntRange>,
    subscribers: Subscribers<Handler>,
}

/// Cursor for stepping through an [`IntSet`] with [`IntSet::first`] and
/// [`IntSet::next`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntSetIter {
    /// The current member.
    pub value: i32,
    range: usize,
}

impl Default for IntSetIter {
    fn default() -> Self {
        Self {
            value: 0,
            range: usize::MAX,
        }
    }
}

impl IntSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding `values`, which may be unsorted and contain
    /// duplicates.
    #[must_use]
    pub fn from_values(values: &[i32]) -> Self {
        Self {
            ranges: range::canonicalize(values),
            subscribers: Subscribers::new(),
        }
    }

    /// Creates a set from an explicit range list.
    ///
    /// # Errors
    ///
    /// Returns [`RangesError::NotCanonical`] unless the ranges are sorted,
    /// disjoint and non-adjacent.
    pub fn from_ranges(ranges: Vec<IntRange>) -> Result<Self, RangesError> {
        if !range::is_canonical(&ranges) {
            return Err(RangesError::NotCanonical);
        }
        Ok(Self {
            ranges,
            subscribers: Subscribers::new(),
        })
    }

    /// Creates a set from a flat `from0, to0, from1, to1, ...` bound list.
    ///
    /// # Errors
    ///
    /// Returns [`RangesError::OddLength`] for an odd number of bounds and
    /// [`RangesError::NotCanonical`] for bounds not in canonical form.
    pub fn from_flat(flat: &[i32]) -> Result<Self, RangesError> {
        range::from_flat(flat).map(|ranges| Self {
            ranges,
            subscribers: Subscribers::new(),
        })
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        let total: u64 = self.ranges.iter().map(|r| r.len()).sum();
        usize::try_from(total).unwrap_or(usize::MAX)
    }

    /// Returns true if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true if the set has at least one member.
    #[must_use]
    pub fn is_nonempty(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Locates `value`: `Ok(i)` if range `i` holds it, otherwise `Err(i)`
    /// with `i` the index a new range for it would be inserted at.
    fn find(&self, value: i32) -> Result<usize, usize> {
        let i = self.ranges.partition_point(|r| r.to < value);
        match self.ranges.get(i) {
            Some(r) if r.from <= value => Ok(i),
            _ => Err(i),
        }
    }

    /// Returns true if `value` is a member.
    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        self.find(value).is_ok()
    }

    /// Adds `value`. Returns true if the set changed.
    pub fn add(&mut self, value: i32) -> bool {
        let Err(i) = self.find(value) else {
            return false;
        };

        let v = i64::from(value);
        let joins_prev = i > 0 && i64::from(self.ranges[i - 1].to) + 1 == v;
        let joins_next = i < self.ranges.len() && i64::from(self.ranges[i].from) - 1 == v;
        match (joins_prev, joins_next) {
            (true, true) => {
                self.ranges[i - 1].to = self.ranges[i].to;
                self.ranges.remove(i);
            }
            (true, false) => self.ranges[i - 1].to = value,
            (false, true) => self.ranges[i].from = value,
            (false, false) => self.ranges.insert(i, IntRange::single(value)),
        }

        self.emit(IntSetEvent::Added(value));
        true
    }

    /// Removes `value`. Returns true if the set changed.
    pub fn remove(&mut self, value: i32) -> bool {
        let Ok(i) = self.find(value) else {
            return false;
        };

        let r = self.ranges[i];
        if r.from == r.to {
            self.ranges.remove(i);
        } else if value == r.from {
            self.ranges[i].from = value + 1;
        } else if value == r.to {
            self.ranges[i].to = value - 1;
        } else {
            self.ranges[i].to = value - 1;
            self.ranges.insert(i + 1, IntRange::new(value + 1, r.to));
        }

        self.emit(IntSetEvent::Removed(value));
        true
    }

    /// Adds `value` if absent, removes it if present.
    ///
    /// Returns whether `value` is a member afterwards.
    pub fn toggle(&mut self, value: i32) -> bool {
        if self.contains(value) {
            self.remove(value);
            false
        } else {
            self.add(value);
            true
        }
    }

    /// Replaces the content with `values`, reporting each value that
    /// actually leaves or joins the set.
    ///
    /// Removals are applied and reported first, then additions. Values
    /// present before and after are not reported.
    pub fn update(&mut self, values: &[i32]) {
        let target = range::canonicalize(values);
        if self.subscribers.is_empty() {
            self.ranges = target;
            return;
        }

        let (removed, added) = diff(&self.ranges, &target);
        trace!(
            removed = removed.len(),
            added = added.len(),
            "updating integer set"
        );
        for value in removed {
            self.remove(value);
        }
        for value in added {
            self.add(value);
        }
        debug_assert_eq!(self.ranges, target);
    }

    /// Replaces the content with a copy of `source`, reporting a single
    /// [`IntSetEvent::Assigned`] however much changed.
    pub fn assign(&mut self, source: &IntSet) {
        self.ranges.clone_from(&source.ranges);
        self.emit(IntSetEvent::Assigned);
    }

    /// Replaces the content with `values`, reporting a single
    /// [`IntSetEvent::Assigned`].
    pub fn fill(&mut self, values: &[i32]) {
        self.ranges = range::canonicalize(values);
        self.emit(IntSetEvent::Assigned);
    }

    /// Returns all members in ascending order.
    #[must_use]
    pub fn values(&self) -> Vec<i32> {
        self.iter().collect()
    }

    /// Returns the canonical range list.
    #[must_use]
    pub fn ranges(&self) -> &[IntRange] {
        &self.ranges
    }

    /// Returns the ranges flattened into `from0, to0, from1, to1, ...`.
    #[must_use]
    pub fn to_flat(&self) -> Vec<i32> {
        range::to_flat(&self.ranges)
    }

    /// Iterates over members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.iter().flat_map(|r| r.from..=r.to)
    }

    /// Calls `f` with every member in ascending order.
    pub fn foreach(&self, mut f: impl FnMut(i32)) {
        for value in self.iter() {
            f(value);
        }
    }

    /// Points `iter` at the smallest member.
    ///
    /// Returns false if the set is empty.
    pub fn first(&self, iter: &mut IntSetIter) -> bool {
        match self.ranges.first() {
            Some(r) => {
                iter.range = 0;
                iter.value = r.from;
                true
            }
            None => {
                iter.range = usize::MAX;
                false
            }
        }
    }

    /// Advances `iter` to the next member.
    ///
    /// Returns false once the set is exhausted, and keeps returning false.
    pub fn next(&self, iter: &mut IntSetIter) -> bool {
        let Some(r) = self.ranges.get(iter.range) else {
            return false;
        };
        if iter.value < r.to {
            iter.value += 1;
            return true;
        }
        match self.ranges.get(iter.range + 1) {
            Some(next) => {
                iter.range += 1;
                iter.value = next.from;
                true
            }
            None => {
                iter.range = usize::MAX;
                false
            }
        }
    }

    /// Subscribes to changes.
    pub fn connect(&mut self, handler: impl FnMut(&IntSet, IntSetEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(handler))
    }

    /// Unsubscribes. Returns false if the handle is unknown.
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn emit(&mut self, event: IntSetEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        trace!(?event, "integer set changed");
        let mut handlers = self.subscribers.take();
        for (_, handler) in &mut handlers {
            handler(self, event);
        }
        self.subscribers.restore(handlers);
    }
}

/// Values in `old` but not in `new`, and values in `new` but not in `old`.
fn diff(old: &[IntRange], new: &[IntRange]) -> (Vec<i32>, Vec<i32>) {
    let mut removed = Vec::new();
    let mut added = Vec::new();
    let mut old = old.iter().flat_map(|r| r.from..=r.to).peekable();
    let mut new = new.iter().flat_map(|r| r.from..=r.to).peekable();

    loop {
        match (old.peek().copied(), new.peek().copied()) {
            (Some(a), Some(b)) if a < b => {
                removed.push(a);
                old.next();
            }
            (Some(a), Some(b)) if a > b => {
                added.push(b);
                new.next();
            }
            (Some(_), Some(_)) => {
                old.next();
                new.next();
            }
            (Some(a), None) => {
                removed.push(a);
                old.next();
            }
            (None, Some(b)) => {
                added.push(b);
                new.next();
            }
            (None, None) => break,
        }
    }
    (removed, added)
}

impl Clone for IntSet {
    /// Copies the members; subscribers are not copied.
    fn clone(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
            subscribers: Subscribers::new(),
        }
    }
}

impl PartialEq for IntSet {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

impl Eq for IntSet {}

impl fmt::Debug for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IntSet")?;
        f.debug_list().entries(self.ranges.iter()).finish()
    }
}

impl FromIterator<i32> for IntSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let values: Vec<i32> = iter.into_iter().collect();
        Self::from_values(&values)
    }
}
