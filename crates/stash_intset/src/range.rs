//! Closed integer intervals and the canonical-form rules for lists of them.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed interval `[from, to]` of integers.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntRange {
    /// First member.
    pub from: i32,
    /// Last member.
    pub to: i32,
}

impl IntRange {
    /// Creates a range. `from` must not exceed `to`.
    #[must_use]
    pub const fn new(from: i32, to: i32) -> Self {
        debug_assert!(from <= to);
        Self { from, to }
    }

    /// Creates a range holding a single value.
    #[must_use]
    pub const fn single(value: i32) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    /// Returns the number of members.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn len(self) -> u64 {
        (self.to as i64 - self.from as i64 + 1) as u64
    }

    /// Returns true if `value` lies inside the range.
    #[must_use]
    pub const fn contains(self, value: i32) -> bool {
        self.from <= value && value <= self.to
    }
}

impl fmt::Debug for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}..={}", self.from, self.to)
        }
    }
}

/// Reasons a list of ranges cannot form an integer set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RangesError {
    /// A flat bound list must hold `from, to` pairs.
    #[error("Integer set ranges length {0} is not a multiple of 2.")]
    OddLength(usize),
    /// Ranges are reversed, unsorted, overlapping or touching.
    #[error("Integer set ranges are not in canonical form.")]
    NotCanonical,
}

/// Builds the canonical range list holding exactly `values`.
pub(crate) fn canonicalize(values: &[i32]) -> Vec<IntRange> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<IntRange> = Vec::new();
    for value in sorted {
        match ranges.last_mut() {
            Some(last) if i64::from(last.to) + 1 == i64::from(value) => last.to = value,
            _ => ranges.push(IntRange::single(value)),
        }
    }
    ranges
}

/// Checks `from <= to` for every range and a gap of at least one excluded
/// integer between neighbours.
pub(crate) fn is_canonical(ranges: &[IntRange]) -> bool {
    ranges.iter().all(|r| r.from <= r.to)
        && ranges
            .windows(2)
            .all(|pair| i64::from(pair[0].to) + 1 < i64::from(pair[1].from))
}

/// Splits a flat `from0, to0, from1, to1, ...` list into ranges.
pub(crate) fn from_flat(flat: &[i32]) -> Result<Vec<IntRange>, RangesError> {
    if flat.len() % 2 != 0 {
        return Err(RangesError::OddLength(flat.len()));
    }
    let ranges: Vec<IntRange> = flat
        .chunks_exact(2)
        .map(|pair| IntRange {
            from: pair[0],
            to: pair[1],
        })
        .collect();
    if is_canonical(&ranges) {
        Ok(ranges)
    } else {
        Err(RangesError::NotCanonical)
    }
}

/// Flattens ranges into `from0, to0, from1, to1, ...`.
pub(crate) fn to_flat(ranges: &[IntRange]) -> Vec<i32> {
    ranges.iter().flat_map(|r| [r.from, r.to]).collect()
}
