//! Integer ranges that define the total work of one invocation

use std::ops::Range;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` over `i64`
///
/// An inverted range (`end < start`) is treated as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SumRange {
    start: i64,
    end: i64,
}

impl SumRange {
    /// Create a range covering `[start, end)`
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Inclusive lower bound
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Exclusive upper bound
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of integers in the range
    pub fn len(&self) -> u64 {
        if self.end <= self.start {
            0
        } else {
            self.end.abs_diff(self.start)
        }
    }

    /// Whether the range holds no integers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the integers of the range in ascending order
    pub fn iter(&self) -> Range<i64> {
        self.start..self.end
    }

    /// Sub-range starting `offset` elements in and holding `len` elements
    ///
    /// Callers guarantee `offset + len <= self.len()`, so the bounds never
    /// leave `[start, end]`.
    pub(crate) fn slice(&self, offset: u64, len: u64) -> Self {
        let start = self.start.wrapping_add_unsigned(offset);
        Self::new(start, start.wrapping_add_unsigned(len))
    }
}

impl From<Range<i64>> for SumRange {
    fn from(range: Range<i64>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl IntoIterator for SumRange {
    type Item = i64;
    type IntoIter = Range<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
