//! Range partitioning for distributing work across workers
//!
//! Every parallel strategy hands worker `i` the `i`-th sub-range returned by
//! [`PartitionMode::split`]. Sub-ranges are contiguous, pairwise disjoint and
//! ordered from the start of the range.

use std::fmt;
use std::str::FromStr;

use crate::range::SumRange;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// How a range is divided into one sub-range per worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PartitionMode {
    /// Every worker gets `⌊len / workers⌋` elements.
    ///
    /// The `len mod workers` elements at the top of the range are never
    /// processed, so `[0, 10)` over 4 workers only covers `[0, 8)`.
    #[default]
    Truncating,

    /// The first `len mod workers` workers get one extra element, so the
    /// sub-ranges cover the whole range.
    Balanced,
}

impl PartitionMode {
    /// Split `range` into exactly `workers` sub-ranges
    ///
    /// A worker count of 0 is treated as 1. When there are more workers than
    /// elements, the surplus sub-ranges are empty.
    pub fn split(self, range: SumRange, workers: usize) -> Vec<SumRange> {
        let workers = workers.max(1) as u64;
        let len = range.len();
        let base = len / workers;
        let remainder = match self {
            PartitionMode::Truncating => 0,
            PartitionMode::Balanced => len % workers,
        };

        (0..workers)
            .map(|i| {
                let offset = i * base + i.min(remainder);
                let size = base + u64::from(i < remainder);
                range.slice(offset, size)
            })
            .collect()
    }

    /// Number of elements the split of `range` covers
    pub fn covered(self, range: SumRange, workers: usize) -> u64 {
        let workers = workers.max(1) as u64;
        match self {
            PartitionMode::Truncating => workers * (range.len() / workers),
            PartitionMode::Balanced => range.len(),
        }
    }

    /// Lower-case name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            PartitionMode::Truncating => "truncating",
            PartitionMode::Balanced => "balanced",
        }
    }
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truncating" | "truncate" => Ok(PartitionMode::Truncating),
            "balanced" | "balance" => Ok(PartitionMode::Balanced),
            other => Err(format!("unknown partition mode: {}", other)),
        }
    }
}
