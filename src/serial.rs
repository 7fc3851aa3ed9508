//! Single-threaded baseline

use crate::partition::PartitionMode;
use crate::range::SumRange;

/// Sum every integer of `range` by sequential addition
pub fn compute_serial(range: SumRange) -> i64 {
    let sum = range.iter().fold(0i64, |acc, j| acc.wrapping_add(j));
    log::debug!("serial sum over {:?} = {}", range, sum);
    sum
}

/// Sum exactly the integers a `workers`-way split of `range` covers
///
/// Both partition modes cover a contiguous prefix of the range, so this is
/// the serial sum of that prefix. With [`PartitionMode::Truncating`] and a
/// remainder, the top elements are left out just as the parallel strategies
/// leave them out.
pub fn compute_serial_partitioned(range: SumRange, workers: usize, mode: PartitionMode) -> i64 {
    compute_serial(range.slice(0, mode.covered(range, workers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_sum() {
        assert_eq!(compute_serial(SumRange::new(0, 100)), 4950);
        assert_eq!(compute_serial(SumRange::new(0, 10)), 45);
        assert_eq!(compute_serial(SumRange::new(-10, 11)), 0);
    }

    #[test]
    fn test_empty_and_inverted() {
        assert_eq!(compute_serial(SumRange::new(4, 4)), 0);
        assert_eq!(compute_serial(SumRange::new(9, 1)), 0);
    }

    #[test]
    fn test_partitioned_truncates() {
        let range = SumRange::new(0, 10);
        assert_eq!(compute_serial_partitioned(range, 4, PartitionMode::Truncating), 28);
        assert_eq!(compute_serial_partitioned(range, 4, PartitionMode::Balanced), 45);
        assert_eq!(compute_serial_partitioned(range, 11, PartitionMode::Truncating), 0);
    }

    #[test]
    fn test_closed_form() {
        let n = 1_000_000i64;
        assert_eq!(compute_serial(SumRange::new(0, n)), n * (n - 1) / 2);
    }
}
