//! Fixed-size accumulator arenas written concurrently by workers
//!
//! Slot `i` belongs to worker `i` for the whole invocation. No two workers
//! ever touch the same slot, so a relaxed load followed by a relaxed store is
//! a correct accumulate: there is only one writer and the aggregator reads
//! after the barrier. Neither arena takes a lock.

use crossbeam::utils::CachePadded;
use std::mem;
use std::sync::atomic::{AtomicI64, Ordering};

/// Cache line size assumed by the layout checks (typically 64 bytes on x86-64)
pub const CACHE_LINE_SIZE: usize = 64;

/// Per-worker accumulator slots shared by all workers of one invocation
pub trait Slots: Send + Sync + 'static {
    /// Create an arena of `len` zeroed slots
    fn with_len(len: usize) -> Self;

    /// Number of slots
    fn len(&self) -> usize;

    /// Add `value` to slot `index`
    ///
    /// Only the worker that owns `index` may call this.
    fn accumulate(&self, index: usize, value: i64);

    /// Current value of slot `index`
    fn get(&self, index: usize) -> i64;

    /// Distance in bytes between two neighbouring slots
    fn stride(&self) -> usize;

    /// Sum of every slot
    fn total(&self) -> i64 {
        (0..self.len()).fold(0i64, |acc, i| acc.wrapping_add(self.get(i)))
    }
}

fn accumulate_in(slot: &AtomicI64, value: i64) {
    // Plain store instead of fetch_add: the slot has a single writer.
    slot.store(slot.load(Ordering::Relaxed).wrapping_add(value), Ordering::Relaxed);
}

/// Contiguous slots, eight to a 64-byte cache line
#[derive(Debug)]
pub struct SharedSlots {
    slots: Box<[AtomicI64]>,
}

impl Slots for SharedSlots {
    fn with_len(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicI64::new(0)).collect(),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn accumulate(&self, index: usize, value: i64) {
        accumulate_in(&self.slots[index], value);
    }

    fn get(&self, index: usize) -> i64 {
        self.slots[index].load(Ordering::Relaxed)
    }

    fn stride(&self) -> usize {
        mem::size_of::<AtomicI64>()
    }
}

/// Slots padded and aligned so each one owns a whole cache line
#[derive(Debug)]
pub struct PaddedSlots {
    slots: Box<[CachePadded<AtomicI64>]>,
}

impl Slots for PaddedSlots {
    fn with_len(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| CachePadded::new(AtomicI64::new(0))).collect(),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn accumulate(&self, index: usize, value: i64) {
        accumulate_in(&self.slots[index], value);
    }

    fn get(&self, index: usize) -> i64 {
        self.slots[index].load(Ordering::Relaxed)
    }

    fn stride(&self) -> usize {
        mem::size_of::<CachePadded<AtomicI64>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<S: Slots>() {
        let slots = S::with_len(4);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots.total(), 0);

        slots.accumulate(0, 5);
        slots.accumulate(0, 7);
        slots.accumulate(3, -2);

        assert_eq!(slots.get(0), 12);
        assert_eq!(slots.get(1), 0);
        assert_eq!(slots.total(), 10);
    }

    #[test]
    fn test_shared_slots() {
        exercise::<SharedSlots>();
    }

    #[test]
    fn test_padded_slots() {
        exercise::<PaddedSlots>();
    }

    #[test]
    fn test_packed_slots_share_a_line() {
        let slots = SharedSlots::with_len(8);
        assert!(slots.stride() * 2 <= CACHE_LINE_SIZE);
    }

    #[test]
    fn test_padded_slots_never_share_a_line() {
        let slots = PaddedSlots::with_len(8);
        assert!(slots.stride() >= CACHE_LINE_SIZE);
        let first = &*slots.slots[0] as *const AtomicI64 as usize;
        let second = &*slots.slots[1] as *const AtomicI64 as usize;
        assert!(second - first >= CACHE_LINE_SIZE);
    }

    #[test]
    fn test_total_wraps() {
        let slots = SharedSlots::with_len(2);
        slots.accumulate(0, i64::MAX);
        slots.accumulate(1, 1);
        assert_eq!(slots.total(), i64::MIN);
    }
}
