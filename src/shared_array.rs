//! Parallel sums that accumulate into one shared slot array
//!
//! Every worker adds each element of its sub-range straight into its own
//! slot. With [`SharedSlots`] the slots sit next to each other, so workers on
//! different cores keep stealing the same cache lines from one another and
//! the run is often slower than [`compute_serial`](crate::compute_serial).
//! [`PaddedSlots`] keeps the same code path with one slot per cache line.
//!
//! The caller blocks on a [`WaitGroup`]: one clone per spawned worker, each
//! dropped when its worker finishes, including by panic.

use crossbeam::sync::WaitGroup;
use std::sync::Arc;

use crate::config::SumConfig;
use crate::error::Result;
use crate::range::SumRange;
use crate::slots::{PaddedSlots, SharedSlots, Slots};
use crate::worker::{self, WorkerId};

/// Sum `range` with workers accumulating into adjacent slots
pub fn compute_shared_array(range: SumRange, config: &SumConfig) -> Result<i64> {
    run_on_slots::<SharedSlots, _>("shared-array", range, config, accumulate_part::<SharedSlots>)
}

/// Sum `range` with workers accumulating into cache-line padded slots
pub fn compute_padded(range: SumRange, config: &SumConfig) -> Result<i64> {
    run_on_slots::<PaddedSlots, _>("padded", range, config, accumulate_part::<PaddedSlots>)
}

fn accumulate_part<S: Slots>(id: WorkerId, part: SumRange, slots: &S) {
    for j in part {
        slots.accumulate(id, j);
    }
}

pub(crate) fn run_on_slots<S, F>(
    strategy: &'static str,
    range: SumRange,
    config: &SumConfig,
    body: F,
) -> Result<i64>
where
    S: Slots,
    F: Fn(WorkerId, SumRange, &S) + Send + Copy + 'static,
{
    let workers = config.resolved_workers();
    let parts = config.partition.split(range, workers);
    let slots = Arc::new(S::with_len(workers));
    let barrier = WaitGroup::new();
    let mut handles = Vec::with_capacity(workers);

    for (id, part) in parts.into_iter().enumerate() {
        let slots = Arc::clone(&slots);
        let done = barrier.clone();

        let spawned = worker::spawn(id, &config.worker_config, move || {
            log::trace!("{} worker {} summing {:?}", strategy, id, part);
            body(id, part, &*slots);
            drop(done);
        });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                log::warn!("{}: spawning worker {} failed: {}", strategy, id, e);
                barrier.wait();
                let _ = worker::join_all(handles);
                return Err(e);
            }
        }
    }

    barrier.wait();
    worker::join_all(handles)?;

    let total = slots.total();
    log::debug!(
        "{} sum over {:?} with {} workers ({}) = {}",
        strategy,
        range,
        workers,
        config.partition,
        total
    );
    Ok(total)
}
