//! Parallel sum with worker-private accumulators
//!
//! Each worker sums into a local that lives on its own stack and is never
//! borrowed out of the worker closure, so no two accumulators can share a
//! cache line. The finished value is moved over a channel. The aggregator
//! performs exactly one receive per worker; that receive loop is the only
//! synchronization, there is no join.

use crate::channel::{Channel, ChannelStats};
use crate::config::SumConfig;
use crate::error::{Error, Result};
use crate::range::SumRange;
use crate::worker::{self, WorkerId};
use std::sync::Arc;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A worker's finished sub-range sum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PartialSum {
    /// Worker that produced the value
    pub worker: WorkerId,

    /// Sum of the worker's sub-range
    pub value: i64,
}

/// Sum `range` with per-worker locals collected over a channel
pub fn compute_isolated(range: SumRange, config: &SumConfig) -> Result<i64> {
    collect_partials(range, config, sum_part).map(|(total, _)| total)
}

fn sum_part(_id: WorkerId, part: SumRange) -> i64 {
    let mut sum = 0i64;
    for j in part {
        sum = sum.wrapping_add(j);
    }
    sum
}

pub(crate) fn collect_partials<F>(
    range: SumRange,
    config: &SumConfig,
    body: F,
) -> Result<(i64, Arc<ChannelStats>)>
where
    F: Fn(WorkerId, SumRange) -> i64 + Send + Copy + 'static,
{
    let workers = config.resolved_workers();
    let parts = config.partition.split(range, workers);

    // Room for every partial sum, so no worker blocks on send.
    let (tx, rx) = Channel::mpsc::<PartialSum>(workers);
    let mut spawn_error = None;

    for (id, part) in parts.into_iter().enumerate() {
        let tx = tx.clone();

        let spawned = worker::spawn(id, &config.worker_config, move || {
            log::trace!("isolated worker {} summing {:?}", id, part);
            let value = body(id, part);
            if let Err(e) = tx.send(PartialSum { worker: id, value }) {
                log::warn!("isolated worker {} could not deliver its sum: {}", id, e);
            }
        });

        // Dropping the handle detaches the worker.
        if let Err(e) = spawned {
            log::warn!("isolated: spawning worker {} failed: {}", id, e);
            spawn_error = Some(e);
            break;
        }
    }

    // Only worker senders remain, so a dead worker shows up as a disconnect.
    drop(tx);

    if let Some(e) = spawn_error {
        while rx.recv().is_ok() {}
        return Err(e);
    }

    let mut total = 0i64;
    for received in 0..workers {
        match rx.recv() {
            Ok(partial) => {
                log::trace!("received {:?} ({} of {})", partial, received + 1, workers);
                total = total.wrapping_add(partial.value);
            }
            Err(_) => {
                log::warn!("isolated: channel closed after {} of {} partial sums", received, workers);
                return Err(Error::IncompleteCollection {
                    received,
                    expected: workers,
                });
            }
        }
    }

    log::debug!(
        "isolated sum over {:?} with {} workers ({}) = {}",
        range,
        workers,
        config.partition,
        total
    );
    Ok((total, rx.stats()))
}
