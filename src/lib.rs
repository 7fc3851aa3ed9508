//! # False Sharing Demonstration
//!
//! Three ways to sum an integer range, built to show how the memory layout of
//! per-worker accumulators decides whether parallelism pays off.
//!
//! ## Strategies
//!
//! - **Serial**: one thread, one accumulator. The baseline.
//! - **Shared array**: one slot per worker in one contiguous array. Workers
//!   write to different slots, but neighbouring slots share a cache line, so
//!   every write invalidates the line in the other cores' caches.
//! - **Isolated**: every worker sums into a local on its own stack and sends
//!   the result over a channel. Nothing is written to shared memory until the
//!   single final send.
//! - **Padded**: the shared array again, with every slot on its own cache
//!   line.
//!
//! ## Memory layout
//!
//! ```text
//!  shared array (one 64-byte line)       isolated (separate stacks)
//! ┌────┬────┬────┬────┬──────────┐      ┌────┐  ┌────┐  ┌────┐  ┌────┐
//! │ w0 │ w1 │ w2 │ w3 │   ...    │      │ w0 │  │ w1 │  │ w2 │  │ w3 │
//! └────┴────┴────┴────┴──────────┘      └─┬──┘  └─┬──┘  └─┬──┘  └─┬──┘
//!   ▲    ▲    ▲    ▲                      └───────┴──┬────┴───────┘
//!   every write bounces the line                     ▼ channel
//!   between cores                               aggregator
//! ```
//!
//! All strategies return the same value for the same range, worker count and
//! [`PartitionMode`].

#![warn(missing_docs, rust_2018_idioms)]

pub mod channel;
pub mod config;
pub mod error;
pub mod isolated;
pub mod partition;
pub mod range;
pub mod serial;
pub mod shared_array;
pub mod slots;
pub mod strategy;
pub mod worker;

/// Upper bound of the range the benchmarks sum, `[0, DEFAULT_LIMIT)`
pub const DEFAULT_LIMIT: i64 = 10_000_000;

// Re-exports
pub use channel::{Channel, ChannelStats, Receiver, Sender};
pub use config::SumConfig;
pub use error::{Error, Result};
pub use isolated::{compute_isolated, PartialSum};
pub use partition::PartitionMode;
pub use range::SumRange;
pub use serial::{compute_serial, compute_serial_partitioned};
pub use shared_array::{compute_padded, compute_shared_array};
pub use slots::{PaddedSlots, SharedSlots, Slots, CACHE_LINE_SIZE};
pub use strategy::Strategy;
pub use worker::{WorkerConfig, WorkerId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SumConfig;
    pub use crate::error::{Error, Result};
    pub use crate::partition::PartitionMode;
    pub use crate::range::SumRange;
    pub use crate::strategy::Strategy;
    pub use crate::{compute_isolated, compute_padded, compute_serial, compute_shared_array};
}
