//! Configuration shared by all strategies

use crate::partition::PartitionMode;
use crate::worker::WorkerConfig;

/// Parameters of one strategy invocation
#[derive(Debug, Clone, Default)]
pub struct SumConfig {
    /// Number of workers (None = one per available core)
    pub workers: Option<usize>,

    /// How the range is divided between workers
    pub partition: PartitionMode,

    /// Configuration template for worker threads
    pub worker_config: WorkerConfig,
}

impl SumConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the partition mode
    pub fn with_partition(mut self, partition: PartitionMode) -> Self {
        self.partition = partition;
        self
    }

    /// Set the worker configuration template
    pub fn with_worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker_config = config;
        self
    }

    /// Worker count for this invocation, never less than 1
    ///
    /// Queries hardware parallelism when no count was configured.
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}
