//! Worker threads for the parallel strategies
//!
//! A worker is a named OS thread that sums one sub-range and finishes. It
//! never receives messages and keeps no state beyond its own stack.

use crate::error::Result;
use std::thread::{self, JoinHandle};

/// Index of a worker within one invocation, `0..workers`
pub type WorkerId = usize;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Thread name prefix, workers are named `<prefix>-<index>`
    pub name_prefix: String,

    /// Pin worker `i` to core `i mod cores`
    pub cpu_affinity: bool,

    /// Stack size for worker thread (None = default)
    pub stack_size: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name_prefix: "sum-worker".to_string(),
            cpu_affinity: false,
            stack_size: None,
        }
    }
}

impl WorkerConfig {
    /// Create a new worker configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thread name prefix
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Enable or disable CPU pinning
    pub fn with_cpu_affinity(mut self, pin: bool) -> Self {
        self.cpu_affinity = pin;
        self
    }

    /// Set stack size
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

/// Spawn worker `id` running `task`
pub fn spawn<F, T>(id: WorkerId, config: &WorkerConfig, task: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let mut thread_builder = thread::Builder::new().name(format!("{}-{}", config.name_prefix, id));

    if let Some(stack_size) = config.stack_size {
        thread_builder = thread_builder.stack_size(stack_size);
    }

    let pin = config.cpu_affinity;
    let handle = thread_builder.spawn(move || {
        if pin {
            pin_to_core(id);
        }
        task()
    })?;

    Ok(handle)
}

fn pin_to_core(id: WorkerId) {
    match core_affinity::get_core_ids() {
        Some(core_ids) if !core_ids.is_empty() => {
            let core = core_ids[id % core_ids.len()];
            if !core_affinity::set_for_current(core) {
                log::warn!("worker {} could not be pinned to core {}", id, core.id);
            }
        }
        _ => log::warn!("worker {}: core ids unavailable, running unpinned", id),
    }
}

/// Wait for every handle and report the first worker that panicked
pub(crate) fn join_all<T>(handles: Vec<JoinHandle<T>>) -> Result<Vec<T>> {
    let mut outputs = Vec::with_capacity(handles.len());
    let mut panicked = None;

    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(output) => outputs.push(output),
            Err(_) => {
                log::warn!("worker {} panicked", id);
                panicked.get_or_insert(id);
            }
        }
    }

    match panicked {
        Some(worker) => Err(crate::error::Error::WorkerPanicked { worker }),
        None => Ok(outputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_worker_spawn() {
        let config = WorkerConfig::new().with_name_prefix("test-worker");

        let handle = spawn(3, &config, || thread::current().name().map(str::to_owned)).unwrap();

        assert_eq!(handle.join().unwrap().as_deref(), Some("test-worker-3"));
    }

    #[test]
    fn test_pinned_worker_runs() {
        let config = WorkerConfig::new().with_cpu_affinity(true);
        let handle = spawn(0, &config, || 6 * 7).unwrap();
        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn test_join_all_reports_panic() {
        let config = WorkerConfig::new();
        let handles = vec![
            spawn(0, &config, || 1).unwrap(),
            spawn(1, &config, || -> i32 { panic!("boom") }).unwrap(),
            spawn(2, &config, || 3).unwrap(),
        ];

        match join_all(handles) {
            Err(Error::WorkerPanicked { worker }) => assert_eq!(worker, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
