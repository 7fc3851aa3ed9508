//! Error types for the accumulator strategies

use thiserror::Error;

/// Result type alias for accumulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while running a parallel strategy
#[derive(Error, Debug)]
pub enum Error {
    /// The OS refused to start a worker thread
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker thread panicked before finishing its sub-range
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the failed worker
        worker: usize,
    },

    /// The channel disconnected before every worker reported
    #[error("collected {received} of {expected} partial sums before the channel disconnected")]
    IncompleteCollection {
        /// Partial sums actually received
        received: usize,
        /// Partial sums expected (the worker count)
        expected: usize,
    },

    /// Channel send error
    #[error("channel send error: {0}")]
    SendError(String),

    /// Channel receive error
    #[error("channel receive error: {0}")]
    ReceiveError(String),
}

impl<T> From<flume::SendError<T>> for Error {
    fn from(err: flume::SendError<T>) -> Self {
        Error::SendError(err.to_string())
    }
}

impl From<flume::RecvError> for Error {
    fn from(err: flume::RecvError) -> Self {
        Error::ReceiveError(err.to_string())
    }
}
