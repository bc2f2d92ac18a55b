//! Error types for the thread pool.
//!
//! Contract violations (assigning to a busy worker, double-starting a pool,
//! submitting outside the running state) are bugs and fail loudly with a
//! panic; they are not represented here. `PoolError` covers the recoverable
//! teardown failures that `stop` reports instead of propagating.

/// Errors that can surface while tearing down the thread pool.
#[derive(Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A worker thread could not be joined (it panicked outside a task).
    WorkerJoin,
    /// The dispatcher thread could not be joined.
    DispatcherJoin,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::WorkerJoin => write!(f, "failed to join a worker thread"),
            PoolError::DispatcherJoin => write!(f, "failed to join the dispatcher thread"),
        }
    }
}

impl std::error::Error for PoolError {}
