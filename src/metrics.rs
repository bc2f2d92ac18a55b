//! Metrics collection for the thread pool.
//!
//! The pool reports its activity through the [`MetricsCollector`] trait:
//! task submission, execution, shutdown-time drops, and worker lifecycle.
//! [`AtomicMetricsCollector`] is the default counter-based implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hooks for observing thread pool activity.
///
/// All hooks may be called concurrently from caller threads, the dispatcher
/// thread, and worker threads; implementations must be thread-safe.
pub trait MetricsCollector: Send + Sync {
    /// A task was pushed into the pending queue.
    fn on_task_submitted(&self);
    /// A worker began executing a task.
    fn on_task_started(&self);
    /// A worker finished executing a task (including tasks that panicked).
    fn on_task_completed(&self);
    /// `count` pending tasks were discarded, unexecuted, during shutdown.
    fn on_tasks_dropped(&self, count: usize);
    /// A worker thread was created.
    fn on_worker_spawned(&self);
    /// A worker thread exited.
    fn on_worker_stopped(&self);
}

/// Counter block tracking the pool's activity.
pub struct ThreadPoolMetrics {
    /// Tasks currently waiting in the queue.
    pub queued_tasks: AtomicUsize,
    /// Tasks currently executing on a worker.
    pub running_tasks: AtomicUsize,
    /// Tasks that have finished executing.
    pub completed_tasks: AtomicUsize,
    /// Tasks discarded unexecuted by `stop`.
    pub dropped_tasks: AtomicUsize,
    /// Worker threads currently alive.
    pub live_workers: AtomicUsize,
}

impl ThreadPoolMetrics {
    /// Creates a counter block with every counter at zero.
    pub fn new() -> Self {
        Self {
            queued_tasks: AtomicUsize::new(0),
            running_tasks: AtomicUsize::new(0),
            completed_tasks: AtomicUsize::new(0),
            dropped_tasks: AtomicUsize::new(0),
            live_workers: AtomicUsize::new(0),
        }
    }
}

impl Default for ThreadPoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// The default [`MetricsCollector`], backed by a shared
/// [`ThreadPoolMetrics`] counter block.
pub struct AtomicMetricsCollector {
    /// Shared counter storage, readable while the pool runs.
    pub metrics: Arc<ThreadPoolMetrics>,
}

impl AtomicMetricsCollector {
    pub fn new(metrics: Arc<ThreadPoolMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    fn on_task_submitted(&self) {
        self.metrics.queued_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_started(&self) {
        self.metrics.queued_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.running_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_completed(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.completed_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tasks_dropped(&self, count: usize) {
        self.metrics.queued_tasks.fetch_sub(count, Ordering::SeqCst);
        self.metrics.dropped_tasks.fetch_add(count, Ordering::SeqCst);
    }

    fn on_worker_spawned(&self) {
        self.metrics.live_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_stopped(&self) {
        self.metrics.live_workers.fetch_sub(1, Ordering::SeqCst);
    }
}
