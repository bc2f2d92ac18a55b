//! # lazypool
//!
//! `lazypool` is a bounded thread pool that creates worker threads lazily,
//! on demand: the pool starts with zero workers and grows one thread per
//! unserviced task, up to a configured ceiling. Once created, workers are
//! reused for the lifetime of the pool.
//!
//! ## Features
//! - Lazy, bounded worker growth: no threads until work arrives, never more
//!   than `max_workers`.
//! - Strict FIFO admission, preserved even when the pool is saturated.
//! - A `wait_for_all` barrier that blocks until every submitted task has
//!   finished.
//! - Graceful shutdown: queued tasks are discarded, in-flight tasks run to
//!   completion, every thread is joined.
//! - Result delivery through joinable task handles.
//! - Optional metrics collection.
//!
//! ## Usage
//!
//! ### Basic usage
//! ```rust
//! use lazypool::ThreadPool;
//!
//! let pool = ThreadPool::new(4);
//! pool.start();
//!
//! let handle = pool.spawn(|| {
//!     println!("Hello from the thread pool!");
//!     42
//! });
//! assert_eq!(handle.join().unwrap(), 42);
//!
//! pool.stop().unwrap();
//! ```
//!
//! ### Waiting for a batch to drain
//! ```rust
//! use lazypool::ThreadPoolBuilder;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = ThreadPoolBuilder::new().max_workers(2).build();
//! pool.start();
//!
//! let done = Arc::new(AtomicUsize::new(0));
//! for _ in 0..10 {
//!     let done = done.clone();
//!     pool.spawn(move || {
//!         done.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! pool.wait_for_all();
//! assert_eq!(done.load(Ordering::SeqCst), 10);
//! // Only two workers ever existed, no matter the burst size.
//! assert!(pool.worker_count() <= 2);
//!
//! pool.stop().unwrap();
//! ```
//!
//! ### Collecting metrics
//! ```rust
//! use lazypool::metrics::{AtomicMetricsCollector, ThreadPoolMetrics};
//! use lazypool::ThreadPoolBuilder;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(ThreadPoolMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let pool = ThreadPoolBuilder::new()
//!     .max_workers(4)
//!     .with_metrics_collector(collector)
//!     .build();
//! pool.start();
//!
//! for i in 0..5 {
//!     pool.spawn(move || println!("Task {} executed", i));
//! }
//! pool.wait_for_all();
//!
//! use std::sync::atomic::Ordering;
//! assert_eq!(metrics.completed_tasks.load(Ordering::SeqCst), 5);
//!
//! pool.stop().unwrap();
//! ```

mod errors;
mod macros;
pub mod metrics;
pub mod pool;
mod queue;
mod signal;

pub use errors::PoolError;
pub use pool::task::{wrap_task, Task, TaskHandle};
pub use pool::{ThreadPool, ThreadPoolBuilder};

/// Runs a set of tasks in traditional multi-threading mode (without the
/// thread pool): one OS thread per task, joined before returning. Kept as a
/// baseline for the benchmarks.
///
/// # Example
/// ```rust
/// use lazypool::{run_traditional, Task};
///
/// let tasks: Vec<Task> = (0..4)
///     .map(|i| Box::new(move || println!("Task {} executed", i)) as Task)
///     .collect();
///
/// run_traditional(tasks);
/// ```
#[cfg(any(debug_assertions, test, feature = "bench"))]
pub fn run_traditional(tasks: Vec<Task>) {
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| std::thread::spawn(task))
        .collect();

    for h in handles {
        let _ = h.join();
    }
}
