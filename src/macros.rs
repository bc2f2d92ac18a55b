//! # Macros for `lazypool`
//!
//! Convenience macros that cut the boilerplate of building pools, submitting
//! work, and printing a metrics snapshot.

/// Submits a closure to the pool and yields its [`TaskHandle`].
///
/// [`TaskHandle`]: crate::TaskHandle
///
/// # Example
/// ```rust
/// use lazypool::{submit_task, ThreadPool};
///
/// let pool = ThreadPool::new(2);
/// pool.start();
/// let handle = submit_task!(pool, || 7 * 6);
/// assert_eq!(handle.join().unwrap(), 42);
/// pool.stop().unwrap();
/// ```
#[macro_export]
macro_rules! submit_task {
    ($pool:expr, $task:expr) => {
        $pool.spawn($task)
    };
}

/// Prints a snapshot of the pool's metrics counters.
///
/// # Example
/// ```rust
/// use lazypool::{log_metrics, ThreadPoolBuilder};
/// use lazypool::metrics::{AtomicMetricsCollector, ThreadPoolMetrics};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(ThreadPoolMetrics::new());
/// let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
/// let pool = ThreadPoolBuilder::new()
///     .with_metrics_collector(collector)
///     .build();
/// pool.start();
///
/// log_metrics!(metrics);
/// pool.stop().unwrap();
/// ```
#[macro_export]
macro_rules! log_metrics {
    ($metrics:expr) => {
        println!(
            "Queued tasks: {}",
            $metrics
                .queued_tasks
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Running tasks: {}",
            $metrics
                .running_tasks
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Completed tasks: {}",
            $metrics
                .completed_tasks
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Dropped tasks: {}",
            $metrics
                .dropped_tasks
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Live workers: {}",
            $metrics
                .live_workers
                .load(std::sync::atomic::Ordering::SeqCst)
        );
    };
}

/// Creates a thread pool, optionally with a metrics collector attached.
///
/// The pool is returned in the created state; call `start` before
/// submitting work.
///
/// # Example
/// ```rust
/// use lazypool::create_thread_pool;
///
/// let pool = create_thread_pool!(max_workers: 8);
/// pool.start();
/// pool.wait_for_all();
/// pool.stop().unwrap();
/// ```
#[macro_export]
macro_rules! create_thread_pool {
    (max_workers: $num:expr) => {
        $crate::ThreadPoolBuilder::new().max_workers($num).build()
    };
    (max_workers: $num:expr, metrics: $collector:expr) => {
        $crate::ThreadPoolBuilder::new()
            .max_workers($num)
            .with_metrics_collector($collector)
            .build()
    };
}
