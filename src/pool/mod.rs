//! The thread pool facade: lifecycle, submission, and the drain barrier.

mod dispatcher;
pub mod task;
mod worker;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::errors::PoolError;
use crate::metrics::MetricsCollector;
use crate::queue::TaskQueue;
use crate::signal::IdleSignal;

use dispatcher::dispatch_loop;
use task::{wrap_task, Task, TaskHandle};
use worker::PooledWorker;

/// State shared between the facade, the dispatcher thread, and the workers.
pub(crate) struct PoolShared {
    pub(crate) queue: TaskQueue,
    pub(crate) workers: Mutex<Vec<PooledWorker>>,
    pub(crate) idle: Arc<IdleSignal>,
    pub(crate) shutdown: AtomicBool,
    pub(crate) max_workers: usize,
    pub(crate) metrics: Option<Arc<dyn MetricsCollector>>,
}

impl PoolShared {
    /// True when the pool has no outstanding work: nothing queued and no
    /// worker busy. The dispatcher pops and assigns under the workers lock,
    /// so a task can never be invisible to both checks at once.
    fn drained(&self) -> bool {
        self.queue.is_empty() && self.workers.lock().unwrap().iter().all(|w| !w.is_busy())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum PoolState {
    Created,
    Running,
    Draining,
    Stopped,
}

/// A bounded thread pool that grows its worker set lazily, one worker per
/// task, up to a configured ceiling.
///
/// No worker threads exist until the first task is dispatched; the pool
/// never shrinks while running and tears every thread down on [`stop`] or
/// on drop.
///
/// ```rust
/// use lazypool::ThreadPool;
///
/// let pool = ThreadPool::new(4);
/// pool.start();
/// let handle = pool.spawn(|| 21 * 2);
/// assert_eq!(handle.join().unwrap(), 42);
/// pool.stop().unwrap();
/// ```
///
/// [`stop`]: ThreadPool::stop
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    state: Mutex<PoolState>,
    dispatcher: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ThreadPool {
    /// Creates a pool bounded by `max_workers` threads, not yet running.
    ///
    /// # Panics
    /// Panics if `max_workers` is zero.
    pub fn new(max_workers: usize) -> Self {
        ThreadPoolBuilder::new().max_workers(max_workers).build()
    }

    /// Launches the dispatcher and begins processing submitted tasks.
    ///
    /// # Panics
    /// Panics if the pool has already been started or stopped.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        if *state != PoolState::Created {
            // Release the guard first: a poisoned state lock would wreck
            // the teardown path for a pool that is otherwise healthy.
            drop(state);
            panic!("pool already started");
        }
        *state = PoolState::Running;

        let shared = Arc::clone(&self.shared);
        *self.dispatcher.lock().unwrap() = Some(thread::spawn(move || dispatch_loop(shared)));
    }

    /// Enqueues a raw task. Never blocks; the task runs as soon as a worker
    /// is free or can be created.
    ///
    /// # Panics
    /// Panics if the pool is not running.
    pub fn submit(&self, task: Task) {
        // Push while holding the state lock so a task can't slip into the
        // queue after `stop` has discarded the backlog.
        let state = self.state.lock().unwrap();
        if *state != PoolState::Running {
            drop(state);
            panic!("submit on a pool that is not running");
        }
        self.shared.queue.push(task);
        if let Some(m) = &self.shared.metrics {
            m.on_task_submitted();
        }
    }

    /// Enqueues a closure and returns a handle to its eventual result.
    ///
    /// # Panics
    /// Panics if the pool is not running.
    pub fn spawn<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (task, handle) = wrap_task(f);
        self.submit(task);
        handle
    }

    /// Blocks until every submitted task has finished: the queue is empty
    /// and all workers are idle. Returns immediately on a pool with no
    /// outstanding work, and also once a concurrent [`stop`] has drained
    /// the pool.
    ///
    /// [`stop`]: ThreadPool::stop
    pub fn wait_for_all(&self) {
        self.shared.idle.wait_until(|| {
            *self.state.lock().unwrap() == PoolState::Stopped || self.shared.drained()
        });
    }

    /// Drains and terminates the pool.
    ///
    /// Queued tasks that have not yet been handed to a worker are discarded
    /// without running; tasks already on a worker run to completion. All
    /// worker threads and the dispatcher are joined before this returns.
    /// Calling `stop` again is a no-op.
    pub fn stop(&self) -> Result<(), PoolError> {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                PoolState::Created => {
                    // Never started: nothing to drain, nothing to join.
                    *state = PoolState::Stopped;
                    return Ok(());
                }
                PoolState::Running => *state = PoolState::Draining,
                PoolState::Draining | PoolState::Stopped => return Ok(()),
            }
        }

        self.shared.shutdown.store(true, Ordering::Release);

        let dropped = self.shared.queue.clear();
        if dropped > 0 {
            if let Some(m) = &self.shared.metrics {
                m.on_tasks_dropped(dropped);
            }
        }

        // The dispatcher may be parked on either the empty-queue wait or
        // the back-pressure wait; wake both.
        self.shared.queue.interrupt();
        self.shared.idle.notify();

        let mut result = Ok(());
        if let Some(handle) = self.dispatcher.lock().unwrap().take() {
            if handle.join().is_err() {
                result = Err(PoolError::DispatcherJoin);
            }
        }

        // In-flight tasks always run to completion before the worker
        // handshake begins.
        self.shared
            .idle
            .wait_until(|| self.shared.workers.lock().unwrap().iter().all(|w| !w.is_busy()));

        let mut workers = {
            let mut guard = self.shared.workers.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        for worker in &mut workers {
            if let Err(err) = worker.stop() {
                result = Err(err);
            }
        }

        *self.state.lock().unwrap() = PoolState::Stopped;
        // Release anyone still parked in `wait_for_all`.
        self.shared.idle.notify();
        result
    }

    /// Number of worker threads created so far. Never exceeds
    /// [`max_workers`](ThreadPool::max_workers).
    pub fn worker_count(&self) -> usize {
        self.shared.workers.lock().unwrap().len()
    }

    /// The configured worker ceiling.
    pub fn max_workers(&self) -> usize {
        self.shared.max_workers
    }

    /// Number of tasks waiting for a worker.
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Teardown must never unwind out of a destructor; failures are
        // reported and swallowed.
        match panic::catch_unwind(AssertUnwindSafe(|| self.stop())) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => eprintln!("lazypool: teardown: {err}"),
            Err(_) => eprintln!("lazypool: teardown panicked"),
        }
    }
}

/// Builder for [`ThreadPool`].
///
/// ```rust
/// use lazypool::ThreadPoolBuilder;
///
/// let pool = ThreadPoolBuilder::new().max_workers(8).build();
/// pool.start();
/// pool.spawn(|| println!("hello from the pool")).join().unwrap();
/// pool.stop().unwrap();
/// ```
pub struct ThreadPoolBuilder {
    max_workers: usize,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl ThreadPoolBuilder {
    pub fn new() -> Self {
        Self {
            max_workers: 4,
            metrics_collector: None,
        }
    }

    /// Sets the ceiling on the number of worker threads.
    ///
    /// # Panics
    /// Panics if `n` is zero.
    pub fn max_workers(mut self, n: usize) -> Self {
        assert!(n > 0, "max_workers must be positive");
        self.max_workers = n;
        self
    }

    /// Attaches a metrics collector that observes pool activity.
    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    /// Builds the pool in the created (not yet running) state.
    pub fn build(self) -> ThreadPool {
        ThreadPool {
            shared: Arc::new(PoolShared {
                queue: TaskQueue::new(),
                workers: Mutex::new(Vec::new()),
                idle: Arc::new(IdleSignal::new()),
                shutdown: AtomicBool::new(false),
                max_workers: self.max_workers,
                metrics: self.metrics_collector,
            }),
            state: Mutex::new(PoolState::Created),
            dispatcher: Mutex::new(None),
        }
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
