//! Pooled worker threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crate::errors::PoolError;
use crate::metrics::MetricsCollector;
use crate::pool::task::Task;
use crate::signal::IdleSignal;

/// The worker's assignment slot, guarded by the worker's own mutex.
/// This is the authoritative state; the `busy` atomic outside it is only a
/// hint for the dispatcher's idle scan.
struct Slot {
    task: Option<Task>,
    stop: bool,
}

struct Inner {
    slot: Mutex<Slot>,
    wakeup: Condvar,
    busy: AtomicBool,
}

/// A worker that owns one dedicated thread and runs at most one task at a
/// time. Its thread is released only through the explicit [`stop`]
/// handshake; dropping a worker performs the same handshake best-effort so
/// a thread never outlives the pool.
///
/// [`stop`]: PooledWorker::stop
pub(crate) struct PooledWorker {
    inner: Arc<Inner>,
    thread: Option<thread::JoinHandle<()>>,
}

impl PooledWorker {
    /// Spawns an idle worker whose thread parks awaiting its first task.
    pub(crate) fn spawn(
        idle: Arc<IdleSignal>,
        metrics: Option<Arc<dyn MetricsCollector>>,
    ) -> Self {
        Self::launch(idle, metrics, None)
    }

    /// Spawns a worker already busy with `task`. Skips the assign
    /// round-trip for the grow-on-demand path.
    pub(crate) fn spawn_with_task(
        idle: Arc<IdleSignal>,
        metrics: Option<Arc<dyn MetricsCollector>>,
        task: Task,
    ) -> Self {
        Self::launch(idle, metrics, Some(task))
    }

    fn launch(
        idle: Arc<IdleSignal>,
        metrics: Option<Arc<dyn MetricsCollector>>,
        initial: Option<Task>,
    ) -> Self {
        let busy = initial.is_some();
        let inner = Arc::new(Inner {
            slot: Mutex::new(Slot {
                task: initial,
                stop: false,
            }),
            wakeup: Condvar::new(),
            busy: AtomicBool::new(busy),
        });

        if let Some(m) = &metrics {
            m.on_worker_spawned();
        }

        let thread_inner = Arc::clone(&inner);
        let thread = thread::spawn(move || worker_loop(thread_inner, idle, metrics));

        Self {
            inner,
            thread: Some(thread),
        }
    }

    /// Hands `task` to this worker and wakes its thread. Non-blocking.
    ///
    /// # Panics
    /// Panics if the worker is busy. Only the dispatcher assigns tasks, and
    /// a worker it has observed as idle stays idle until assigned, so this
    /// firing means a dispatch bug.
    pub(crate) fn assign(&self, task: Task) {
        let mut slot = self.inner.slot.lock().unwrap();
        assert!(
            slot.task.is_none() && !self.inner.busy.load(Ordering::Acquire),
            "assign called on a busy worker"
        );
        self.inner.busy.store(true, Ordering::Release);
        slot.task = Some(task);
        self.inner.wakeup.notify_one();
    }

    /// Advisory busy check. The authoritative transition happens under the
    /// worker's slot lock; this read may lag a worker going idle but never
    /// claims idle for a worker the dispatcher has already assigned.
    pub(crate) fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Signals the worker thread to exit and joins it.
    ///
    /// # Panics
    /// Panics if the worker is busy; the pool only stops workers after the
    /// drain barrier has seen them all idle.
    pub(crate) fn stop(&mut self) -> Result<(), PoolError> {
        assert!(!self.is_busy(), "stop called on a busy worker");
        match self.thread.take() {
            Some(handle) => {
                self.request_stop();
                handle.join().map_err(|_| PoolError::WorkerJoin)
            }
            None => Ok(()),
        }
    }

    fn request_stop(&self) {
        let mut slot = self.inner.slot.lock().unwrap();
        slot.stop = true;
        self.inner.wakeup.notify_one();
    }
}

impl Drop for PooledWorker {
    fn drop(&mut self) {
        // Backstop for teardown paths that bypass the explicit handshake.
        // A busy worker finishes its in-flight task before observing the
        // stop flag; the join failure, if any, is swallowed because a
        // throwing teardown is worse than a leaked report.
        if let Some(handle) = self.thread.take() {
            self.request_stop();
            let _ = handle.join();
        }
    }
}

/// Per-worker thread loop: park until a task is assigned or a stop is
/// requested, run the task, publish idleness, repeat.
fn worker_loop(
    inner: Arc<Inner>,
    idle: Arc<IdleSignal>,
    metrics: Option<Arc<dyn MetricsCollector>>,
) {
    loop {
        let task = {
            let mut slot = inner.slot.lock().unwrap();
            loop {
                if let Some(task) = slot.task.take() {
                    break task;
                }
                if slot.stop {
                    if let Some(m) = &metrics {
                        m.on_worker_stopped();
                    }
                    return;
                }
                slot = inner.wakeup.wait(slot).unwrap();
            }
        };

        if let Some(m) = &metrics {
            m.on_task_started();
        }

        // The task runs outside every pool lock. A panicking task must not
        // take the worker's bookkeeping down with it, so the unwind is
        // contained here and the idle transition below always happens.
        let _ = panic::catch_unwind(AssertUnwindSafe(task));

        if let Some(m) = &metrics {
            m.on_task_completed();
        }

        inner.busy.store(false, Ordering::Release);
        idle.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::time::Duration;

    fn wait_idle(worker: &PooledWorker) {
        while worker.is_busy() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn runs_assigned_tasks_and_returns_to_idle() {
        let idle = Arc::new(IdleSignal::new());
        let count = Arc::new(AtomicUsize::new(0));
        let mut worker = PooledWorker::spawn(Arc::clone(&idle), None);
        assert!(!worker.is_busy());

        for _ in 0..3 {
            let count = Arc::clone(&count);
            worker.assign(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
            wait_idle(&worker);
        }

        assert_eq!(count.load(Ordering::SeqCst), 3);
        worker.stop().unwrap();
    }

    #[test]
    fn spawn_with_task_starts_busy() {
        let idle = Arc::new(IdleSignal::new());
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = Arc::clone(&ran);
        let mut worker = PooledWorker::spawn_with_task(
            idle,
            None,
            Box::new(move || {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        wait_idle(&worker);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        worker.stop().unwrap();
    }

    #[test]
    fn panicking_task_leaves_worker_serviceable() {
        let idle = Arc::new(IdleSignal::new());
        let mut worker = PooledWorker::spawn(Arc::clone(&idle), None);

        worker.assign(Box::new(|| panic!("task blew up")));
        wait_idle(&worker);

        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = Arc::clone(&ran);
        worker.assign(Box::new(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }));
        wait_idle(&worker);

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        worker.stop().unwrap();
    }

    #[test]
    #[should_panic(expected = "assign called on a busy worker")]
    fn assign_to_busy_worker_panics() {
        let idle = Arc::new(IdleSignal::new());
        let worker = PooledWorker::spawn(idle, None);

        // Pin the worker on a task that blocks until released; dropping
        // the sender during unwind frees it so the drop handshake joins.
        let (_release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        worker.assign(Box::new(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }));
        started_rx.recv().unwrap();

        worker.assign(Box::new(|| {}));
    }

    #[test]
    #[should_panic(expected = "stop called on a busy worker")]
    fn stop_on_busy_worker_panics() {
        let idle = Arc::new(IdleSignal::new());
        let mut worker = PooledWorker::spawn(idle, None);

        let (_release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        worker.assign(Box::new(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }));
        started_rx.recv().unwrap();

        let _ = worker.stop();
    }

    #[test]
    fn drop_joins_the_worker_thread() {
        let idle = Arc::new(IdleSignal::new());
        let worker = PooledWorker::spawn(idle, None);
        drop(worker);
    }
}
