//! The dispatch loop: matches queued tasks to idle workers and grows the
//! worker set on demand.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::pool::worker::PooledWorker;
use crate::pool::PoolShared;

/// Single control loop, one per pool, and the sole consumer of the task
/// queue.
///
/// A head task is only removed from the queue once a worker has been
/// secured for it: an idle worker spotted in the scan, or a freshly spawned
/// one when the collection is below its ceiling. Under back-pressure the
/// head stays enqueued and the loop parks on the idle signal, so the same
/// head is retried after every wake and FIFO admission order is preserved.
pub(crate) fn dispatch_loop(shared: Arc<PoolShared>) {
    while !shared.shutdown.load(Ordering::Acquire) {
        if !shared.queue.wait_for_task(&shared.shutdown) {
            break;
        }

        let mut workers = shared.workers.lock().unwrap();
        if let Some(free) = workers.iter().position(|w| !w.is_busy()) {
            // Pop and assign under the workers lock, so no observer can
            // see the task gone from the queue without the worker already
            // marked busy.
            if let Some(task) = shared.queue.pop_front() {
                workers[free].assign(task);
            }
        } else if workers.len() < shared.max_workers {
            if let Some(task) = shared.queue.pop_front() {
                workers.push(PooledWorker::spawn_with_task(
                    Arc::clone(&shared.idle),
                    shared.metrics.clone(),
                    task,
                ));
            }
        } else {
            drop(workers);
            // Saturated: every worker busy and no headroom to grow. The
            // head task stays where it is until a worker reports idle.
            shared.idle.wait_until(|| {
                shared.shutdown.load(Ordering::Acquire)
                    || shared
                        .workers
                        .lock()
                        .unwrap()
                        .iter()
                        .any(|w| !w.is_busy())
            });
        }
    }
}
