//! FIFO holding area for tasks awaiting a worker.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

use crate::pool::task::Task;

/// An unbounded FIFO queue of pending tasks.
///
/// Producers (`submit`) push at the tail; the dispatcher is the sole
/// consumer and pops from the head. Because there is exactly one consumer,
/// the head of the queue cannot change between the dispatcher observing it
/// and popping it, which is what lets the dispatcher defer the pop until a
/// worker has actually been secured for the head task.
pub(crate) struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
    available: Condvar,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends a task at the tail and wakes the dispatcher.
    pub(crate) fn push(&self, task: Task) {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.push_back(task);
        self.available.notify_one();
    }

    /// Removes and returns the head task, if any.
    pub(crate) fn pop_front(&self) -> Option<Task> {
        self.tasks.lock().unwrap().pop_front()
    }

    /// Discards every pending task without running it. Returns how many
    /// were dropped. Used only during shutdown.
    pub(crate) fn clear(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap();
        let dropped = tasks.len();
        tasks.clear();
        dropped
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.lock().unwrap().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Blocks while the queue is empty and no shutdown has been requested.
    /// Returns `true` if a task is available at the head, `false` if the
    /// wait was cut short by shutdown.
    pub(crate) fn wait_for_task(&self, shutdown: &AtomicBool) -> bool {
        let mut tasks = self.tasks.lock().unwrap();
        while tasks.is_empty() && !shutdown.load(Ordering::Acquire) {
            tasks = self.available.wait(tasks).unwrap();
        }
        !tasks.is_empty()
    }

    /// Wakes a dispatcher blocked in [`wait_for_task`](Self::wait_for_task)
    /// so it can observe a shutdown request. Takes the queue lock so the
    /// wake-up cannot race past a waiter that has checked the flag but not
    /// yet parked.
    pub(crate) fn interrupt(&self) {
        let _tasks = self.tasks.lock().unwrap();
        self.available.notify_all();
    }
}
