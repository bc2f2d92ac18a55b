//! Task abstraction and result delivery for the thread pool.
//!
//! The pool core only ever sees a [`Task`]: a boxed, zero-argument closure
//! with no return value. Callers that want a result back go through
//! [`wrap_task`], which adapts an arbitrary closure into a `Task` plus a
//! [`TaskHandle`] carrying the eventual return value (or the panic payload,
//! if the closure panicked).

use std::panic::AssertUnwindSafe;
use std::sync::mpsc::channel;

/// A unit of work as the pool core sees it: no arguments, no return value.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A handle to the eventual result of a wrapped task.
pub struct TaskHandle<T> {
    receiver: std::sync::mpsc::Receiver<std::thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task has run and returns its result.
    ///
    /// Returns `Err` with the panic payload if the task panicked.
    pub fn join(self) -> std::thread::Result<T> {
        self.receiver.recv().expect("task result channel closed")
    }
}

/// Wraps a closure into a submittable [`Task`] and a [`TaskHandle`] for its
/// result. A panic inside the closure is captured and delivered through the
/// handle rather than unwinding into the worker thread.
pub fn wrap_task<F, T>(f: F) -> (Task, TaskHandle<T>)
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = channel();
    let task = Box::new(move || {
        let res = std::panic::catch_unwind(AssertUnwindSafe(f));
        let _ = tx.send(res);
    });
    (task, TaskHandle { receiver: rx })
}
