//! The idle-notification channel shared by workers and waiters.

use std::sync::{Condvar, Mutex};

/// A broadcast signal that workers fire whenever they transition back to
/// idle. The dispatcher blocks on it under back-pressure, `wait_for_all`
/// blocks on it for the drain barrier, and `stop` blocks on it while
/// in-flight tasks finish.
///
/// The generation counter is bumped under the same mutex the waiters hold
/// while evaluating their predicates, so a notification can never slip in
/// between a predicate check and the wait that follows it.
pub(crate) struct IdleSignal {
    generation: Mutex<u64>,
    cond: Condvar,
}

impl IdleSignal {
    pub(crate) fn new() -> Self {
        Self {
            generation: Mutex::new(0),
            cond: Condvar::new(),
        }
    }

    /// Announces an idle transition to every waiter.
    pub(crate) fn notify(&self) {
        let mut generation = self.generation.lock().unwrap();
        *generation = generation.wrapping_add(1);
        self.cond.notify_all();
    }

    /// Blocks until `ready` returns true. The predicate is re-evaluated
    /// after every wake-up; spurious and broadcast wake-ups are expected.
    pub(crate) fn wait_until<F>(&self, mut ready: F)
    where
        F: FnMut() -> bool,
    {
        let mut generation = self.generation.lock().unwrap();
        while !ready() {
            generation = self.cond.wait(generation).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdleSignal;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_until_observes_notification() {
        let signal = Arc::new(IdleSignal::new());
        let flag = Arc::new(AtomicBool::new(false));

        let waiter = {
            let signal = Arc::clone(&signal);
            let flag = Arc::clone(&flag);
            thread::spawn(move || {
                signal.wait_until(|| flag.load(Ordering::Acquire));
            })
        };

        thread::sleep(Duration::from_millis(20));
        flag.store(true, Ordering::Release);
        signal.notify();
        waiter.join().unwrap();
    }

    #[test]
    fn wait_until_returns_immediately_when_ready() {
        let signal = IdleSignal::new();
        signal.wait_until(|| true);
    }
}
