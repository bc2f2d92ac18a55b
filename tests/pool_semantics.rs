//! Dispatch semantics: exactly-once execution, FIFO admission, bounded
//! growth, worker reuse, and the wait-for-all barrier.

use lazypool::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn every_task_runs_exactly_once() {
    let pool = ThreadPool::new(4);
    pool.start();

    let count = Arc::new(AtomicUsize::new(0));
    for _ in 0..1000 {
        let count = Arc::clone(&count);
        pool.submit(Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        }));
    }

    pool.wait_for_all();
    assert_eq!(count.load(Ordering::SeqCst), 1000);
    pool.stop().unwrap();
}

#[test]
fn concurrent_submitters_lose_nothing() {
    let pool = ThreadPool::new(4);
    pool.start();
    let count = Arc::new(AtomicUsize::new(0));

    crossbeam::thread::scope(|s| {
        for _ in 0..8 {
            let pool = &pool;
            let count = &count;
            s.spawn(move |_| {
                for _ in 0..100 {
                    let count = Arc::clone(count);
                    pool.submit(Box::new(move || {
                        count.fetch_add(1, Ordering::SeqCst);
                    }));
                }
            });
        }
    })
    .unwrap();

    pool.wait_for_all();
    assert_eq!(count.load(Ordering::SeqCst), 800);
    pool.stop().unwrap();
}

#[test]
fn single_worker_dispatches_in_submission_order() {
    // With one worker the pool is permanently saturated, so admission
    // order is fully observable through execution order.
    let pool = ThreadPool::new(1);
    pool.start();

    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..50 {
        let order = Arc::clone(&order);
        pool.submit(Box::new(move || {
            order.lock().unwrap().push(i);
        }));
    }

    pool.wait_for_all();
    let order = order.lock().unwrap();
    assert_eq!(*order, (0..50).collect::<Vec<_>>());
    pool.stop().unwrap();
}

#[test]
fn growth_is_bounded_by_max_workers() {
    let pool = ThreadPoolBuilder::new().max_workers(4).build();
    pool.start();

    for _ in 0..1000 {
        pool.submit(Box::new(|| {
            thread::sleep(Duration::from_micros(50));
        }));
    }

    pool.wait_for_all();
    assert!(pool.worker_count() <= 4, "a fifth worker was created");
    assert_eq!(pool.max_workers(), 4);
    pool.stop().unwrap();
}

#[test]
fn idle_workers_are_reused_before_growing() {
    let pool = ThreadPool::new(4);
    pool.start();

    pool.spawn(|| {}).join().unwrap();
    pool.wait_for_all();
    assert_eq!(pool.worker_count(), 1);

    // The first worker is idle again; a new task must not grow the pool.
    pool.spawn(|| {}).join().unwrap();
    pool.wait_for_all();
    assert_eq!(pool.worker_count(), 1);

    pool.stop().unwrap();
}

#[test]
fn wait_for_all_converges_to_idle() {
    let pool = ThreadPool::new(2);
    pool.start();

    for _ in 0..20 {
        pool.submit(Box::new(|| {
            thread::sleep(Duration::from_millis(5));
        }));
    }

    pool.wait_for_all();
    assert_eq!(pool.queued(), 0);

    // With no outstanding work, a second barrier returns immediately.
    let begin = Instant::now();
    pool.wait_for_all();
    assert!(begin.elapsed() < Duration::from_millis(100));

    pool.stop().unwrap();
}

#[test]
fn third_task_waits_for_a_free_worker() {
    let pool = ThreadPool::new(2);
    pool.start();

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    for name in ["T1", "T2", "T3"] {
        let log = Arc::clone(&log);
        pool.submit(Box::new(move || {
            log.lock().unwrap().push(format!("{name}:start"));
            thread::sleep(Duration::from_millis(100));
            log.lock().unwrap().push(format!("{name}:end"));
        }));
    }

    pool.wait_for_all();
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 6);

    let pos = |entry: &str| log.iter().position(|e| e == entry).unwrap();
    // Two workers, three tasks: T3 cannot be admitted until T1 or T2 has
    // finished and freed its worker.
    assert!(pos("T3:start") > pos("T1:end") || pos("T3:start") > pos("T2:end"));

    pool.stop().unwrap();
}
