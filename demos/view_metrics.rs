use lazypool::metrics::{AtomicMetricsCollector, ThreadPoolMetrics};
use lazypool::{log_metrics, ThreadPoolBuilder};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

fn main() {
    let metrics = Arc::new(ThreadPoolMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));

    let pool = ThreadPoolBuilder::new()
        .max_workers(4)
        .with_metrics_collector(collector)
        .build();
    pool.start();

    // Monitoring thread displaying live counter updates.
    let running = Arc::new(AtomicBool::new(true));
    let metrics_clone = metrics.clone();
    let running_clone = running.clone();
    let monitor_handle = thread::spawn(move || {
        while running_clone.load(Ordering::Acquire) {
            println!("\n--- Metrics ---");
            log_metrics!(metrics_clone);
            thread::sleep(Duration::from_millis(80));
        }
    });

    for _ in 0..10 {
        pool.submit(Box::new(|| {
            thread::sleep(Duration::from_millis(100));
        }));
    }

    pool.wait_for_all();
    pool.stop().unwrap();

    running.store(false, Ordering::Release);
    monitor_handle.join().unwrap();

    println!("\n--- Final Metrics ---");
    log_metrics!(metrics);
}
