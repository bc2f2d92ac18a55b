use lazypool::ThreadPoolBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    let pool = ThreadPoolBuilder::new().max_workers(3).build();
    pool.start();

    let completed = Arc::new(AtomicUsize::new(0));
    for i in 0..12 {
        let completed = completed.clone();
        pool.submit(Box::new(move || {
            thread::sleep(Duration::from_millis(100));
            println!("Task {i} finished");
            completed.fetch_add(1, Ordering::SeqCst);
        }));
    }

    println!("Waiting for the batch to drain...");
    pool.wait_for_all();
    println!(
        "All {} tasks done on {} workers.",
        completed.load(Ordering::SeqCst),
        pool.worker_count()
    );

    pool.stop().unwrap();
}
