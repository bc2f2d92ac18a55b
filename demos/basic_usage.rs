use lazypool::ThreadPool;
use std::thread;
use std::time::Duration;

fn do_things(task_id: i32) -> bool {
    println!("Starting task {task_id}");
    thread::sleep(Duration::from_millis(200));
    println!("Done {task_id}");
    task_id % 2 == 0
}

fn main() {
    let pool = ThreadPool::new(10);
    pool.start();

    let handles: Vec<_> = (0..100).map(|i| pool.spawn(move || do_things(i))).collect();

    println!("Counting results...");
    let results = handles
        .into_iter()
        .map(|h| h.join())
        .filter(|r| matches!(r, Ok(true)))
        .count();
    println!("There were {results} results.");

    pool.stop().unwrap();
}
