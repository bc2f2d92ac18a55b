use lazypool::{ThreadPool, ThreadPoolBuilder};

#[test]
fn test_basic_pool() {
    let pool = ThreadPool::new(2);
    pool.start();
    let handle = pool.spawn(|| 42);
    assert_eq!(handle.join().unwrap(), 42);
    pool.stop().unwrap();
}

#[test]
fn test_builder_pool() {
    let pool = ThreadPoolBuilder::new().max_workers(4).build();
    pool.start();
    let handle = pool.spawn(|| "hello");
    assert_eq!(handle.join().unwrap(), "hello");
    pool.stop().unwrap();
}

#[test]
fn test_panic_is_reported_through_handle() {
    let pool = ThreadPool::new(1);
    pool.start();
    let handle = pool.spawn(|| -> i32 { panic!("task blew up") });
    assert!(handle.join().is_err());

    // The worker survives the panic and keeps serving tasks.
    let handle = pool.spawn(|| 7);
    assert_eq!(handle.join().unwrap(), 7);
    pool.stop().unwrap();
}

#[test]
#[should_panic(expected = "max_workers must be positive")]
fn test_zero_max_workers_is_rejected() {
    let _ = ThreadPool::new(0);
}
