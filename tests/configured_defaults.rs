//! Process-wide defaults picked up from `TASKER_BATCH_*` variables
//!
//! Runs as its own test binary with a single test so the variables are set
//! before anything loads the process configuration.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tasker_batch::{
    partition_default, produce_batches, produce_batches_concurrent, BatchConfig, BatchDispatcher,
    ExecutionContext, WorkerPool,
};

#[test]
fn test_environment_overrides_default_entry_points() {
    std::env::set_var("TASKER_BATCH_DEFAULT_BATCH_SIZE", "250");
    std::env::set_var("TASKER_BATCH_WORKER_THREADS", "2");
    std::env::set_var("TASKER_BATCH_THREAD_NAME_PREFIX", "env-configured");

    assert_eq!(BatchConfig::global().default_batch_size, 250);
    assert_eq!(BatchDispatcher::new().batch_size(), 250);

    let items: Vec<u32> = (0..1000).collect();
    assert_eq!(partition_default(&items).len(), 4);

    let sizes = |batch: &[u32]| -> anyhow::Result<Vec<usize>> { Ok(vec![batch.len()]) };
    assert_eq!(produce_batches(&sizes, &items).unwrap(), vec![250; 4]);

    let threads = Arc::new(Mutex::new(HashSet::new()));
    let seen = Arc::clone(&threads);
    let concurrent = produce_batches_concurrent(
        move |batch: &[u32]| -> anyhow::Result<Vec<usize>> {
            let name = std::thread::current().name().unwrap_or_default().to_string();
            seen.lock().unwrap().insert(name);
            Ok(vec![batch.len()])
        },
        items,
    )
    .unwrap();
    assert_eq!(concurrent, vec![250; 4]);

    let pool = WorkerPool::global();
    assert_eq!(pool.size(), 2);
    assert_eq!(pool.name(), "env-configured");
    assert!(threads
        .lock()
        .unwrap()
        .iter()
        .all(|name| name.starts_with("env-configured-")));
}
