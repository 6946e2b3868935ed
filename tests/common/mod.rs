//! Shared helpers for dispatch integration tests

#![allow(dead_code)]

pub mod strategies;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tasker_batch::{ExecutionContext, Job, WorkerPool};

/// Sequence `0..count` as the standard test input
pub fn numbered_items(count: u32) -> Vec<u32> {
    (0..count).collect()
}

/// Sleep longer for earlier batches so tasks complete roughly in reverse
pub fn reverse_completion_delay(batch_index: usize, batch_count: usize) {
    let millis = (batch_count - batch_index) as u64 * 3;
    std::thread::sleep(Duration::from_millis(millis));
}

/// Execution context that counts submissions before handing jobs to a
/// dedicated worker runtime
pub struct CountingContext {
    pub pool: WorkerPool,
    pub submitted: Arc<AtomicUsize>,
}

impl CountingContext {
    pub fn new(threads: usize) -> Self {
        Self {
            pool: WorkerPool::new(threads, "counting-context").expect("pool should start"),
            submitted: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl ExecutionContext for CountingContext {
    fn execute(&self, job: Job) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.pool.execute(job);
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Execution context that silently discards every job
pub struct BlackHoleContext;

impl ExecutionContext for BlackHoleContext {
    fn execute(&self, job: Job) {
        drop(job);
    }
}
