//! # Task Handles
//!
//! One in-flight batch invocation and the slot its outcome lands in.
//!
//! Each task writes only its own slot, then releases its barrier token. The
//! dispatcher waits on the barrier and reads the slots afterwards, so no
//! collector is ever shared between tasks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use tracing::{error, trace};

use super::context::ExecutionContext;
use crate::error::{BatchError, Result};

type Slot<O> = Arc<Mutex<Option<Result<O>>>>;

/// Handle to one concurrently dispatched batch
#[derive(Debug)]
pub struct TaskHandle<O> {
    batch_index: usize,
    batch_len: usize,
    slot: Slot<O>,
}

impl<O: Send + 'static> TaskHandle<O> {
    /// Submit `work` to `context`, holding a token on `barrier` until the
    /// outcome has been stored (or the job is dropped unrun).
    ///
    /// Errors and panics from `work` are captured as
    /// [`BatchError::BatchFailure`] for this batch.
    pub fn spawn<F>(
        batch_index: usize,
        batch_len: usize,
        context: &dyn ExecutionContext,
        barrier: &WaitGroup,
        work: F,
    ) -> Self
    where
        F: FnOnce() -> anyhow::Result<O> + Send + 'static,
    {
        let slot: Slot<O> = Arc::new(Mutex::new(None));
        let task_slot = Arc::clone(&slot);
        let token = barrier.clone();

        context.execute(Box::new(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(source)) => Err(BatchError::batch_failure(batch_index, batch_len, source)),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(batch_index, batch_len, panic = %message, "💥 BATCH: Task panicked");
                    Err(BatchError::batch_failure(
                        batch_index,
                        batch_len,
                        anyhow::anyhow!("batch task panicked: {message}"),
                    ))
                }
            };
            *task_slot.lock() = Some(outcome);
            trace!(batch_index, "BATCH: Task resolved");
            drop(token);
        }));

        Self {
            batch_index,
            batch_len,
            slot,
        }
    }
}

impl<O> TaskHandle<O> {
    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    pub fn batch_len(&self) -> usize {
        self.batch_len
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Take the outcome. Call only after the barrier has been waited on.
    ///
    /// An empty slot means the context discarded the job without running it.
    pub fn into_outcome(self) -> Result<O> {
        let outcome = self.slot.lock().take();
        outcome.unwrap_or_else(|| {
            Err(BatchError::batch_failure(
                self.batch_index,
                self.batch_len,
                anyhow::anyhow!("batch task dropped before completion"),
            ))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::context::{InlineContext, Job};

    struct DiscardingContext;

    impl ExecutionContext for DiscardingContext {
        fn execute(&self, job: Job) {
            drop(job);
        }
    }

    #[test]
    fn test_successful_task_stores_output() {
        let barrier = WaitGroup::new();
        let handle = TaskHandle::spawn(0, 3, &InlineContext, &barrier, || Ok(vec![1, 2, 3]));
        barrier.wait();
        assert!(handle.is_resolved());
        assert_eq!(handle.batch_len(), 3);
        assert_eq!(handle.into_outcome().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_error_is_captured_with_batch_index() {
        let barrier = WaitGroup::new();
        let handle: TaskHandle<()> =
            TaskHandle::spawn(4, 10, &InlineContext, &barrier, || anyhow::bail!("bad row"));
        barrier.wait();
        assert_eq!(handle.batch_index(), 4);
        let err = handle.into_outcome().unwrap_err();
        assert_eq!(err.batch_index(), Some(4));
        assert_eq!(err.to_string(), "Batch 4 (10 items) failed: bad row");
    }

    #[test]
    fn test_panic_is_captured() {
        let barrier = WaitGroup::new();
        let handle: TaskHandle<()> =
            TaskHandle::spawn(1, 1, &InlineContext, &barrier, || panic!("kaboom"));
        barrier.wait();
        let err = handle.into_outcome().unwrap_err();
        assert!(err.to_string().contains("batch task panicked: kaboom"));
    }

    #[test]
    fn test_dropped_job_releases_barrier_and_fails() {
        let barrier = WaitGroup::new();
        let handle: TaskHandle<()> =
            TaskHandle::spawn(2, 5, &DiscardingContext, &barrier, || Ok(()));
        barrier.wait();
        assert!(!handle.is_resolved());
        let err = handle.into_outcome().unwrap_err();
        assert!(err.to_string().contains("dropped before completion"));
    }
}
