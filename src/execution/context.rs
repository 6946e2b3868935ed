//! Execution contexts: anything that can accept a unit of work and run it.

use std::sync::Arc;

/// A unit of work submitted to an [`ExecutionContext`]
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Facility that runs submitted jobs, eventually
///
/// This is the only capability the concurrent dispatcher needs. The
/// dispatcher never creates, resizes or shuts down a caller-supplied context.
///
/// Dropping a job without running it is allowed; the dispatcher reports the
/// affected batch as failed rather than waiting forever.
pub trait ExecutionContext: Send + Sync {
    fn execute(&self, job: Job);

    /// Short name used in log records
    fn name(&self) -> &str {
        "custom"
    }
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for Arc<C> {
    fn execute(&self, job: Job) {
        (**self).execute(job);
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Runs batches on a Tokio runtime's blocking thread pool
///
/// Do not call a blocking dispatch from a runtime worker thread; wrap the
/// call in `tokio::task::spawn_blocking` instead.
impl ExecutionContext for tokio::runtime::Handle {
    fn execute(&self, job: Job) {
        // Detached; completion is observed through the task handle slot
        drop(self.spawn_blocking(job));
    }

    fn name(&self) -> &str {
        "tokio"
    }
}

/// Runs each job immediately on the submitting thread
///
/// Turns concurrent dispatch into deterministic, in-order execution, which
/// is mostly useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineContext;

impl ExecutionContext for InlineContext {
    fn execute(&self, job: Job) {
        job();
    }

    fn name(&self) -> &str {
        "inline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_inline_context_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        InlineContext.execute(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_arc_context_delegates() {
        let context: Arc<dyn ExecutionContext> = Arc::new(InlineContext);
        assert_eq!(context.name(), "inline");

        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        context.execute(Box::new(move || {
            c.fetch_add(2, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
