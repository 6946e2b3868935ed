//! # Orchestration Facade
//!
//! Convenience entry points that pick the batch size and choose between the
//! sequential and concurrent dispatchers.
//!
//! ```rust
//! use std::sync::Arc;
//! use tasker_batch::{BatchDispatcher, InlineContext};
//!
//! # fn main() -> tasker_batch::Result<()> {
//! let dispatcher = BatchDispatcher::new()
//!     .with_batch_size(2)
//!     .with_context(Arc::new(InlineContext));
//!
//! let doubled = dispatcher.produce_concurrent(
//!     |batch: &[u32]| -> anyhow::Result<Vec<u32>> { Ok(batch.iter().map(|n| n * 2).collect()) },
//!     vec![1u32, 2, 3, 4, 5],
//! )?;
//! assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::action::{BatchProduce, BatchRun};
use crate::config::BatchConfig;
use crate::dispatch;
use crate::error::Result;
use crate::execution::ExecutionContext;

/// Batch size plus an optional execution context, reusable across calls
#[derive(Clone)]
pub struct BatchDispatcher {
    batch_size: usize,
    context: Option<Arc<dyn ExecutionContext>>,
}

impl BatchDispatcher {
    /// Process-wide configured batch size, shared worker pool
    pub fn new() -> Self {
        Self {
            batch_size: default_batch_size(),
            context: None,
        }
    }

    /// Use the configured default batch size
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            batch_size: config.default_batch_size,
            context: None,
        })
    }

    /// Validated when a dispatch method is called
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Run concurrent dispatches on `context` instead of the shared pool
    pub fn with_context(mut self, context: Arc<dyn ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn run<T, A>(&self, action: &A, items: &[T]) -> Result<()>
    where
        A: BatchRun<T> + ?Sized,
    {
        dispatch::run_sequential(action, items, self.batch_size)
    }

    pub fn produce<T, R, A>(&self, action: &A, items: &[T]) -> Result<Vec<R>>
    where
        A: BatchProduce<T, R> + ?Sized,
    {
        dispatch::produce_sequential(action, items, self.batch_size)
    }

    pub fn run_concurrent<T, A>(&self, action: A, items: Vec<T>) -> Result<()>
    where
        T: Send + 'static,
        A: BatchRun<T> + Send + Sync + 'static,
    {
        dispatch::run_concurrent(action, items, self.batch_size, self.context.as_deref())
    }

    pub fn produce_concurrent<T, R, A>(&self, action: A, items: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        A: BatchProduce<T, R> + Send + Sync + 'static,
    {
        dispatch::produce_concurrent(action, items, self.batch_size, self.context.as_deref())
    }
}

impl Default for BatchDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchDispatcher")
            .field("batch_size", &self.batch_size)
            .field(
                "context",
                &self.context.as_ref().map_or("shared-pool", |c| c.name()),
            )
            .finish()
    }
}

/// `TASKER_BATCH_DEFAULT_BATCH_SIZE` when set, otherwise
/// [`DEFAULT_BATCH_SIZE`](crate::DEFAULT_BATCH_SIZE)
fn default_batch_size() -> usize {
    BatchConfig::global().default_batch_size
}

/// Sequential dispatch with the default batch size
pub fn run_batches<T, A>(action: &A, items: &[T]) -> Result<()>
where
    A: BatchRun<T> + ?Sized,
{
    dispatch::run_sequential(action, items, default_batch_size())
}

/// Sequential dispatch with the default batch size, collecting results
pub fn produce_batches<T, R, A>(action: &A, items: &[T]) -> Result<Vec<R>>
where
    A: BatchProduce<T, R> + ?Sized,
{
    dispatch::produce_sequential(action, items, default_batch_size())
}

/// Concurrent dispatch on the shared pool with the default batch size
pub fn run_batches_concurrent<T, A>(action: A, items: Vec<T>) -> Result<()>
where
    T: Send + 'static,
    A: BatchRun<T> + Send + Sync + 'static,
{
    dispatch::run_concurrent(action, items, default_batch_size(), None)
}

/// Concurrent dispatch on the shared pool with the default batch size,
/// collecting results in input order
pub fn produce_batches_concurrent<T, R, A>(action: A, items: Vec<T>) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    A: BatchProduce<T, R> + Send + Sync + 'static,
{
    dispatch::produce_concurrent(action, items, default_batch_size(), None)
}

/// Concurrent dispatch on `context` with the default batch size
pub fn run_batches_with_context<T, A>(
    action: A,
    items: Vec<T>,
    context: &dyn ExecutionContext,
) -> Result<()>
where
    T: Send + 'static,
    A: BatchRun<T> + Send + Sync + 'static,
{
    dispatch::run_concurrent(action, items, default_batch_size(), Some(context))
}

/// Concurrent dispatch on `context` with the default batch size, collecting
/// results in input order
pub fn produce_batches_with_context<T, R, A>(
    action: A,
    items: Vec<T>,
    context: &dyn ExecutionContext,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    A: BatchProduce<T, R> + Send + Sync + 'static,
{
    dispatch::produce_concurrent(action, items, default_batch_size(), Some(context))
}
