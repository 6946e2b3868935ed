//! # Concurrent Dispatch
//!
//! Fan-out/fan-in over an execution context:
//!
//! 1. partition the owned input, one batch per task
//! 2. submit every task in batch order, each with its own outcome slot
//! 3. wait on a barrier until every task has resolved (no early abort)
//! 4. drain the slots in batch order, so results follow input order
//!    regardless of completion order
//!
//! If any task failed the call fails as a whole and no partial result is
//! returned. When several tasks fail, the failure of the highest-indexed
//! batch is reported and the total count is carried in
//! [`BatchError::AggregateWaitFailure`].

use std::sync::Arc;
use std::time::Instant;

use crossbeam::sync::WaitGroup;
use tracing::{debug, instrument, warn};

use super::{elapsed_ms, validate_request};
use crate::action::{BatchProduce, BatchRun};
use crate::constants::operations;
use crate::error::{BatchError, Result};
use crate::execution::{ExecutionContext, TaskHandle, WorkerPool};
use crate::logging::log_dispatch_operation;
use crate::partition::partition_owned;

/// Run `action` over every batch of `items` concurrently
///
/// Uses the shared [`WorkerPool`] when `context` is `None`. Blocks until
/// every batch task has finished, even when some fail.
#[instrument(skip_all, fields(items = items.len(), batch_size = batch_size))]
pub fn run_concurrent<T, A>(
    action: A,
    items: Vec<T>,
    batch_size: usize,
    context: Option<&dyn ExecutionContext>,
) -> Result<()>
where
    T: Send + 'static,
    A: BatchRun<T> + Send + Sync + 'static,
{
    let action = Arc::new(action);
    fan_out(
        operations::RUN_CONCURRENT,
        items,
        batch_size,
        context,
        move |batch: Vec<T>| (*action).run(&batch),
    )
    .map(|_| ())
}

/// Run `action` over every batch of `items` concurrently, concatenating the
/// per-batch results in batch order
#[instrument(skip_all, fields(items = items.len(), batch_size = batch_size))]
pub fn produce_concurrent<T, R, A>(
    action: A,
    items: Vec<T>,
    batch_size: usize,
    context: Option<&dyn ExecutionContext>,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    A: BatchProduce<T, R> + Send + Sync + 'static,
{
    let item_count = items.len();
    let action = Arc::new(action);
    let mut outputs = fan_out(
        operations::PRODUCE_CONCURRENT,
        items,
        batch_size,
        context,
        move |batch: Vec<T>| (*action).produce(&batch),
    )?;

    if outputs.len() == 1 {
        return Ok(outputs.pop().unwrap_or_default());
    }

    let mut results = Vec::with_capacity(item_count);
    for produced in outputs {
        results.extend(produced);
    }
    Ok(results)
}

/// Submit one task per batch, join all of them, return outputs in batch order
fn fan_out<T, O, F>(
    operation: &'static str,
    items: Vec<T>,
    batch_size: usize,
    context: Option<&dyn ExecutionContext>,
    work: F,
) -> Result<Vec<O>>
where
    T: Send + 'static,
    O: Send + 'static,
    F: Fn(Vec<T>) -> anyhow::Result<O> + Send + Sync + 'static,
{
    validate_request(items.len(), batch_size)?;
    let context: &dyn ExecutionContext = match context {
        Some(context) => context,
        None => WorkerPool::global(),
    };

    let started = Instant::now();
    let item_count = items.len();
    let work = Arc::new(work);
    let barrier = WaitGroup::new();

    let handles: Vec<TaskHandle<O>> = partition_owned(items, batch_size)?
        .into_iter()
        .enumerate()
        .map(|(batch_index, batch)| {
            let work = Arc::clone(&work);
            let batch_len = batch.len();
            TaskHandle::spawn(batch_index, batch_len, context, &barrier, move || {
                (*work)(batch)
            })
        })
        .collect();

    let total = handles.len();
    debug!(
        operation = %operation,
        context = %context.name(),
        tasks = total,
        "🚀 BATCH: Tasks dispatched, waiting for all to resolve"
    );

    barrier.wait();

    let mut outputs = Vec::with_capacity(total);
    let mut failed = 0;
    let mut reported = None;
    for handle in handles {
        match handle.into_outcome() {
            Ok(output) => outputs.push(output),
            Err(e) => {
                warn!(
                    operation = %operation,
                    batch_index = e.batch_index(),
                    error = %e,
                    "❌ BATCH: Concurrent batch failed"
                );
                failed += 1;
                reported = Some(e);
            }
        }
    }

    if let Some(source) = reported {
        log_dispatch_operation(
            operation,
            item_count,
            total,
            batch_size,
            "failed",
            elapsed_ms(started),
        );
        return Err(BatchError::AggregateWaitFailure {
            failed,
            total,
            source: Box::new(source),
        });
    }

    log_dispatch_operation(
        operation,
        item_count,
        total,
        batch_size,
        "completed",
        elapsed_ms(started),
    );
    Ok(outputs)
}
