//! Sequential dispatch on the calling thread.
//!
//! The first failing batch aborts the call; batches that already ran are not
//! rolled back.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::{elapsed_ms, validate_request};
use crate::action::{BatchProduce, BatchRun};
use crate::constants::operations;
use crate::error::{BatchError, Result};
use crate::logging::log_dispatch_operation;
use crate::partition::batches;

/// Run `action` over every batch of `items`, in order
#[instrument(skip_all, fields(items = items.len(), batch_size = batch_size))]
pub fn run_sequential<T, A>(action: &A, items: &[T], batch_size: usize) -> Result<()>
where
    A: BatchRun<T> + ?Sized,
{
    validate_request(items.len(), batch_size)?;
    let started = Instant::now();

    let parts = batches(items, batch_size)?;
    let total = parts.len();
    for (batch_index, batch) in parts.enumerate() {
        action
            .run(batch)
            .map_err(|e| failure(operations::RUN_SEQUENTIAL, batch_index, batch, e))?;
        debug!(batch_index, batch_len = batch.len(), "✅ BATCH: Batch completed");
    }

    log_dispatch_operation(
        operations::RUN_SEQUENTIAL,
        items.len(),
        total,
        batch_size,
        "completed",
        elapsed_ms(started),
    );
    Ok(())
}

/// Run `action` over every batch of `items`, in order, concatenating results
#[instrument(skip_all, fields(items = items.len(), batch_size = batch_size))]
pub fn produce_sequential<T, R, A>(action: &A, items: &[T], batch_size: usize) -> Result<Vec<R>>
where
    A: BatchProduce<T, R> + ?Sized,
{
    validate_request(items.len(), batch_size)?;
    let started = Instant::now();

    let parts = batches(items, batch_size)?;
    let total = parts.len();

    let results = if total == 1 {
        // Under the threshold: hand back the action's own vector
        action
            .produce(items)
            .map_err(|e| failure(operations::PRODUCE_SEQUENTIAL, 0, items, e))?
    } else {
        let mut results = Vec::with_capacity(items.len());
        for (batch_index, batch) in parts.enumerate() {
            let produced = action
                .produce(batch)
                .map_err(|e| failure(operations::PRODUCE_SEQUENTIAL, batch_index, batch, e))?;
            debug!(
                batch_index,
                batch_len = batch.len(),
                produced = produced.len(),
                "✅ BATCH: Batch completed"
            );
            results.extend(produced);
        }
        results
    };

    log_dispatch_operation(
        operations::PRODUCE_SEQUENTIAL,
        items.len(),
        total,
        batch_size,
        "completed",
        elapsed_ms(started),
    );
    Ok(results)
}

fn failure<T>(
    operation: &str,
    batch_index: usize,
    batch: &[T],
    source: anyhow::Error,
) -> BatchError {
    warn!(
        operation = %operation,
        batch_index,
        batch_len = batch.len(),
        error = %source,
        "❌ BATCH: Batch failed, aborting remaining batches"
    );
    BatchError::batch_failure(batch_index, batch.len(), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_empty_items_never_invoke_action() {
        let calls = RefCell::new(0);
        let action = |_: &[u32]| -> anyhow::Result<()> {
            *calls.borrow_mut() += 1;
            Ok(())
        };

        let items: [u32; 0] = [];
        let err = run_sequential(&action, &items, 1000).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let action = |_: &[u32]| -> anyhow::Result<Vec<u32>> { Ok(Vec::new()) };
        let err = produce_sequential(&action, &[1u32, 2], 0).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_batches_run_in_order() {
        let seen = RefCell::new(Vec::new());
        let action = |batch: &[u32]| -> anyhow::Result<()> {
            seen.borrow_mut().push(batch.to_vec());
            Ok(())
        };

        run_sequential(&action, &[1u32, 2, 3, 4, 5], 2).unwrap();
        assert_eq!(*seen.borrow(), vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn test_single_batch_gets_whole_collection() {
        let seen = RefCell::new(Vec::new());
        let action = |batch: &[u32]| -> anyhow::Result<Vec<u32>> {
            seen.borrow_mut().push(batch.len());
            Ok(batch.iter().map(|n| n * 10).collect())
        };

        let out = produce_sequential(&action, &[1u32, 2, 3], 3).unwrap();
        assert_eq!(out, vec![10, 20, 30]);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn test_failure_stops_later_batches() {
        let calls = RefCell::new(Vec::new());
        let action = |batch: &[u32]| -> anyhow::Result<()> {
            calls.borrow_mut().push(batch[0]);
            if batch[0] == 20 {
                anyhow::bail!("batch starting at 20 is poisoned");
            }
            Ok(())
        };

        let items: Vec<u32> = (0..50).collect();
        let err = run_sequential(&action, &items, 10).unwrap_err();
        assert_eq!(err.batch_index(), Some(2));
        assert!(matches!(err, BatchError::BatchFailure { batch_len: 10, .. }));
        assert_eq!(*calls.borrow(), vec![0, 10, 20]);
    }

    #[test]
    fn test_produce_concatenates_variable_length_results() {
        // Each batch yields one element per even item
        let action = |batch: &[u32]| -> anyhow::Result<Vec<u32>> {
            Ok(batch.iter().copied().filter(|n| n % 2 == 0).collect())
        };
        let items: Vec<u32> = (0..10).collect();
        let out = produce_sequential(&action, &items, 3).unwrap();
        assert_eq!(out, vec![0, 2, 4, 6, 8]);
    }
}
