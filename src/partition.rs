//! # Partitioner
//!
//! Splits an ordered collection into contiguous, non-overlapping batches.
//! Concatenating the batches in order always reproduces the input.

use std::iter::FusedIterator;
use std::slice::Chunks;

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};

pub(crate) fn ensure_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(BatchError::invalid_argument(
            "batch size must be greater than 0",
        ));
    }
    Ok(())
}

/// Partition `items` into batches of at most `batch_size` elements
///
/// Returns an empty vector for empty input and a single batch (the input
/// slice itself) when `items.len() <= batch_size`.
pub fn partition<T>(items: &[T], batch_size: usize) -> Result<Vec<&[T]>> {
    Ok(batches(items, batch_size)?.collect())
}

/// [`partition`] with the process-wide default batch size (1000 unless
/// overridden by `TASKER_BATCH_DEFAULT_BATCH_SIZE`)
pub fn partition_default<T>(items: &[T]) -> Vec<&[T]> {
    items.chunks(BatchConfig::global().default_batch_size).collect()
}

/// Lazy variant of [`partition`]: yields batches one at a time
pub fn batches<T>(items: &[T], batch_size: usize) -> Result<Batches<'_, T>> {
    ensure_batch_size(batch_size)?;
    Ok(Batches {
        inner: items.chunks(batch_size),
    })
}

/// Partition an owned collection, moving elements into owned batches
///
/// The single-batch case hands back the input vector without reallocating.
pub fn partition_owned<T>(items: Vec<T>, batch_size: usize) -> Result<Vec<Vec<T>>> {
    ensure_batch_size(batch_size)?;

    if items.is_empty() {
        return Ok(Vec::new());
    }
    if items.len() <= batch_size {
        return Ok(vec![items]);
    }

    let mut out = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut iter = items.into_iter();
    loop {
        let batch: Vec<T> = iter.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        out.push(batch);
    }
    Ok(out)
}

/// Single-pass iterator over the batches of a slice
#[derive(Debug, Clone)]
pub struct Batches<'a, T> {
    inner: Chunks<'a, T>,
}

impl<'a, T> Iterator for Batches<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Batches<'_, T> {}

impl<T> FusedIterator for Batches<'_, T> {}
