//! # Dispatchers
//!
//! Apply an action to every batch of a collection, either sequentially on
//! the calling thread or concurrently on an execution context.
//!
//! Both dispatchers reject empty input and a zero batch size before any
//! batch work begins.

pub mod concurrent;
pub mod sequential;

pub use concurrent::{produce_concurrent, run_concurrent};
pub use sequential::{produce_sequential, run_sequential};

use crate::error::{BatchError, Result};
use crate::partition::ensure_batch_size;

pub(crate) fn validate_request(item_count: usize, batch_size: usize) -> Result<()> {
    if item_count == 0 {
        return Err(BatchError::invalid_argument("items must not be empty"));
    }
    ensure_batch_size(batch_size)
}

pub(crate) fn elapsed_ms(started: std::time::Instant) -> Option<u64> {
    u64::try_from(started.elapsed().as_millis()).ok()
}
