//! # Batch Error Types
//!
//! Structured error handling for partitioning and dispatch using thiserror.
//! Failures raised by caller-supplied actions travel as [`anyhow::Error`] so
//! actions can propagate any error type with `?`.

use crate::config::ConfigurationError;
use thiserror::Error;

/// Errors produced by the partitioner and the dispatchers
#[derive(Error, Debug)]
pub enum BatchError {
    /// Rejected before any batch work began
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The action failed while processing one batch
    #[error("Batch {batch_index} ({batch_len} items) failed: {source}")]
    BatchFailure {
        batch_index: usize,
        batch_len: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Concurrent dispatch joined every task and at least one had failed
    #[error("{failed} of {total} concurrent batch tasks failed: {source}")]
    AggregateWaitFailure {
        failed: usize,
        total: usize,
        #[source]
        source: Box<BatchError>,
    },

    /// An execution context could not be built
    #[error("Execution context unavailable: {message}")]
    ContextUnavailable { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl BatchError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn batch_failure(batch_index: usize, batch_len: usize, source: anyhow::Error) -> Self {
        Self::BatchFailure {
            batch_index,
            batch_len,
            source,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Index of the failed batch, looking through an aggregate wrapper
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::BatchFailure { batch_index, .. } => Some(*batch_index),
            Self::AggregateWaitFailure { source, .. } => source.batch_index(),
            _ => None,
        }
    }

    /// The caller's original failure, looking through an aggregate wrapper
    pub fn action_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::BatchFailure { source, .. } => Some(source),
            Self::AggregateWaitFailure { source, .. } => source.action_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
