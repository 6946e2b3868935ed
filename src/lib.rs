#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Batch
//!
//! Batch partitioning and fan-out/fan-in dispatch for large in-memory
//! collections.
//!
//! ## Overview
//!
//! Given an ordered collection and a per-batch action, the crate splits the
//! collection into fixed-size batches, invokes the action once per batch,
//! and, for actions that produce values, reassembles the per-batch results
//! into one ordered collection.
//!
//! Two execution modes are provided:
//!
//! - **Sequential**: batches run in order on the calling thread; the first
//!   failure aborts the rest.
//! - **Concurrent**: one task per batch on an [`ExecutionContext`] (the shared
//!   [`WorkerPool`] by default). The caller blocks until every task resolves;
//!   results are assembled in input order whatever order tasks finish in.
//!
//! ## Module Organization
//!
//! - [`partition`] - Eager and lazy partitioning
//! - [`action`] - The per-batch action traits
//! - [`dispatch`] - Sequential and concurrent dispatchers
//! - [`execution`] - Execution contexts, task handles and the worker pool
//! - [`facade`] - Default-size entry points and [`BatchDispatcher`]
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use tasker_batch::{produce_batches_concurrent, run_batches};
//!
//! # fn main() -> tasker_batch::Result<()> {
//! let ids: Vec<u64> = (0..9999).collect();
//!
//! run_batches(
//!     &|batch: &[u64]| -> anyhow::Result<()> {
//!         assert!(batch.len() <= 1000);
//!         Ok(())
//!     },
//!     &ids,
//! )?;
//!
//! let labels = produce_batches_concurrent(
//!     |batch: &[u64]| -> anyhow::Result<Vec<String>> {
//!         Ok(batch.iter().map(|id| format!("id-{id}")).collect())
//!     },
//!     ids,
//! )?;
//! assert_eq!(labels.len(), 9999);
//! assert_eq!(labels[1000], "id-1000");
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod facade;
pub mod logging;
pub mod partition;

pub use action::{BatchProduce, BatchRun, Shared};
pub use config::{BatchConfig, ConfigManager, ConfigurationError};
pub use constants::DEFAULT_BATCH_SIZE;
pub use dispatch::{produce_concurrent, produce_sequential, run_concurrent, run_sequential};
pub use error::{BatchError, Result};
pub use execution::{ExecutionContext, InlineContext, Job, TaskHandle, WorkerPool};
pub use facade::{
    produce_batches, produce_batches_concurrent, produce_batches_with_context, run_batches,
    run_batches_concurrent, run_batches_with_context, BatchDispatcher,
};
pub use logging::init_structured_logging;
pub use partition::{batches, partition, partition_default, partition_owned, Batches};
