//! # Execution Substrate
//!
//! What the concurrent dispatcher runs on: the [`ExecutionContext`]
//! capability, per-batch [`TaskHandle`]s, and the shared [`WorkerPool`].

pub mod context;
pub mod task_handle;
pub mod worker_pool;

pub use context::{ExecutionContext, InlineContext, Job};
pub use task_handle::TaskHandle;
pub use worker_pool::WorkerPool;
