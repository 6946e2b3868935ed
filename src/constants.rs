//! # System Constants
//!
//! Defaults and names shared across partitioning, dispatch and configuration.

/// Batch size used when a caller does not supply one
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Worker count when the platform cannot report its parallelism
pub const FALLBACK_WORKER_THREADS: usize = 4;

/// Cap on threads running batch jobs at once; matches tokio's own default
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 512;

pub const DEFAULT_THREAD_NAME_PREFIX: &str = "tasker-batch-worker";

/// Prefix for configuration environment variables (`TASKER_BATCH_DEFAULT_BATCH_SIZE`, ...)
pub const ENV_PREFIX: &str = "TASKER_BATCH";

/// File stem looked up inside a configuration directory
pub const CONFIG_FILE_STEM: &str = "tasker-batch";

/// Dispatch operation names used in structured log records
pub mod operations {
    pub const RUN_SEQUENTIAL: &str = "run_sequential";
    pub const PRODUCE_SEQUENTIAL: &str = "produce_sequential";
    pub const RUN_CONCURRENT: &str = "run_concurrent";
    pub const PRODUCE_CONCURRENT: &str = "produce_concurrent";
}
