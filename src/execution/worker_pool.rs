//! # Worker Pool
//!
//! A dedicated multi-thread Tokio runtime used as an [`ExecutionContext`].
//! Batch jobs go to the runtime's blocking pool, which grows on demand up to
//! `max_blocking_threads`, so a job that dispatches nested batches and waits
//! on them still leaves room for the nested jobs to run.
//!
//! [`WorkerPool::global`] is the default context for concurrent dispatch:
//! created lazily on first use, never torn down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, info};

use super::context::{ExecutionContext, Job};
use crate::config::BatchConfig;
use crate::constants::DEFAULT_MAX_BLOCKING_THREADS;
use crate::error::{BatchError, Result};

static GLOBAL_POOL: OnceLock<WorkerPool> = OnceLock::new();

/// Tokio runtime implementing [`ExecutionContext`]
#[derive(Debug)]
pub struct WorkerPool {
    /// `None` only for the degraded inline pool, or once shut down
    runtime: Option<Runtime>,
    worker_threads: usize,
    name_prefix: String,
}

impl WorkerPool {
    /// Create a pool with `threads` runtime workers; every thread it starts
    /// is named `<name_prefix>-<n>`
    pub fn new(threads: usize, name_prefix: impl Into<String>) -> Result<Self> {
        Self::build(threads, DEFAULT_MAX_BLOCKING_THREADS, name_prefix.into())
    }

    /// Create a pool sized and named by `config`
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        config.validate()?;
        Self::build(
            config.worker_threads,
            config.max_blocking_threads,
            config.thread_name_prefix.clone(),
        )
    }

    fn build(threads: usize, max_blocking_threads: usize, name_prefix: String) -> Result<Self> {
        if threads == 0 || max_blocking_threads == 0 {
            return Err(BatchError::invalid_argument(
                "worker pool needs at least one thread",
            ));
        }

        let thread_counter = Arc::new(AtomicUsize::new(0));
        let thread_prefix = name_prefix.clone();
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .max_blocking_threads(max_blocking_threads)
            .thread_name_fn(move || {
                let index = thread_counter.fetch_add(1, Ordering::Relaxed);
                format!("{thread_prefix}-{index}")
            })
            .enable_all()
            .build()
            .map_err(|e| BatchError::ContextUnavailable {
                message: format!("failed to build worker runtime '{name_prefix}': {e}"),
            })?;

        info!(
            pool = %name_prefix,
            worker_threads = threads,
            max_blocking_threads = max_blocking_threads,
            "🏊 POOL: Worker runtime started"
        );

        Ok(Self {
            runtime: Some(runtime),
            worker_threads: threads,
            name_prefix,
        })
    }

    /// The process-wide default pool
    ///
    /// Sized and named by [`BatchConfig::global`]. If the runtime cannot be
    /// built, jobs run on the submitting thread instead.
    pub fn global() -> &'static WorkerPool {
        GLOBAL_POOL.get_or_init(|| {
            let config = BatchConfig::global();
            Self::from_config(config).unwrap_or_else(|e| {
                error!(error = %e, "❌ POOL: Shared worker runtime unavailable, running inline");
                Self::degraded(config.thread_name_prefix.clone())
            })
        })
    }

    fn degraded(name_prefix: String) -> Self {
        Self {
            runtime: None,
            worker_threads: 0,
            name_prefix,
        }
    }

    /// Number of runtime worker threads
    pub fn size(&self) -> usize {
        self.worker_threads
    }

    /// Handle to the underlying runtime, `None` for a degraded pool
    pub fn handle(&self) -> Option<&tokio::runtime::Handle> {
        self.runtime.as_ref().map(Runtime::handle)
    }
}

impl ExecutionContext for WorkerPool {
    fn execute(&self, job: Job) {
        match &self.runtime {
            // Detached; completion is observed through the task handle slot
            Some(runtime) => drop(runtime.spawn_blocking(job)),
            None => job(),
        }
    }

    fn name(&self) -> &str {
        &self.name_prefix
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Running jobs finish on their own threads; queued ones are dropped
        // and their batches report as failed
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            debug!(pool = %self.name_prefix, "🛑 POOL: Worker runtime stopped");
        }
    }
}
