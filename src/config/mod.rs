//! # Batch Configuration
//!
//! Defaults for batch sizing and for the process-wide worker pool.
//!
//! Values are layered: built-in defaults, then optional TOML/YAML/JSON files
//! (a base file plus an environment-specific override), then `TASKER_BATCH_*`
//! environment variables.
//!
//! ```rust,no_run
//! use tasker_batch::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let batch_size = manager.config().default_batch_size;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::OnceLock;
use tracing::warn;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_BLOCKING_THREADS, DEFAULT_THREAD_NAME_PREFIX,
    FALLBACK_WORKER_THREADS,
};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

static PROCESS_CONFIG: OnceLock<BatchConfig> = OnceLock::new();

/// Batch dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Batch size used when a caller does not pick one
    #[serde(default = "default_batch_size")]
    pub default_batch_size: usize,

    /// Runtime worker threads of the shared pool
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Upper bound on threads running batch jobs; the pool grows up to this
    /// on demand, so jobs that dispatch and wait do not starve it
    #[serde(default = "default_max_blocking_threads")]
    pub max_blocking_threads: usize,

    /// Worker threads are named `<prefix>-<n>`
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKER_THREADS)
}

fn default_max_blocking_threads() -> usize {
    DEFAULT_MAX_BLOCKING_THREADS
}

fn default_thread_name_prefix() -> String {
    DEFAULT_THREAD_NAME_PREFIX.to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_batch_size: default_batch_size(),
            worker_threads: default_worker_threads(),
            max_blocking_threads: default_max_blocking_threads(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl BatchConfig {
    /// Load from environment variables on top of the defaults
    pub fn load() -> ConfigResult<Self> {
        loader::load_from_sources(&[], None)
    }

    /// Process-wide configuration used by the default-size entry points and
    /// the shared worker pool
    ///
    /// Loaded from `TASKER_BATCH_*` variables on first use; invalid values fall
    /// back to the defaults.
    pub fn global() -> &'static BatchConfig {
        PROCESS_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!(error = %e, "⚠️ CONFIG: Invalid batch configuration, using defaults");
                Self::default()
            })
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "default_batch_size",
                "0",
                "batch size must be greater than 0",
            ));
        }

        if self.worker_threads == 0 {
            return Err(ConfigurationError::invalid_value(
                "worker_threads",
                "0",
                "worker pool needs at least one thread",
            ));
        }

        if self.max_blocking_threads == 0 {
            return Err(ConfigurationError::invalid_value(
                "max_blocking_threads",
                "0",
                "worker pool needs at least one job thread",
            ));
        }

        if self.thread_name_prefix.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "thread_name_prefix",
                self.thread_name_prefix.clone(),
                "thread name prefix must not be blank",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BatchConfig::default();
        assert_eq!(config.default_batch_size, 1000);
        assert!(config.worker_threads >= 1);
        assert_eq!(config.max_blocking_threads, 512);
        assert_eq!(config.thread_name_prefix, "tasker-batch-worker");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let config = BatchConfig {
            default_batch_size: 0,
            ..BatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { ref field, .. }) if field == "default_batch_size"
        ));

        let config = BatchConfig {
            worker_threads: 0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BatchConfig {
            max_blocking_threads: 0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BatchConfig {
            thread_name_prefix: "  ".to_string(),
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_global_is_loaded_once() {
        let first: *const BatchConfig = BatchConfig::global();
        let second: *const BatchConfig = BatchConfig::global();
        assert_eq!(first, second);
        assert!(BatchConfig::global().validate().is_ok());
    }
}
