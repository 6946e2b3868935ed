//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate.
//! Handles file discovery, environment detection, and layered merging.
//!
//! A directory holds `tasker-batch.<ext>` and optionally
//! `tasker-batch-<environment>.<ext>`; the latter wins.

use super::error::{ConfigResult, ConfigurationError};
use super::BatchConfig;
use crate::constants::{CONFIG_FILE_STEM, ENV_PREFIX};
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Loaded configuration together with where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: BatchConfig,
    environment: String,
    config_directory: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let directory = PathBuf::from("config");
        let directory = directory.is_dir().then_some(directory);
        Self::load_from_directory_with_env(directory, &Self::detect_environment())
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory_with_env(config_dir, &Self::detect_environment())
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let files = match &config_dir {
            Some(dir) => {
                debug!(
                    "Loading configuration for environment '{}' from directory: {}",
                    environment,
                    dir.display()
                );
                vec![
                    (dir.join(CONFIG_FILE_STEM), false),
                    (dir.join(format!("{CONFIG_FILE_STEM}-{environment}")), false),
                ]
            }
            None => Vec::new(),
        };

        let config = load_from_sources(&files, None)?;

        info!(
            environment = %environment,
            default_batch_size = config.default_batch_size,
            worker_threads = config.worker_threads,
            "⚙️ CONFIG: Batch configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: config_dir,
        }))
    }

    /// Load a single required configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Arc<ConfigManager>> {
        let config = load_from_sources(&[(path.to_path_buf(), true)], None)?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: Self::detect_environment(),
            config_directory: path.parent().map(Path::to_path_buf),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> Option<&Path> {
        self.config_directory.as_deref()
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("TASKER_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}

/// Merge defaults, files (in order) and `TASKER_BATCH_*` variables.
///
/// `env_vars` replaces the process environment when given, so tests can feed
/// variables without touching global state.
pub(crate) fn load_from_sources(
    files: &[(PathBuf, bool)],
    env_vars: Option<HashMap<String, String>>,
) -> ConfigResult<BatchConfig> {
    let defaults = Config::try_from(&BatchConfig::default())
        .map_err(|e| ConfigurationError::load_error("defaults", e))?;

    let mut builder = Config::builder().add_source(defaults);
    for (path, required) in files {
        builder = builder.add_source(File::with_name(&path.to_string_lossy()).required(*required));
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env_vars),
    );

    let config: BatchConfig = builder
        .build()
        .and_then(Config::try_deserialize::<BatchConfig>)
        .map_err(|e| {
            let source_name = files
                .iter()
                .map(|(path, _)| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            ConfigurationError::load_error(
                if source_name.is_empty() {
                    "environment".to_string()
                } else {
                    source_name
                },
                e,
            )
        })?;

    config.validate()?;

    debug!(
        "Configuration loaded successfully: {}",
        serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string())
    );

    Ok(config)
}
