//! Runtime configuration for the evaluation engine.
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables use the `QS_EVALUATION` prefix and `__` between
//! nested keys. Every section has defaults, so an empty environment is valid.
//!
//! # Example
//!
//! ```no_run
//! use qs_evaluation::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod batch;
mod error;
mod evaluation;
mod logging;

pub use batch::BatchConfig;
pub use error::{ConfigError, ValidationError};
pub use evaluation::EvaluationConfig;
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Every section the engine reads, each with usable defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Worker pool sizing for batch operations
    #[serde(default)]
    pub batch: BatchConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Evaluation pipeline settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then `QS_EVALUATION__<SECTION>__<KEY>`
    /// variables.
    ///
    /// - `QS_EVALUATION__BATCH__MAX_WORKERS=50` -> `batch.max_workers = 50`
    /// - `QS_EVALUATION__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("QS_EVALUATION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks each section in turn and reports the first problem.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for zero batch settings or an unknown log level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.batch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-wide.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "QS_EVALUATION__BATCH__MAX_WORKERS",
        "QS_EVALUATION__LOGGING__LEVEL",
        "QS_EVALUATION__LOGGING__JSON",
        "QS_EVALUATION__EVALUATION__CONCURRENT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(config.evaluation.concurrent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_values_are_read() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("QS_EVALUATION__BATCH__MAX_WORKERS", "8");
        env::set_var("QS_EVALUATION__LOGGING__LEVEL", "debug");
        env::set_var("QS_EVALUATION__LOGGING__JSON", "true");
        env::set_var("QS_EVALUATION__EVALUATION__CONCURRENT", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.batch.max_workers, 8);
        assert_eq!(config.batch.options().max_workers, 8);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(!config.evaluation.concurrent);
    }

    #[test]
    fn validation_reports_bad_sections() {
        let mut config = AppConfig::default();
        config.batch.tasks_per_worker = 0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBatchSetting("tasks_per_worker"))
        );
    }
}
