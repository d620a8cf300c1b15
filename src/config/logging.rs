//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Accepts a bare level or a full filter directive such as
    /// `info,qs_evaluation=debug`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let base = self
            .level
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if base.contains('=') || LEVELS.contains(&base.as_str()) {
            Ok(())
        } else {
            Err(ValidationError::InvalidLogLevel(self.level.clone()))
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        for level in ["info", "WARN", "info,qs_evaluation=debug", "qs_evaluation=trace"] {
            let config = LoggingConfig {
                level: level.into(),
                json: false,
            };
            assert!(config.validate().is_ok(), "{}", level);
        }
    }

    #[test]
    fn rejects_unknown_level() {
        let config = LoggingConfig {
            level: "loud".into(),
            json: true,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidLogLevel("loud".into()))
        );
    }
}
