use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::{LoggerError, LoggerResult},
    object::{LoggerFormat, LoggerLevel},
};

/// Environment variable overriding [`LoggerConfig::level`].
pub const ENV_LOG_LEVEL: &str = "SLEEPER_LOG";

/// Environment variable overriding [`LoggerConfig::format`].
pub const ENV_LOG_FORMAT: &str = "SLEEPER_LOG_FORMAT";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. "info", "sleeper_core=debug,info").
    pub level: LoggerLevel,
    /// Include module targets in each line.
    pub with_targets: bool,
    /// Include the emitting thread's name; expiry is always logged from the timer thread.
    pub with_thread_names: bool,
    /// Colored output, if stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            with_thread_names: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Applies [`ENV_LOG_LEVEL`] and [`ENV_LOG_FORMAT`] from the process environment.
    pub fn with_env(self) -> LoggerResult<Self> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`; unset or empty variables are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let value = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(level) = value(ENV_LOG_LEVEL) {
            self.level = level.parse().map_err(|e| wrap(ENV_LOG_LEVEL, e))?;
        }
        if let Some(format) = value(ENV_LOG_FORMAT) {
            self.format = format.parse().map_err(|e| wrap(ENV_LOG_FORMAT, e))?;
        }
        Ok(self)
    }

    /// Color is used only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

fn wrap(var: &'static str, source: LoggerError) -> LoggerError {
    LoggerError::InvalidEnv {
        var,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.with_thread_names);
        assert!(config.use_color);
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.format, LoggerFormat::default());
        assert_eq!(config.level.as_str(), LoggerLevel::default().as_str());
        assert!(config.with_thread_names);
    }

    #[test]
    fn partial_deserialization() {
        let json = r#"{"format": "json", "level": "sleeper_core=debug,warn", "use_color": false}"#;
        let config: LoggerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "sleeper_core=debug,warn");
        assert!(!config.use_color);
        assert!(config.with_targets);
    }

    #[test]
    fn overrides_replace_level_and_format() {
        let config = LoggerConfig::default()
            .with_overrides(|var| match var {
                ENV_LOG_LEVEL => Some("debug".into()),
                ENV_LOG_FORMAT => Some("JSON".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.level.as_str(), "debug");
        assert_eq!(config.format, LoggerFormat::Json);
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let config = LoggerConfig::default()
            .with_overrides(|_| Some("  ".into()))
            .unwrap();

        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.format, LoggerFormat::Text);
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let err = LoggerConfig::default()
            .with_overrides(|var| (var == ENV_LOG_FORMAT).then(|| "xml".to_string()))
            .unwrap_err();

        match err {
            LoggerError::InvalidEnv { var, source } => {
                assert_eq!(var, ENV_LOG_FORMAT);
                assert!(matches!(*source, LoggerError::InvalidFormat(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
