//! Configuration management for mongox
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables (`MONGOX_*`)
//! 2. Configuration file (TOML format)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable overriding [`LoggingConfig::level`].
pub const ENV_LOG_LEVEL: &str = "MONGOX_LOG_LEVEL";

/// Environment variable overriding [`LoggingConfig::timestamps`].
pub const ENV_LOG_TIMESTAMPS: &str = "MONGOX_LOG_TIMESTAMPS";

/// Environment variable overriding [`ExecutionConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "MONGOX_TIMEOUT_MS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Execution configuration
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to execution contexts built from configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Deadline for a single terminal operation in milliseconds (None = no deadline)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from all sources with proper precedence
    ///
    /// Reads `path` if given, otherwise [`Config::default_path`] when that file
    /// exists, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MONGOX_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = LogLevel::parse(&level).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: ENV_LOG_LEVEL.to_string(),
                    value: level.clone(),
                }
            })?;
        }

        if let Some(timestamps) = lookup(ENV_LOG_TIMESTAMPS) {
            self.logging.timestamps =
                timestamps
                    .parse::<bool>()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: ENV_LOG_TIMESTAMPS.to_string(),
                        value: timestamps.clone(),
                    })?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            let ms = timeout
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: ENV_TIMEOUT_MS.to_string(),
                    value: timeout.clone(),
                })?;
            self.execution.timeout_ms = Some(ms);
        }

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongox")
            .join("config.toml")
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.execution.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "execution.timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ExecutionConfig {
    /// Get the execution timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.logging.timestamps);
        assert_eq!(config.execution.timeout(), None);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            [execution]
            timeout_ms = 1500

            [logging]
            level = "debug"
            timestamps = false
            "#,
        )
        .unwrap();

        assert_eq!(config.execution.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.timestamps);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml("[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.timestamps);
        assert_eq!(config.execution.timeout_ms, None);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(
            result,
            Err(crate::error::MongoxError::Config(ConfigError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::from_toml("[execution]\ntimeout_ms = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_LOG_LEVEL, "TRACE"),
            (ENV_LOG_TIMESTAMPS, "false"),
            (ENV_TIMEOUT_MS, "250"),
        ]);

        let mut config = Config::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(!config.logging.timestamps);
        assert_eq!(config.execution.timeout_ms, Some(250));
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == ENV_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here/mongox.toml");
        assert!(matches!(
            result,
            Err(crate::error::MongoxError::Config(ConfigError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("mongox-config-{}", std::process::id()))
            .join("config.toml");

        let mut config = Config::default();
        config.execution.timeout_ms = Some(42);
        config.logging.level = LogLevel::Error;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.execution.timeout_ms, Some(42));
        assert_eq!(loaded.logging.level, LogLevel::Error);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse(" Warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("nope"), None);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
    }
}
