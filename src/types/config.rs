//! Configuration for lazymemo.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::memo::MAX_FIBONACCI_INPUT;
use crate::{LazyMemoError, LazyMemoResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "lazymemo.toml";

/// Main configuration for lazymemo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Sequence settings.
    #[serde(default)]
    pub sequence: SequenceConfig,

    /// Evaluator settings.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Sequence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// How many values to take from infinite sequences when no count is given.
    #[serde(default = "default_take")]
    pub default_take: usize,

    /// Records per page for paginated sources.
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Prefix for generated IDs.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            default_take: default_take(),
            page_size: default_page_size(),
            id_prefix: default_id_prefix(),
        }
    }
}

fn default_take() -> usize {
    10
}

fn default_page_size() -> u64 {
    10
}

fn default_id_prefix() -> String {
    "ID".to_string()
}

/// Evaluator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Largest input accepted by the Fibonacci evaluator.
    #[serde(default = "default_max_input")]
    pub max_input: i64,

    /// Capacity of bounded function memoizers.
    #[serde(default = "default_memo_capacity")]
    pub memo_capacity: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_input: default_max_input(),
            memo_capacity: default_memo_capacity(),
        }
    }
}

fn default_max_input() -> i64 {
    MAX_FIBONACCI_INPUT
}

fn default_memo_capacity() -> usize {
    100
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> LazyMemoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LazyMemoError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> LazyMemoResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            sequence: SequenceConfig::default(),
            evaluator: EvaluatorConfig::default(),
        }
    }

    /// Loads configuration from `path`, or returns defaults if it does not exist.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> LazyMemoResult<Self> {
        match Self::load(path) {
            Err(LazyMemoError::ConfigNotFound(path)) => {
                tracing::debug!("No configuration at {}, using defaults", path);
                Ok(Self::default_config())
            }
            other => other,
        }
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> LazyMemoResult<()> {
        if self.sequence.page_size == 0 {
            return Err(LazyMemoError::config("sequence.page_size must be greater than zero"));
        }
        if self.evaluator.memo_capacity == 0 {
            return Err(LazyMemoError::config(
                "evaluator.memo_capacity must be greater than zero",
            ));
        }
        if !(0..=MAX_FIBONACCI_INPUT).contains(&self.evaluator.max_input) {
            return Err(LazyMemoError::config(format!(
                "evaluator.max_input must be between 0 and {MAX_FIBONACCI_INPUT}"
            )));
        }
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(LazyMemoError::config("general.log_format must be 'text' or 'json'"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sequence.default_take, 10);
        assert_eq!(config.evaluator.max_input, 186);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.sequence.id_prefix = "ORD".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.sequence.id_prefix, "ORD");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[sequence]\npage_size = 25\n").unwrap();
        assert_eq!(config.sequence.page_size, 25);
        assert_eq!(config.sequence.default_take, 10);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/no/such/lazymemo.toml").unwrap_err();
        assert!(matches!(err, LazyMemoError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let config = Config::load_or_default(&missing).unwrap();
        assert_eq!(config.sequence.page_size, 10);

        let broken = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&broken, "[sequence]\npage_size = 0\n").unwrap();
        let err = Config::load_or_default(&broken).unwrap_err();
        assert!(matches!(err, LazyMemoError::Config(_)));

        std::fs::write(&broken, "[sequence\n").unwrap();
        let err = Config::load_or_default(&broken).unwrap_err();
        assert!(matches!(err, LazyMemoError::TomlParse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.sequence.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.evaluator.max_input = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.log_format = "yaml".to_string();
        assert!(config.validate().is_err());
    }
}
