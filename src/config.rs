//! Configuration types for the SAML toolkit

use crate::catalog::DEFAULT_LLM;
use crate::error::Result;
use crate::validation::DEFAULT_MAX_DEPTH;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables overriding configuration (`SAML_MAX_DEPTH`, ...)
pub const ENV_PREFIX: &str = "SAML";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Toolkit configuration
///
/// Every field has a default, so an empty file or environment is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamlConfig {
    /// Deepest nesting the validator accepts
    pub max_depth: usize,
    /// Backend model identifier used when a step names no known model
    pub default_llm: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for SamlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_llm: DEFAULT_LLM.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl SamlConfig {
    /// Load from an optional `saml.{toml,yaml,json}` in the working directory
    /// and `SAML_*` environment variables
    pub fn load() -> Result<Self> {
        // Load .env if present so local development picks up SAML_* overrides
        dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("saml").required(false))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load from an explicit file, still honouring `SAML_*` overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the fallback model
    pub fn with_default_llm(mut self, default_llm: impl Into<String>) -> Self {
        self.default_llm = default_llm.into();
        self
    }

    /// Set the log filter
    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    /// Set the log format
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = SamlConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.default_llm, "GPT_3_5_TURBO_16K_0613");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "max_depth = 12").unwrap();
        writeln!(file, "log_format = \"json\"").unwrap();

        let config = SamlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_llm, DEFAULT_LLM);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "default_llm: GPT_4_0613").unwrap();

        let config = SamlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_llm, "GPT_4_0613");
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = SamlConfig::from_file("/nonexistent/saml.toml").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = SamlConfig::default()
            .with_max_depth(8)
            .with_default_llm("GPT_4_0613")
            .with_log_level("debug")
            .with_log_format(LogFormat::Json);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.default_llm, "GPT_4_0613");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
