//! YAML configuration file support.
//!
//! Every pipeline stage can be configured from a single YAML file. Sections
//! that are left out fall back to the stage defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "week 3 homework"
//!
//! ingest:
//!   extensions: ["py"]
//!   skip_hidden: true
//!
//! canonical:
//!   comment_marker: "#"
//!   mask_identifiers: true
//!
//! perceptual:
//!   k: 9
//!   window_override: null
//!   use_parallel: false
//!
//! matcher:
//!   group_threshold: 80.0
//!   cluster_strategy: "union_find"
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use canonical::CanonicalizeConfig;
use ingest::IngestConfig;
use matcher::MatchConfig;
use perceptual::PerceptualConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PipelineConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SourceprintConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub canonical: CanonicalizeConfig,

    #[serde(default)]
    pub perceptual: PerceptualConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SourceprintConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SourceprintConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.canonical
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("canonical: {e}")))?;
        self.perceptual
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("perceptual: {e}")))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;
        self.logging.validate()?;

        Ok(())
    }

    /// Stage configs used by the engine entry points.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            canonical: self.canonical.clone(),
            perceptual: self.perceptual.clone(),
            matcher: self.matcher.clone(),
        }
    }
}

impl Default for SourceprintConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestConfig::default(),
            canonical: CanonicalizeConfig::default(),
            perceptual: PerceptualConfig::default(),
            matcher: MatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Log output settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of: {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::ClusterStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
ingest:
  extensions: ["py"]
perceptual:
  k: 5
"#;

        let config = SourceprintConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.ingest.extensions, vec!["py".to_string()]);
        assert_eq!(config.perceptual.k, 5);
        assert_eq!(config.perceptual.version, 1);
        assert_eq!(config.canonical, CanonicalizeConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
matcher:
  group_threshold: 75.5
  cluster_strategy: "sorted_scan"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = SourceprintConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.matcher.group_threshold, 75.5);
        assert_eq!(config.matcher.cluster_strategy, ClusterStrategy::SortedScan);
    }

    #[test]
    fn test_default_config() {
        let config = SourceprintConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unsupported_version() {
        let result = SourceprintConfig::from_yaml("version: \"2\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2"));
    }

    #[test]
    fn test_perceptual_validation() {
        let yaml = r#"
version: "1.0"
perceptual:
  k: 0
"#;

        let result = SourceprintConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("k must be >= 1"));
    }

    #[test]
    fn test_threshold_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  group_threshold: 180.0
"#;

        let err = SourceprintConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("matcher"));
    }

    #[test]
    fn test_logging_validation() {
        let yaml = r#"
version: "1.0"
logging:
  level: "loud"
"#;

        let err = SourceprintConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceprintConfig::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_pipeline_projection() {
        let yaml = r#"
version: "1.0"
canonical:
  comment_marker: "//"
perceptual:
  window_override: 4
"#;
        let config = SourceprintConfig::from_yaml(yaml).unwrap();
        let pipeline = config.pipeline();
        assert_eq!(pipeline.canonical.comment_marker, "//");
        assert_eq!(pipeline.perceptual.window_override, Some(4));
        assert_eq!(pipeline.matcher, MatchConfig::default());
    }
}
