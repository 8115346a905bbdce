//! Pipeline configuration.
//!
//! A [`GeneratorConfig`] controls the project-level values the orchestrator
//! stamps onto every run (version, author, resolution) and whether
//! auto-correction runs when coherence validation finds issues.
//!
//! ```toml
//! version = "1.0.0"
//! author = "studio"
//! default_resolution = "1920x1080"
//! auto_correct = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Configuration for a [`crate::ComponentGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Version written into project metadata.
    pub version: String,
    /// Author written into project metadata.
    pub author: String,
    /// Resolution used when the aspect ratio has no known preset.
    pub default_resolution: String,
    /// Whether to invoke the auto-corrector when issues are found.
    pub auto_correct: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            author: "heyogen".to_string(),
            default_resolution: "1920x1080".to_string(),
            auto_correct: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> GenResult<Self> {
        toml::from_str(content)
            .map_err(|e| GenError::config(format!("Failed to parse config: {}", e)))
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GenError::config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Builder: Set version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Builder: Set author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Builder: Set default resolution.
    pub fn with_default_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.default_resolution = resolution.into();
        self
    }

    /// Builder: Enable or disable auto-correction.
    pub fn with_auto_correct(mut self, enabled: bool) -> Self {
        self.auto_correct = enabled;
        self
    }

    /// Resolves the output resolution for an aspect ratio.
    pub fn resolution_for(&self, aspect_ratio: &str) -> String {
        let preset = match aspect_ratio.trim() {
            "16:9" => Some("1920x1080"),
            "9:16" => Some("1080x1920"),
            "1:1" => Some("1080x1080"),
            "4:3" => Some("1440x1080"),
            "4:5" => Some("1080x1350"),
            "21:9" | "2.39:1" => Some("2560x1080"),
            _ => None,
        };
        preset
            .map(str::to_string)
            .unwrap_or_else(|| self.default_resolution.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.default_resolution, "1920x1080");
        assert!(config.auto_correct);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GeneratorConfig::from_toml_str("author = \"studio\"\nauto_correct = false\n")
            .unwrap();
        assert_eq!(config.author, "studio");
        assert!(!config.auto_correct);
        assert_eq!(config.version, "1.0.0");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = GeneratorConfig::from_toml_str("auto_correct = \"maybe\"").unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = GeneratorConfig::from_file("/nonexistent/heyogen.toml").unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_resolution_for() {
        let config = GeneratorConfig::new().with_default_resolution("1280x720");
        assert_eq!(config.resolution_for("9:16"), "1080x1920");
        assert_eq!(config.resolution_for("16:9"), "1920x1080");
        assert_eq!(config.resolution_for("3:2"), "1280x720");
    }
}
