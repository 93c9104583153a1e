//! Configuration loading, validation, and management for the ensemble
//! engine.
//!
//! Loads configuration from an `ensemble.toml` file (path overridable via
//! the `ENSEMBLE_CONFIG` environment variable) with serde-supplied defaults
//! for every field. Validates all settings at load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `ensemble.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Response pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Context assembly knobs
    #[serde(default)]
    pub context: ContextConfig,

    /// Generation collaborator settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Pacing delays assigned to the fan-out, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay assigned to the first responder
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,

    /// Additional delay per subsequent responder
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
}

fn default_base_ms() -> u64 {
    600
}
fn default_step_ms() -> u64 {
    900
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_ms: default_base_ms(),
            step_ms: default_step_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Peer messages cited per character context
    #[serde(default = "default_peer_window")]
    pub peer_window: usize,

    /// Maximum remembered facts passed per character
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,
}

fn default_peer_window() -> usize {
    3
}
fn default_memory_limit() -> usize {
    25
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            peer_window: default_peer_window(),
            memory_limit: default_memory_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Text substituted into a slot whose generation call failed
    #[serde(default = "default_fallback_content")]
    pub fallback_content: String,

    /// Per-character generation timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_fallback_content() -> String {
    "*pauses, momentarily lost for words*".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            fallback_content: default_fallback_content(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default location.
    ///
    /// Checks `ENSEMBLE_CONFIG` for a path override, falling back to
    /// `ensemble.toml` in the working directory. A missing file yields the
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ENSEMBLE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ensemble.toml"));
        Self::load_from(&path)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacing.base_ms > 60_000 || self.pacing.step_ms > 60_000 {
            return Err(ConfigError::ValidationError(
                "pacing delays must not exceed 60s".into(),
            ));
        }

        if self.context.peer_window == 0 {
            return Err(ConfigError::ValidationError(
                "context.peer_window must be at least 1".into(),
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation.timeout_secs must be at least 1".into(),
            ));
        }

        if self.generation.fallback_content.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.fallback_content must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            context: ContextConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context.peer_window, 3);
        assert_eq!(config.pacing.base_ms, 600);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.pacing.step_ms, config.pacing.step_ms);
        assert_eq!(
            parsed.generation.fallback_content,
            config.generation.fallback_content
        );
    }

    #[test]
    fn zero_peer_window_rejected() {
        let mut config = EngineConfig::default();
        config.context.peer_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = EngineConfig::load_from(Path::new("/nonexistent/ensemble.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().context.memory_limit, 25);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ensemble.toml");
        fs::write(&path, "[pacing]\nbase_ms = 250\n").unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.pacing.base_ms, 250);
        // Untouched sections keep their defaults
        assert_eq!(config.pacing.step_ms, 900);
        assert_eq!(config.context.peer_window, 3);
    }

    #[test]
    fn invalid_file_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ensemble.toml");
        fs::write(&path, "[generation]\ntimeout_secs = 0\n").unwrap();

        let result = EngineConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = EngineConfig::default_toml();
        assert!(toml_str.contains("[pacing]"));
        assert!(toml_str.contains("peer_window"));
    }
}
