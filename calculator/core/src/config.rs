//! TOML Configuration File Support
//!
//! Configuration for the engine and for surfaces that render it, loaded from
//! `~/.config/calculator/calculator.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [engine]
//! error_text = "Error"
//!
//! [display]
//! highlight_pending = true
//! show_expression = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{EngineConfig, DEFAULT_ERROR_TEXT};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Engine section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineToml {
    /// Sentinel shown after division by zero or overflow
    pub error_text: Option<String>,
}

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Highlight the operator key whose operation is pending
    pub highlight_pending: Option<bool>,

    /// Show the `<first> <op>` line above the display
    pub show_expression: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorToml {
    /// Engine configuration section
    pub engine: EngineToml,

    /// Display configuration section
    pub display: DisplayToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration from every source
#[derive(Clone, Debug)]
pub struct CalculatorConfigFile {
    /// Sentinel shown in the error state
    pub error_text: String,

    /// Highlight the pending operator key
    pub highlight_pending: bool,

    /// Show the expression line
    pub show_expression: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for CalculatorConfigFile {
    fn default() -> Self {
        Self {
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            highlight_pending: true,
            show_expression: true,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CalculatorConfigFile {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Engine configuration derived from this file
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            error_text: self.error_text.clone(),
        }
    }

    /// Check values that cannot be expressed in the type system
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the error text is empty or
    /// would be indistinguishable from a number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let text = self.error_text.trim();
        if text.is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.error_text must not be empty".to_string(),
            ));
        }
        if text.parse::<f64>().is_ok() {
            return Err(ConfigError::ValidationError(format!(
                "engine.error_text {text:?} looks like a number"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/calculator/calculator.toml` or
/// `~/.config/calculator/calculator.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calculator").join("calculator.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resolved values fail validation. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<CalculatorConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resolved values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CalculatorConfigFile, ConfigError> {
    let mut config = CalculatorConfigFile::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CalculatorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut CalculatorConfigFile, toml: &CalculatorToml) {
    if let Some(ref text) = toml.engine.error_text {
        config.error_text.clone_from(text);
    }
    if let Some(highlight) = toml.display.highlight_pending {
        config.highlight_pending = highlight;
    }
    if let Some(show) = toml.display.show_expression {
        config.show_expression = show;
    }
}

fn apply_env_config(config: &mut CalculatorConfigFile) {
    if let Ok(text) = std::env::var("CALC_ERROR_TEXT") {
        config.error_text = text;
        config.source = ConfigSource::Env;
    }
    if let Some(highlight) = env_flag("CALC_HIGHLIGHT_PENDING") {
        config.highlight_pending = highlight;
        config.source = ConfigSource::Env;
    }
    if let Some(show) = env_flag("CALC_SHOW_EXPRESSION") {
        config.show_expression = show;
        config.source = ConfigSource::Env;
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(var = name, value = other, "Ignoring unrecognized boolean");
            None
        }
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values supplied on the command line, applied after file and environment
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Error sentinel override
    pub error_text: Option<String>,
    /// Pending highlight override
    pub highlight_pending: Option<bool>,
    /// Expression line override
    pub show_expression: Option<bool>,
}

impl ConfigOverrides {
    /// Create empty overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the error sentinel
    #[must_use]
    pub fn with_error_text(mut self, text: String) -> Self {
        self.error_text = Some(text);
        self
    }

    /// Override pending-operator highlighting
    #[must_use]
    pub fn with_highlight_pending(mut self, highlight: bool) -> Self {
        self.highlight_pending = Some(highlight);
        self
    }

    /// Override the expression line
    #[must_use]
    pub fn with_show_expression(mut self, show: bool) -> Self {
        self.show_expression = Some(show);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.error_text.is_none()
            && self.highlight_pending.is_none()
            && self.show_expression.is_none()
    }

    /// Apply overrides to a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the result is invalid.
    pub fn apply(&self, config: &mut CalculatorConfigFile) -> Result<(), ConfigError> {
        if let Some(ref text) = self.error_text {
            config.error_text.clone_from(text);
        }
        if let Some(highlight) = self.highlight_pending {
            config.highlight_pending = highlight;
        }
        if let Some(show) = self.show_expression {
            config.show_expression = show;
        }
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
        config.validate()
    }
}
