//! TOML Configuration File Support
//!
//! Centralized configuration loading for the screen core and daemon,
//! supporting a TOML configuration file at `~/.config/remote-screen/screen.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/remote-screen/screen.toml` (typically `~/.config/remote-screen/screen.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [screen]
//! text_service = "LCDT"
//! log_service = "LOG"
//! default_font_size = 22
//! font_family = "Courier New"
//! console_max_lines = 500
//!
//! [palette]
//! foreground = "#FFFFFFFF"
//! fill = "#FF808080"
//! background = "#00000000"
//!
//! [session]
//! channel_capacity = 100
//!
//! [surface]
//! width = 800
//! height = 480
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{self, Color};
use crate::interpreter::InterpreterConfig;
use crate::layout::DEFAULT_FONT_SIZE;

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

/// Screen section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenToml {
    /// Service whose messages become line-addressable text
    pub text_service: Option<String>,

    /// Service routed to the log console
    pub log_service: Option<String>,

    /// Font size used when a command has no `Size`
    pub default_font_size: Option<f64>,

    /// Font family for line-addressable text
    pub font_family: Option<String>,

    /// Lines retained by the log console
    pub console_max_lines: Option<usize>,
}

/// Palette section of the TOML configuration (hex colors)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteToml {
    /// Default text and line stroke color
    pub foreground: Option<String>,

    /// Default rectangle fill
    pub fill: Option<String>,

    /// Initial surface background
    pub background: Option<String>,
}

/// Session section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionToml {
    /// Inbound queue capacity
    pub channel_capacity: Option<usize>,
}

/// Surface section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceToml {
    /// Headless surface width in pixels
    pub width: Option<f64>,

    /// Headless surface height in pixels
    pub height: Option<f64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfigToml {
    /// Screen configuration section
    pub screen: ScreenToml,

    /// Palette configuration section
    pub palette: PaletteToml,

    /// Session configuration section
    pub session: SessionToml,

    /// Surface configuration section
    pub surface: SurfaceToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized configuration for the screen
///
/// Consolidates configuration from multiple sources and tracks where it came
/// from. Use [`load_config`] to load configuration with proper priority
/// handling.
#[derive(Clone, Debug)]
pub struct ScreenConfigFile {
    /// Service whose messages become line-addressable text
    pub text_service: String,

    /// Service routed to the log console
    pub log_service: String,

    /// Font size used when a command has no `Size`
    pub default_font_size: f64,

    /// Font family for line-addressable text
    pub font_family: String,

    /// Lines retained by the log console
    pub console_max_lines: usize,

    /// Default text and line stroke color
    pub foreground: Color,

    /// Default rectangle fill
    pub fill: Color,

    /// Initial surface background
    pub background: Color,

    /// Inbound queue capacity
    pub channel_capacity: usize,

    /// Headless surface width
    pub surface_width: f64,

    /// Headless surface height
    pub surface_height: f64,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ScreenConfigFile {
    fn default() -> Self {
        Self {
            text_service: "LCDT".to_string(),
            log_service: "LOG".to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
            font_family: "Courier New".to_string(),
            console_max_lines: 500,
            foreground: Color::WHITE,
            fill: Color::GRAY,
            background: Color::transparent(),
            channel_capacity: 100,
            surface_width: 800.0,
            surface_height: 480.0,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ScreenConfigFile {
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

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Interpreter settings derived from this configuration
    #[must_use]
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            text_service: self.text_service.clone(),
            log_service: self.log_service.clone(),
            default_font_size: self.default_font_size,
            font_family: self.font_family.clone(),
            console_max_lines: self.console_max_lines,
            foreground: self.foreground,
            fill: self.fill,
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text_service.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "text_service must not be empty".to_string(),
            ));
        }
        if self.text_service == self.log_service {
            return Err(ConfigError::ValidationError(format!(
                "text_service and log_service must differ (both are {:?})",
                self.text_service
            )));
        }
        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "default_font_size must be positive, got {}",
                self.default_font_size
            )));
        }
        if self.console_max_lines == 0 {
            return Err(ConfigError::ValidationError(
                "console_max_lines must be greater than 0".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be greater than 0".to_string(),
            ));
        }
        if !(self.surface_width > 0.0 && self.surface_height > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "surface size must be positive, got {}x{}",
                self.surface_width, self.surface_height
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
/// Returns `$XDG_CONFIG_HOME/remote-screen/screen.toml` or
/// `~/.config/remote-screen/screen.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("remote-screen").join("screen.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// value is out of range. A missing config file is not an error.
pub fn load_config() -> Result<ScreenConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// If `path` is `None`, only defaults and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if a value is out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ScreenConfigFile, ConfigError> {
    let mut config = ScreenConfigFile::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ScreenConfigToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
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

fn palette_color(key: &str, value: Option<&String>) -> Result<Option<Color>, ConfigError> {
    value
        .map(|spec| {
            color::decode_hex(spec).ok_or_else(|| {
                ConfigError::ValidationError(format!("palette.{key}: {spec:?} is not a hex color"))
            })
        })
        .transpose()
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(
    config: &mut ScreenConfigFile,
    toml: &ScreenConfigToml,
) -> Result<(), ConfigError> {
    // Screen settings
    if let Some(ref service) = toml.screen.text_service {
        config.text_service.clone_from(service);
    }
    if let Some(ref service) = toml.screen.log_service {
        config.log_service.clone_from(service);
    }
    if let Some(size) = toml.screen.default_font_size {
        config.default_font_size = size;
    }
    if let Some(ref family) = toml.screen.font_family {
        config.font_family.clone_from(family);
    }
    if let Some(lines) = toml.screen.console_max_lines {
        config.console_max_lines = lines;
    }

    // Palette settings
    if let Some(color) = palette_color("foreground", toml.palette.foreground.as_ref())? {
        config.foreground = color;
    }
    if let Some(color) = palette_color("fill", toml.palette.fill.as_ref())? {
        config.fill = color;
    }
    if let Some(color) = palette_color("background", toml.palette.background.as_ref())? {
        config.background = color;
    }

    // Session settings
    if let Some(capacity) = toml.session.channel_capacity {
        config.channel_capacity = capacity;
    }

    // Surface settings
    if let Some(width) = toml.surface.width {
        config.surface_width = width;
    }
    if let Some(height) = toml.surface.height {
        config.surface_height = height;
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut ScreenConfigFile) {
    if let Ok(service) = std::env::var("SCREEN_TEXT_SERVICE") {
        config.text_service = service;
        config.source = ConfigSource::Env;
    }
    if let Ok(service) = std::env::var("SCREEN_LOG_SERVICE") {
        config.log_service = service;
        config.source = ConfigSource::Env;
    }
    if let Ok(size) = std::env::var("SCREEN_FONT_SIZE") {
        if let Ok(size) = size.parse::<f64>() {
            config.default_font_size = size;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(capacity) = std::env::var("SCREEN_CHANNEL_CAPACITY") {
        if let Ok(n) = capacity.parse::<usize>() {
            config.channel_capacity = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(width) = std::env::var("SCREEN_SURFACE_WIDTH") {
        if let Ok(w) = width.parse::<f64>() {
            config.surface_width = w;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(height) = std::env::var("SCREEN_SURFACE_HEIGHT") {
        if let Ok(h) = height.parse::<f64>() {
            config.surface_height = h;
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Text service override
    pub text_service: Option<String>,

    /// Default font size override
    pub default_font_size: Option<f64>,

    /// Surface width override
    pub surface_width: Option<f64>,

    /// Surface height override
    pub surface_height: Option<f64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set text service override
    #[must_use]
    pub fn with_text_service(mut self, service: String) -> Self {
        self.text_service = Some(service);
        self
    }

    /// Set default font size override
    #[must_use]
    pub fn with_default_font_size(mut self, size: f64) -> Self {
        self.default_font_size = Some(size);
        self
    }

    /// Set surface width override
    #[must_use]
    pub fn with_surface_width(mut self, width: f64) -> Self {
        self.surface_width = Some(width);
        self
    }

    /// Set surface height override
    #[must_use]
    pub fn with_surface_height(mut self, height: f64) -> Self {
        self.surface_height = Some(height);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override puts a value
    /// out of range.
    pub fn apply(&self, config: &mut ScreenConfigFile) -> Result<(), ConfigError> {
        if self.text_service.is_some()
            || self.default_font_size.is_some()
            || self.surface_width.is_some()
            || self.surface_height.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref service) = self.text_service {
            config.text_service.clone_from(service);
        }
        if let Some(size) = self.default_font_size {
            config.default_font_size = size;
        }
        if let Some(width) = self.surface_width {
            config.surface_width = width;
        }
        if let Some(height) = self.surface_height {
            config.surface_height = height;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
