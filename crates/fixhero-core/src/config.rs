//! Configuration management for FixHero
//!
//! This module provides configuration structures for repository-level FixHero
//! settings: capture defaults, diagnostics buffer sizing, and browser launch
//! parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Repository-level FixHero configuration
///
/// Loaded from `.fixhero/config.toml` in the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// Capture defaults
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Diagnostics buffer sizing
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserSettings,
}

/// Defaults applied to each capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Capture a screenshot alongside the element snapshot
    #[serde(default = "default_screenshot")]
    pub screenshot: bool,

    /// How many recent console/network errors to attach to each issue
    #[serde(default = "default_error_context")]
    pub error_context: usize,
}

/// Ring buffer capacities for the diagnostics collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_buffer_capacity")]
    pub console_capacity: usize,

    #[serde(default = "default_buffer_capacity")]
    pub network_capacity: usize,
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Navigation timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

// Default value providers
fn default_screenshot() -> bool {
    true
}

fn default_error_context() -> usize {
    5
}

fn default_buffer_capacity() -> usize {
    64
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_timeout_seconds() -> u64 {
    30
}

impl InspectorConfig {
    /// Load configuration from `.fixhero/config.toml` or use defaults
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".fixhero/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::InspectorError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.fixhero/config.toml`
    pub fn write_default(project_root: &Path) -> Result<()> {
        let config_dir = project_root.join(".fixhero");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| crate::InspectorError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            browser: BrowserSettings::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            screenshot: default_screenshot(),
            error_context: default_error_context(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            console_capacity: default_buffer_capacity(),
            network_capacity: default_buffer_capacity(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
