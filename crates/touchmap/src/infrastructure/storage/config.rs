//! TOML-based configuration for touchmap.
//!
//! Reads `AppConfig` from `$XDG_CONFIG_HOME/touchmap/config.toml`, falling
//! back to `~/.config/touchmap/config.toml`.  Every key is optional; a missing
//! file means "detect everything automatically".
//!
//! ```toml
//! [general]
//! log_level = "debug"
//! pass_timeout_secs = 10
//!
//! [detection]
//! target_output = "HDMI-1"       # skip the landscape heuristic
//! device_name = "ILITEK ILITEK-TOUCH"
//! touch_token = "touch"
//!
//! [screen]                       # override the reported virtual screen
//! width = 3000
//! height = 1920
//!
//! [tools]
//! xrandr = "/usr/bin/xrandr"
//! xinput = "/usr/bin/xinput"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so an empty or
//! partial file loads the same as the defaults for everything it leaves out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use touchmap_core::{DeviceFilter, VirtualScreen, DEFAULT_TOUCH_TOKEN};

use crate::application::detect::DetectionOptions;
use crate::infrastructure::gateway::ToolPaths;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Virtual screen override; absent means "use the reported size".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenConfig>,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Logging and pass control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Abandon a pass that takes longer than this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_timeout_secs: Option<u64>,
}

/// Overrides for the automatic display and device choices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionConfig {
    /// Map onto this output port instead of the first landscape display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_output: Option<String>,
    /// Map only the device with exactly this name (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Name token identifying touch digitizers when `device_name` is unset.
    #[serde(default = "default_touch_token")]
    pub touch_token: String,
}

/// Virtual screen size override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

/// Program names or paths for the external tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_xrandr")]
    pub xrandr: String,
    #[serde(default = "default_xinput")]
    pub xinput: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_touch_token() -> String {
    DEFAULT_TOUCH_TOKEN.to_string()
}
fn default_xrandr() -> String {
    "xrandr".to_string()
}
fn default_xinput() -> String {
    "xinput".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pass_timeout_secs: None,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            target_output: None,
            device_name: None,
            touch_token: default_touch_token(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            xrandr: default_xrandr(),
            xinput: default_xinput(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Builds the detection options this configuration asks for.
    ///
    /// A blank `touch_token` would match every slave pointer, so it falls
    /// back to [`DEFAULT_TOUCH_TOKEN`].
    pub fn detection_options(&self) -> DetectionOptions {
        let device_filter = match &self.detection.device_name {
            Some(name) => DeviceFilter::Named(name.clone()),
            None => DeviceFilter::TouchToken(self.touch_token()),
        };
        DetectionOptions {
            target_output: self.detection.target_output.clone(),
            device_filter,
            screen_override: self.screen.map(|s| VirtualScreen::new(s.width, s.height)),
        }
    }

    fn touch_token(&self) -> String {
        let token = self.detection.touch_token.trim();
        if token.is_empty() {
            warn!("blank touch_token in config; using {DEFAULT_TOUCH_TOKEN:?}");
            return default_touch_token();
        }
        token.to_string()
    }

    /// Returns the configured tool programs.
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            xrandr: self.tools.xrandr.clone(),
            xinput: self.tools.xinput.clone(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the directory holding the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the default location, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// XDG_CONFIG_HOME or ~/.config, plus the `touchmap` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("touchmap"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
