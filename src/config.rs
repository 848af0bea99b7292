//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tracktable\config.toml
//! - macOS: ~/Library/Application Support/tracktable/config.toml
//! - Linux: ~/.config/tracktable/config.toml
//!
//! The file is human-readable and editable. It is loaded at startup and
//! handed to [`crate::settings::Settings`], which owns it at runtime and
//! notifies listeners when an option changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Rating maximum used when none is configured.
pub const DEFAULT_RATING_MAXIMUM: u32 = 5;

/// Pixel size of the status icon cell on the first playlist column.
pub const DEFAULT_STATUS_ICON_SIZE: u32 = 16;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playlist column settings
    pub columns: ColumnsConfig,

    /// Rating settings
    pub rating: RatingConfig,
}

/// Playlist column settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Columns keep a user-set fixed width instead of sizing automatically
    pub resizable: bool,

    /// Visible columns, in display order
    pub visible: Vec<String>,

    /// Size of the leading status icon cell in pixels
    pub status_icon_size: u32,

    /// Persisted widths keyed by column identifier
    pub widths: BTreeMap<String, u32>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            resizable: false,
            visible: default_visible_columns(),
            status_icon_size: DEFAULT_STATUS_ICON_SIZE,
            widths: BTreeMap::new(),
        }
    }
}

/// Columns shown in a fresh playlist view.
pub fn default_visible_columns() -> Vec<String> {
    ["tracknumber", "title", "album", "artist", "__length"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rating settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Number of rating steps (stars)
    pub maximum: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            maximum: DEFAULT_RATING_MAXIMUM,
        }
    }
}

impl Config {
    /// Repair values that would break consumers.
    ///
    /// A zero rating maximum would divide by zero when normalizing ratings,
    /// and a zero width would collapse a column.
    pub fn sanitize(&mut self) {
        if self.rating.maximum == 0 {
            tracing::warn!(
                default = DEFAULT_RATING_MAXIMUM,
                "rating.maximum is 0, using default"
            );
            self.rating.maximum = DEFAULT_RATING_MAXIMUM;
        }

        self.columns.widths.retain(|id, width| {
            if *width == 0 {
                tracing::warn!(column = %id, "Dropping zero column width");
            }
            *width > 0
        });

        let mut seen = std::collections::HashSet::new();
        self.columns.visible.retain(|id| seen.insert(id.clone()));
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// `<os config dir>/tracktable`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tracktable"))
}

/// `<os config dir>/tracktable/config.toml`
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load the user's configuration.
///
/// Never fails: a missing or unreadable file yields the defaults, with the
/// problem logged.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("No config directory on this platform, using defaults");
        return Config::default();
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Config::default();
    }

    load_from(&path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring config file, using defaults");
        Config::default()
    })
}

/// Load and sanitize configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let mut config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    config.sanitize();
    Ok(config)
}

/// Save to the user's config file.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save to an explicit path, creating its directory.
///
/// The file is replaced through a sibling `.toml.tmp` so readers never see
/// a half-written config.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    let staging = path.with_extension("toml.tmp");
    std::fs::write(&staging, contents).map_err(|e| ConfigError::Write(staging.clone(), e))?;
    std::fs::rename(&staging, path)
        .map_err(|e| ConfigError::Rename(staging, path.to_path_buf(), e))?;

    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
