//! Configuration types for autotile.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::preferences::UserPreferences;
use crate::tiling::constants::actor::DEFAULT_CHANNEL_CAPACITY;
use crate::tiling::constants::timing::DEFAULT_HOST_TIMEOUT_MS;

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_ENV_VAR: &str = "AUTOTILE_CONFIG";

/// Candidate file names inside a configuration directory, in priority order.
const CONFIG_FILE_NAMES: [&str; 2] = ["config.jsonc", "config.json"];

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Time bound applied to every call into the host, in milliseconds.
    /// Default: 2000
    pub host_timeout_ms: u64,

    /// Capacity of the orchestrator's event queue.
    /// Default: 256
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host_timeout_ms: DEFAULT_HOST_TIMEOUT_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Returns the host call time bound.
    #[must_use]
    pub const fn host_timeout(&self) -> Duration { Duration::from_millis(self.host_timeout_ms) }
}

/// Root configuration.
///
/// Example:
/// ```json
/// {
///   // Written to the durable store when it holds no preferences yet
///   "preferences": {
///     "auto_tiling": true,
///     "master_window": "start",
///     "master_ratio": "66%",
///     "padding": "20"
///   },
///   "engine": {
///     "hostTimeoutMs": 1000
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AutotileConfig {
    /// Initial user preferences.
    pub preferences: UserPreferences,

    /// Engine tuning.
    pub engine: EngineConfig,
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at $AUTOTILE_CONFIG or ~/.config/autotile/config.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations:
/// 1. `$AUTOTILE_CONFIG` (if set)
/// 2. `$XDG_CONFIG_HOME/autotile/config.jsonc|json` (if `XDG_CONFIG_HOME` is set)
/// 3. `~/.config/autotile/config.jsonc|json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(explicit));
    }

    let mut dirs_to_search = Vec::new();
    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME") {
        dirs_to_search.push(PathBuf::from(xdg_config).join("autotile"));
    }
    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".config").join("autotile");
        // XDG_CONFIG_HOME might be ~/.config
        if !dirs_to_search.contains(&dir) {
            dirs_to_search.push(dir);
        }
    }

    for dir in dirs_to_search {
        for name in CONFIG_FILE_NAMES {
            paths.push(dir.join(name));
        }
    }

    paths
}

/// Loads the configuration from the first existing default location.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no file exists, or an I/O or parse
/// error for the first file found.
pub fn load_config() -> Result<(AutotileConfig, PathBuf), ConfigError> {
    let path = config_paths().into_iter().find(|p| p.exists()).ok_or(ConfigError::NotFound)?;
    load_config_from_path(&path)
}

/// Loads the configuration from a specific path.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or an I/O or
/// parse error.
pub fn load_config_from_path(path: &Path) -> Result<(AutotileConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: AutotileConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::{MasterRatio, MasterWindow, Padding};

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AutotileConfig::default();
        assert_eq!(config.preferences, UserPreferences::default());
        assert_eq!(config.engine.host_timeout_ms, 2000);
        assert_eq!(config.engine.channel_capacity, 256);
        assert_eq!(config.engine.host_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let file = write_config(
            r#"{
                // Master on the right
                "preferences": {
                    "master_window": "end",
                    "master_ratio": "66%", /* wide */
                    "padding": "none"
                },
                "engine": { "hostTimeoutMs": 500 }
            }"#,
        );

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.preferences.master_window, MasterWindow::End);
        assert_eq!(config.preferences.master_ratio, MasterRatio::TwoThirds);
        assert_eq!(config.preferences.padding, Padding::None);
        assert!(config.preferences.auto_tiling);
        assert_eq!(config.engine.host_timeout_ms, 500);
        assert_eq!(config.engine.channel_capacity, 256);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_config("{}");
        let (config, _) = load_config_from_path(file.path()).unwrap();
        assert_eq!(config, AutotileConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("absent.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ \"engine\": ");
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_preference_value() {
        let file = write_config(r#"{ "preferences": { "padding": "15" } }"#);
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_paths_prefer_jsonc() {
        let paths = config_paths();
        let jsonc = paths.iter().position(|p| p.ends_with("autotile/config.jsonc"));
        let json = paths.iter().position(|p| p.ends_with("autotile/config.json"));

        if let (Some(jsonc), Some(json)) = (jsonc, json) {
            assert!(jsonc < json);
        }
    }
}
