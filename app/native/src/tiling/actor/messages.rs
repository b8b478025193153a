//! Message types for the orchestrator actor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::{
    MasterRatio, MasterWindow, Padding, PreferenceError, PreferenceKey, UserPreferences,
};
use crate::tiling::state::Window;
use crate::tiling::tracked::TrackedWindows;

/// Messages processed by the orchestrator, one at a time.
#[derive(Debug)]
pub enum TilingEvent {
    /// The host started or the engine was installed.
    Startup,

    /// A display was connected, disconnected or rearranged.
    DisplaysChanged,

    /// A window was opened.
    WindowCreated { window: Window },

    /// A window was closed.
    WindowRemoved { window_id: u32 },

    /// A window was moved or resized.
    ///
    /// `observed_epoch` is the settled epoch at the moment the host
    /// reported the change.
    WindowBoundsChanged { window_id: u32, observed_epoch: u64 },

    /// Tile every display now.
    TileNow,

    /// Tile the display holding a window now.
    TileDisplayOf { window_id: u32 },

    /// Change one user preference.
    SetPreference(PreferenceUpdate),

    /// An external command.
    Trigger(TriggerCommand),

    /// Report the current tracked state.
    Snapshot { respond_to: oneshot::Sender<Snapshot> },

    /// Reply once every earlier message has been handled.
    Sync { respond_to: oneshot::Sender<()> },

    /// Stop the actor.
    Shutdown,
}

impl TilingEvent {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::DisplaysChanged => "DisplaysChanged",
            Self::WindowCreated { .. } => "WindowCreated",
            Self::WindowRemoved { .. } => "WindowRemoved",
            Self::WindowBoundsChanged { .. } => "WindowBoundsChanged",
            Self::TileNow => "TileNow",
            Self::TileDisplayOf { .. } => "TileDisplayOf",
            Self::SetPreference(_) => "SetPreference",
            Self::Trigger(_) => "Trigger",
            Self::Snapshot { .. } => "Snapshot",
            Self::Sync { .. } => "Sync",
            Self::Shutdown => "Shutdown",
        }
    }
}

// ============================================================================
// Preference Updates
// ============================================================================

/// A change to one user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum PreferenceUpdate {
    AutoTiling(bool),
    MasterWindow(MasterWindow),
    MasterRatio(MasterRatio),
    Padding(Padding),
}

impl PreferenceUpdate {
    /// Returns the preference this update changes.
    #[must_use]
    pub const fn key(&self) -> PreferenceKey {
        match self {
            Self::AutoTiling(_) => PreferenceKey::AutoTiling,
            Self::MasterWindow(_) => PreferenceKey::MasterWindow,
            Self::MasterRatio(_) => PreferenceKey::MasterRatio,
            Self::Padding(_) => PreferenceKey::Padding,
        }
    }

    /// Writes the update into `preferences`.
    pub fn apply_to(&self, preferences: &mut UserPreferences) {
        match *self {
            Self::AutoTiling(value) => preferences.auto_tiling = value,
            Self::MasterWindow(value) => preferences.master_window = value,
            Self::MasterRatio(value) => preferences.master_ratio = value,
            Self::Padding(value) => preferences.padding = value,
        }
    }

    /// Parses an update from a preference name and its stored value.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError`] naming the unknown key or invalid value.
    pub fn parse(key: &str, value: &str) -> Result<Self, PreferenceError> {
        let key: PreferenceKey = key.parse()?;
        let json = serde_json::Value::String(value.to_string());
        let invalid = || PreferenceError::InvalidValue { key, value: value.to_string() };

        Ok(match key {
            PreferenceKey::AutoTiling => {
                Self::AutoTiling(value.parse::<bool>().map_err(|_| invalid())?)
            }
            PreferenceKey::MasterWindow => {
                Self::MasterWindow(serde_json::from_value(json).map_err(|_| invalid())?)
            }
            PreferenceKey::MasterRatio => {
                Self::MasterRatio(serde_json::from_value(json).map_err(|_| invalid())?)
            }
            PreferenceKey::Padding => {
                Self::Padding(serde_json::from_value(json).map_err(|_| invalid())?)
            }
        })
    }
}

// ============================================================================
// Trigger Commands
// ============================================================================

/// Commands arriving from keyboard shortcuts, menus or other triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCommand {
    /// Tile every display.
    TileAll,
    /// Tile the display holding a window.
    TileCurrent { window_id: u32 },
}

/// Errors from parsing a [`TriggerCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerParseError {
    /// The command string was blank.
    #[error("empty command")]
    Empty,

    /// `tile-now-current` without a window id.
    #[error("tile-now-current needs a window id")]
    MissingWindowId,

    /// The window id is not a number.
    #[error("invalid window id: {0}")]
    InvalidWindowId(String),

    /// No command has this name.
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl FromStr for TriggerCommand {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().ok_or(TriggerParseError::Empty)?;

        match command {
            "tile-all" | "tile-now" | "tile-now-all" => Ok(Self::TileAll),
            "tile-now-current" => {
                let raw = parts.next().ok_or(TriggerParseError::MissingWindowId)?;
                let window_id = raw
                    .parse::<u32>()
                    .map_err(|_| TriggerParseError::InvalidWindowId(raw.to_string()))?;
                Ok(Self::TileCurrent { window_id })
            }
            other => Err(TriggerParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for TriggerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileAll => f.write_str("tile-all"),
            Self::TileCurrent { window_id } => write!(f, "tile-now-current {window_id}"),
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Tracked windows as currently stored.
    pub tracked: TrackedWindows,
    /// Epoch of the newest pass started.
    pub in_flight_epoch: u64,
    /// Epoch of the newest pass finished.
    pub settled_epoch: u64,
}
