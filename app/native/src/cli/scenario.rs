//! Scenario files for the `replay` command.
//!
//! A scenario describes an initial desktop (displays, windows, stored
//! preferences) and a list of events. Replaying it runs the real
//! orchestrator against an in-memory host and reports where every window
//! ended up.
//!
//! Scenario files are JSONC:
//!
//! ```jsonc
//! {
//!   "displays": [{ "id": 1, "workArea": { "left": 0, "top": 0, "width": 1920, "height": 1080 } }],
//!   "windows": [{ "id": 1, "frame": { "left": 0, "top": 0, "width": 800, "height": 600 } }],
//!   "events": [
//!     { "type": "startup" },
//!     { "type": "tile_now" },
//!     { "type": "set_preference", "key": "master_window", "value": "start" }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use json_comments::StripComments;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{AutotileConfig, UserPreferences};
use crate::error::AutotileError;
use crate::tiling::constants::storage::PREFERENCES_KEY;
use crate::tiling::constants::timing::DEFAULT_SYNC_TIMEOUT_MS;
use crate::tiling::{
    Display, InMemoryHost, Orchestrator, OrchestratorHandle, PreferenceUpdate, Rect, TilingEvent,
    TrackedWindows, TriggerCommand, TriggerParseError, Window, WindowState,
};

/// A desktop and the events to replay against it.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    /// Displays connected at the start.
    pub displays: Vec<Display>,

    /// Windows open at the start, in host order.
    pub windows: Vec<Window>,

    /// Preferences already stored before startup.
    pub preferences: Option<UserPreferences>,

    /// Events, replayed in order.
    pub events: Vec<ScenarioEvent>,
}

/// One step of a scenario.
///
/// Steps that change the desktop (opening, closing, dragging windows or
/// plugging displays) update the in-memory host and then report the matching
/// event, the way a real host would.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// The host started.
    Startup,
    /// Connect a display.
    ConnectDisplay { display: Display },
    /// Disconnect a display.
    DisconnectDisplay {
        #[serde(alias = "displayId")]
        display_id: u32,
    },
    /// Open a window.
    OpenWindow { window: Window },
    /// Close a window.
    CloseWindow {
        #[serde(alias = "windowId")]
        window_id: u32,
    },
    /// Move or resize a window by hand.
    DragWindow {
        #[serde(alias = "windowId")]
        window_id: u32,
        frame: Rect,
    },
    /// Change a window's state without reporting it.
    SetWindowState {
        #[serde(alias = "windowId")]
        window_id: u32,
        state: WindowState,
    },
    /// Tile every display.
    TileNow,
    /// Tile the display holding a window.
    TileDisplayOf {
        #[serde(alias = "windowId")]
        window_id: u32,
    },
    /// Change one preference.
    SetPreference { key: String, value: serde_json::Value },
    /// Run a trigger command such as `tile-all`.
    Trigger { command: String },
}

/// Final state of a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    /// Displays connected at the end.
    pub displays: Vec<Display>,
    /// Windows at the end, in host order.
    pub windows: Vec<Window>,
    /// Tracked records at the end.
    pub tracked: TrackedWindows,
    /// Move requests the engine issued.
    pub moves: usize,
    /// Epoch of the last finished tiling pass.
    pub settled_epoch: u64,
}

/// Reads a JSONC scenario file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_scenario(path: &Path) -> Result<Scenario, AutotileError> {
    let file = File::open(path).map_err(|err| {
        AutotileError::ScenarioError(format!("cannot open {}: {err}", path.display()))
    })?;
    let reader = StripComments::new(BufReader::new(file));

    serde_json::from_reader(reader).map_err(|err| {
        AutotileError::ScenarioError(format!("cannot parse {}: {err}", path.display()))
    })
}

/// Replays a scenario on a fresh in-memory host.
///
/// # Errors
///
/// Returns an error if an event is invalid or the orchestrator stops
/// responding.
pub async fn replay(scenario: Scenario, config: &AutotileConfig) -> Result<ReplayOutcome, AutotileError> {
    let host = InMemoryHost::with_displays(scenario.displays).with_windows(scenario.windows);

    if let Some(preferences) = scenario.preferences {
        host.durable().put(PREFERENCES_KEY, preferences.to_value());
    }

    let handle = Orchestrator::spawn(host.clone(), config);
    let sync_timeout = Duration::from_millis(DEFAULT_SYNC_TIMEOUT_MS);

    for (index, event) in scenario.events.into_iter().enumerate() {
        tracing::debug!(index, ?event, "replaying event");
        step(&host, &handle, event, sync_timeout).await?;
    }

    handle.sync(sync_timeout).await?;
    let snapshot = handle.snapshot().await?;
    handle.shutdown().await?;

    Ok(ReplayOutcome {
        displays: host.display_table().snapshot(),
        windows: host.window_table().snapshot(),
        tracked: snapshot.tracked,
        moves: host.window_table().move_count(),
        settled_epoch: snapshot.settled_epoch,
    })
}

async fn step(
    host: &InMemoryHost,
    handle: &OrchestratorHandle,
    event: ScenarioEvent,
    sync_timeout: Duration,
) -> Result<(), AutotileError> {
    let message = match event {
        ScenarioEvent::Startup => TilingEvent::Startup,
        ScenarioEvent::ConnectDisplay { display } => {
            host.display_table().connect(display);
            TilingEvent::DisplaysChanged
        }
        ScenarioEvent::DisconnectDisplay { display_id } => {
            host.display_table().disconnect(display_id);
            TilingEvent::DisplaysChanged
        }
        ScenarioEvent::OpenWindow { window } => {
            host.window_table().open(window.clone());
            TilingEvent::WindowCreated { window }
        }
        ScenarioEvent::CloseWindow { window_id } => {
            host.window_table().close(window_id);
            TilingEvent::WindowRemoved { window_id }
        }
        ScenarioEvent::DragWindow { window_id, frame } => {
            // A hand drag happens after earlier passes have settled
            handle.sync(sync_timeout).await?;
            host.window_table().drag(window_id, frame);
            TilingEvent::WindowBoundsChanged {
                window_id,
                observed_epoch: handle.settled_epoch(),
            }
        }
        ScenarioEvent::SetWindowState { window_id, state } => {
            handle.sync(sync_timeout).await?;
            host.window_table().set_state(window_id, state);
            return Ok(());
        }
        ScenarioEvent::TileNow => TilingEvent::TileNow,
        ScenarioEvent::TileDisplayOf { window_id } => TilingEvent::TileDisplayOf { window_id },
        ScenarioEvent::SetPreference { key, value } => {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            let update = PreferenceUpdate::parse(&key, &value)
                .map_err(|err| AutotileError::ScenarioError(err.to_string()))?;
            TilingEvent::SetPreference(update)
        }
        ScenarioEvent::Trigger { command } => {
            let command: TriggerCommand =
                command.parse().map_err(|err: TriggerParseError| AutotileError::ScenarioError(err.to_string()))?;
            TilingEvent::Trigger(command)
        }
    };

    handle.send_async(message).await?;
    Ok(())
}
