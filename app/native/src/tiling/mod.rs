//! Automatic window tiling.
//!
//! Keeps the normal, non-minimized windows of every display arranged in a
//! non-overlapping grid, optionally with one enlarged master window anchored
//! to the start or end of the display.
//!
//! # Layers
//!
//! - [`layout`] - pure grid and master rectangle math
//! - [`screen`] - which display a window belongs to
//! - [`executor`] - plans and applies placements for one display
//! - [`actor`] - the orchestrator that reacts to host events
//! - [`host`] - traits the embedding host implements, plus an in-memory host
//!
//! # Usage
//!
//! ```ignore
//! let handle = Orchestrator::spawn(host, config);
//! handle.startup()?;
//! handle.window_created(window)?;
//! ```

pub mod actor;
pub mod constants;
pub mod error;
pub mod executor;
pub mod host;
pub mod layout;
pub mod screen;
pub mod state;
pub mod tracked;

pub use actor::{
    ActorError, Orchestrator, OrchestratorHandle, PreferenceUpdate, Snapshot, TilingEvent,
    TriggerCommand, TriggerParseError,
};
pub use error::{CallKind, TilingError, TilingResult};
pub use executor::{ApplyReport, Placement, TileRole, apply, plan_tiles};
pub use host::memory::InMemoryHost;
pub use host::{DisplayService, Host, HostClient, KeyValueStore, WindowService};
pub use layout::{GridShape, MasterSplit, TileLayout, compute_grid, compute_master, grid_shape};
pub use screen::{display_by_id, resolve_display, resolve_display_for_frame};
pub use state::{Display, Orientation, Rect, Window, WindowKind, WindowState};
pub use tracked::{TiledWindowRecord, TrackedWindows};
