//! Internal constants for the tiling engine.
//!
//! Constants are grouped by functionality:
//! - `layout` - Grid and master layout thresholds
//! - `timing` - Time bounds for external calls
//! - `actor` - Orchestrator mailbox sizing
//! - `storage` - Keys and fallbacks for persisted state

/// Layout calculation thresholds.
pub mod layout {
    /// Minimum usable width of a grid column, in pixels.
    ///
    /// A work area narrower than two of these (plus outer padding) is tiled
    /// as a single vertical stack.
    pub const MIN_COLUMN_WIDTH: i32 = 500;

    /// Multiplier applied to the padding when sizing the master window.
    ///
    /// The master rectangle loses one outer padding and half of the inner
    /// padding it shares with the grid.
    pub const MASTER_PADDING_FACTOR: f64 = 1.5;
}

/// Time bounds for calls into the host.
pub mod timing {
    /// Default time bound for a single host call (ms).
    pub const DEFAULT_HOST_TIMEOUT_MS: u64 = 2_000;

    /// Default time bound for `OrchestratorHandle::sync` round trips (ms).
    pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 10_000;
}

/// Orchestrator actor sizing.
pub mod actor {
    /// Default capacity of the orchestrator mailbox.
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
}

/// Persisted-state keys and fallbacks.
pub mod storage {
    /// Durable store key holding the user preferences.
    pub const PREFERENCES_KEY: &str = "preferences";

    /// Session store key holding the tracked-window records.
    pub const TRACKED_WINDOWS_KEY: &str = "tiled_windows";

    /// Session store key holding the last known display count.
    pub const DISPLAY_COUNT_KEY: &str = "number_of_displays";

    /// Display count assumed when none has been stored yet.
    pub const DEFAULT_DISPLAY_COUNT: usize = 1;
}
