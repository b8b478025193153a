//! Tracked-window records.
//!
//! A window is "tracked" while the engine manages its placement. Each tracked
//! window has exactly one [`TiledWindowRecord`] holding the display it was
//! last placed on and the epoch of the tiling pass that last moved it.
//!
//! # Epochs
//!
//! Every tiling pass runs under a fresh epoch. Records touched by a pass are
//! stamped with that epoch; once the pass finishes, the epoch becomes the
//! *settled* epoch. A record whose `applied_epoch` is newer than the settled
//! epoch is still being placed by the engine, so bounds changes reported for
//! it are the engine's own echo rather than a user action.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placement record for one engine-managed window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TiledWindowRecord {
    /// The managed window.
    #[serde(alias = "winId")]
    pub window_id: u32,

    /// The display the window was last resolved to.
    pub display_id: u32,

    /// Epoch of the tiling pass that last placed the window.
    #[serde(default)]
    pub applied_epoch: u64,
}

impl TiledWindowRecord {
    /// Creates a record placed under the given epoch.
    #[must_use]
    pub const fn new(window_id: u32, display_id: u32, applied_epoch: u64) -> Self {
        Self { window_id, display_id, applied_epoch }
    }

    /// Returns `true` while the engine's own placement of this window has
    /// not settled yet.
    #[must_use]
    pub const fn ignore_update(&self, settled_epoch: u64) -> bool {
        self.applied_epoch > settled_epoch
    }

    /// Returns `true` if a bounds change observed at `observed_epoch` can be
    /// trusted as a user action.
    #[must_use]
    pub const fn is_user_observation(&self, observed_epoch: u64) -> bool {
        observed_epoch >= self.applied_epoch
    }
}

/// The persisted set of tracked windows.
///
/// `revision` increases on every successful write and is used to reject
/// writes computed from a stale read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackedWindows {
    /// Revision of the stored copy this value was read from.
    pub revision: u64,

    /// One record per managed window, in insertion order.
    pub windows: Vec<TiledWindowRecord>,
}

impl TrackedWindows {
    /// Creates an empty set at revision zero.
    #[must_use]
    pub const fn new() -> Self { Self { revision: 0, windows: Vec::new() } }

    /// Returns the number of tracked windows.
    #[must_use]
    pub fn len(&self) -> usize { self.windows.len() }

    /// Returns `true` if no window is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    /// Returns the record for a window.
    #[must_use]
    pub fn get(&self, window_id: u32) -> Option<&TiledWindowRecord> {
        self.windows.iter().find(|r| r.window_id == window_id)
    }

    /// Returns the record for a window, mutably.
    pub fn get_mut(&mut self, window_id: u32) -> Option<&mut TiledWindowRecord> {
        self.windows.iter_mut().find(|r| r.window_id == window_id)
    }

    /// Returns `true` if the window is tracked.
    #[must_use]
    pub fn contains(&self, window_id: u32) -> bool { self.get(window_id).is_some() }

    /// Creates or refreshes the record for a window.
    ///
    /// Existing records keep their position in the sequence; their display
    /// and epoch are overwritten. At most one record per window ever exists.
    pub fn upsert(&mut self, window_id: u32, display_id: u32, epoch: u64) -> &mut TiledWindowRecord {
        let index = match self.windows.iter().position(|r| r.window_id == window_id) {
            Some(index) => {
                let record = &mut self.windows[index];
                record.display_id = display_id;
                record.applied_epoch = epoch;
                index
            }
            None => {
                self.windows.push(TiledWindowRecord::new(window_id, display_id, epoch));
                self.windows.len() - 1
            }
        };

        &mut self.windows[index]
    }

    /// Removes the record for a window, returning it.
    pub fn remove(&mut self, window_id: u32) -> Option<TiledWindowRecord> {
        let index = self.windows.iter().position(|r| r.window_id == window_id)?;
        Some(self.windows.remove(index))
    }

    /// Drops every record.
    pub fn clear(&mut self) { self.windows.clear(); }

    /// Returns the distinct display ids holding tracked windows, in
    /// first-seen order.
    #[must_use]
    pub fn display_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for record in &self.windows {
            if !ids.contains(&record.display_id) {
                ids.push(record.display_id);
            }
        }
        ids
    }

    /// Returns the number of tracked windows on a display.
    #[must_use]
    pub fn count_on_display(&self, display_id: u32) -> usize {
        self.windows.iter().filter(|r| r.display_id == display_id).count()
    }

    /// Returns the newest epoch stamped on any record.
    #[must_use]
    pub fn max_applied_epoch(&self) -> u64 {
        self.windows.iter().map(|r| r.applied_epoch).max().unwrap_or(0)
    }
}

// ============================================================================
// Tests
// ============================================================================
