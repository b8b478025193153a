//! Orchestrator transition table.
//!
//! Every decision the orchestrator makes is a pure function of the event
//! kind, whether auto-tiling is enabled and whether the display count
//! changed. Handlers look the action up here and only then touch the host.

use crate::config::PreferenceKey;

/// What happened, stripped of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Startup,
    DisplaysChanged,
    /// `normal` is `false` for popups, panels and other non-tiled kinds.
    WindowCreated { normal: bool },
    WindowRemoved,
    WindowBoundsChanged,
    TileNow,
    TileDisplayOf,
    PreferenceChanged(PreferenceKey),
    AutoTilingToggled(bool),
}

/// What to do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing.
    None,
    /// Store the display count and normalise preferences.
    Initialize,
    /// Tile every connected display.
    RetileAll,
    /// Tile the display holding the event's window.
    RetileDisplayOfWindow,
    /// Drop the window's record and tile the display it left.
    RetileAfterRemoval,
    /// Refresh the window's display id without tiling.
    TrackDisplay,
    /// Tile the displays holding tracked windows.
    RetileTracked,
    /// Stop tracking every window without moving any.
    ClearTracked,
}

/// Looks up the action for an event.
///
/// `auto_tiling` is the preference value after the event was applied.
#[must_use]
pub const fn plan(kind: EventKind, auto_tiling: bool, display_count_changed: bool) -> Action {
    match kind {
        EventKind::Startup => Action::Initialize,

        EventKind::DisplaysChanged if auto_tiling && display_count_changed => Action::RetileAll,

        EventKind::WindowCreated { normal: true } if auto_tiling => Action::RetileDisplayOfWindow,

        EventKind::WindowRemoved if auto_tiling => Action::RetileAfterRemoval,

        EventKind::WindowBoundsChanged if auto_tiling => Action::TrackDisplay,

        EventKind::TileNow => Action::RetileAll,

        EventKind::TileDisplayOf => Action::RetileDisplayOfWindow,

        EventKind::PreferenceChanged(PreferenceKey::MasterWindow | PreferenceKey::Padding)
            if auto_tiling =>
        {
            Action::RetileTracked
        }

        EventKind::PreferenceChanged(PreferenceKey::MasterRatio) if auto_tiling => Action::RetileAll,

        EventKind::PreferenceChanged(PreferenceKey::AutoTiling) => toggle(auto_tiling),

        EventKind::AutoTilingToggled(enabled) => toggle(enabled),

        _ => Action::None,
    }
}

const fn toggle(enabled: bool) -> Action {
    if enabled { Action::RetileAll } else { Action::ClearTracked }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BOOLS: [bool; 2] = [false, true];

    #[test]
    fn test_startup_always_initializes() {
        for enabled in BOOLS {
            for changed in BOOLS {
                assert_eq!(plan(EventKind::Startup, enabled, changed), Action::Initialize);
            }
        }
    }

    #[test]
    fn test_displays_changed() {
        assert_eq!(plan(EventKind::DisplaysChanged, true, true), Action::RetileAll);
        assert_eq!(plan(EventKind::DisplaysChanged, true, false), Action::None);
        assert_eq!(plan(EventKind::DisplaysChanged, false, true), Action::None);
        assert_eq!(plan(EventKind::DisplaysChanged, false, false), Action::None);
    }

    #[test]
    fn test_window_created() {
        let normal = EventKind::WindowCreated { normal: true };
        let popup = EventKind::WindowCreated { normal: false };

        assert_eq!(plan(normal, true, false), Action::RetileDisplayOfWindow);
        assert_eq!(plan(normal, false, false), Action::None);
        assert_eq!(plan(popup, true, false), Action::None);
    }

    #[test]
    fn test_window_removed() {
        assert_eq!(plan(EventKind::WindowRemoved, true, false), Action::RetileAfterRemoval);
        assert_eq!(plan(EventKind::WindowRemoved, false, false), Action::None);
    }

    #[test]
    fn test_bounds_changed_never_retiles() {
        assert_eq!(plan(EventKind::WindowBoundsChanged, true, false), Action::TrackDisplay);
        assert_eq!(plan(EventKind::WindowBoundsChanged, false, false), Action::None);
    }

    #[test]
    fn test_manual_tiling_ignores_auto_tiling() {
        for enabled in BOOLS {
            assert_eq!(plan(EventKind::TileNow, enabled, false), Action::RetileAll);
            assert_eq!(plan(EventKind::TileDisplayOf, enabled, false), Action::RetileDisplayOfWindow);
        }
    }

    #[test]
    fn test_preference_changes() {
        let master = EventKind::PreferenceChanged(PreferenceKey::MasterWindow);
        let padding = EventKind::PreferenceChanged(PreferenceKey::Padding);
        let ratio = EventKind::PreferenceChanged(PreferenceKey::MasterRatio);

        assert_eq!(plan(master, true, false), Action::RetileTracked);
        assert_eq!(plan(padding, true, false), Action::RetileTracked);
        assert_eq!(plan(ratio, true, false), Action::RetileAll);

        for kind in [master, padding, ratio] {
            assert_eq!(plan(kind, false, false), Action::None);
        }
    }

    #[test]
    fn test_auto_tiling_toggle() {
        assert_eq!(plan(EventKind::AutoTilingToggled(true), true, false), Action::RetileAll);
        assert_eq!(plan(EventKind::AutoTilingToggled(false), false, false), Action::ClearTracked);

        let key = EventKind::PreferenceChanged(PreferenceKey::AutoTiling);
        assert_eq!(plan(key, true, false), Action::RetileAll);
        assert_eq!(plan(key, false, false), Action::ClearTracked);
    }
}
