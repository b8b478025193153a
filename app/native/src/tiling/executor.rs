//! Tile application.
//!
//! A display is tiled in two steps:
//!
//! 1. [`plan_tiles`] turns the windows on a display and the current
//!    preferences into absolute target rectangles. It is pure.
//! 2. [`apply`] records every planned window as tracked under the pass's
//!    epoch, then asks the host to move only the windows whose current
//!    frame differs from their target.
//!
//! Skipping windows that are already in place keeps a repeated pass from
//! issuing any move, and from producing bounds-changed echoes.

use super::host::{Host, HostClient};
use super::layout::{compute_grid, compute_master};
use super::state::{Display, Rect, Window};
use super::tracked::TrackedWindows;
use crate::config::UserPreferences;

/// Role of a window in a display's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRole {
    Master,
    Grid,
}

/// Target rectangle for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub window: Window,
    pub target: Rect,
    pub role: TileRole,
}

impl Placement {
    /// Returns `true` if the window already sits at its target.
    #[must_use]
    pub fn is_in_place(&self) -> bool { self.window.frame == self.target }
}

/// Computes absolute target rectangles for `windows` on `display`.
///
/// With a master anchor set and at least two windows, the first window
/// becomes the master and the rest fill the grid beside it.
#[must_use]
pub fn plan_tiles(
    display: &Display,
    windows: Vec<Window>,
    preferences: &UserPreferences,
) -> Vec<Placement> {
    let padding = preferences.padding.pixels();
    let orientation = display.orientation();
    let mut area = display.work_area;
    let mut placements = Vec::with_capacity(windows.len());

    let use_master = windows.len() >= 2;
    let mut windows = windows.into_iter();

    if use_master
        && let Some(split) = compute_master(
            &area,
            orientation,
            preferences.master_window,
            preferences.master_ratio,
            padding,
        )
        && let Some(master) = windows.next()
    {
        placements.push(Placement {
            window: master,
            target: split.master,
            role: TileRole::Master,
        });
        area = split.remaining;
    }

    let rest: Vec<Window> = windows.collect();
    let layout = compute_grid(&area, orientation, rest.len(), padding);

    for (window, tile) in rest.into_iter().zip(layout) {
        placements.push(Placement {
            window,
            target: tile.translate(area.left, area.top),
            role: TileRole::Grid,
        });
    }

    placements
}

/// Counters for one application of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Windows recorded as tracked.
    pub placed: usize,
    /// Move requests that succeeded.
    pub moved: usize,
    /// Move requests that failed and were skipped.
    pub failed: usize,
}

/// Applies a plan for the display `display_id`.
///
/// Every planned window is upserted into `tracked` with `epoch` before any
/// move is issued. A failed move is logged and skipped; the remaining
/// windows are still placed.
pub async fn apply<H: Host>(
    client: &HostClient<H>,
    display_id: u32,
    placements: &[Placement],
    tracked: &mut TrackedWindows,
    epoch: u64,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for placement in placements {
        tracked.upsert(placement.window.id, display_id, epoch);
        report.placed += 1;
    }

    for placement in placements {
        let window_id = placement.window.id;

        if placement.is_in_place() {
            tracing::trace!(window_id, "window already in place");
            continue;
        }

        tracing::trace!(
            window_id,
            role = ?placement.role,
            target = ?placement.target,
            "moving window"
        );

        match client.move_resize(window_id, placement.target).await {
            Ok(()) => report.moved += 1,
            Err(err) => {
                tracing::warn!(
                    window_id,
                    transient = err.is_transient(),
                    error = %err,
                    "failed to move window, skipping"
                );
                report.failed += 1;
            }
        }
    }

    report
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{MasterRatio, MasterWindow, Padding};
    use crate::tiling::host::memory::InMemoryHost;

    fn display() -> Display { Display::new(1, Rect::new(0, 0, 1920, 1080)) }

    fn windows(count: u32) -> Vec<Window> {
        (1..=count).map(|id| Window::new(id, Rect::new(0, 0, 400, 300))).collect()
    }

    fn master_start() -> UserPreferences {
        UserPreferences {
            master_window: MasterWindow::Start,
            master_ratio: MasterRatio::Half,
            padding: Padding::Small,
            ..UserPreferences::default()
        }
    }

    // ------------------------------------------------------------------------
    // Planning
    // ------------------------------------------------------------------------

    #[test]
    fn test_plan_without_master() {
        let plan = plan_tiles(&display(), windows(2), &UserPreferences::default());

        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|p| p.role == TileRole::Grid));
        assert_eq!(plan[0].target, Rect::new(10, 10, 945, 1060));
        assert_eq!(plan[1].target, Rect::new(965, 10, 945, 1060));
    }

    #[test]
    fn test_plan_with_master_start() {
        let plan = plan_tiles(&display(), windows(3), &master_start());

        assert_eq!(plan[0].role, TileRole::Master);
        assert_eq!(plan[0].window.id, 1);
        assert_eq!(plan[0].target, Rect::new(10, 10, 945, 1060));

        // Remaining 965px is narrow, so the grid is one column
        assert_eq!(plan[1].target, Rect::new(965, 10, 945, 525));
        assert_eq!(plan[2].target, Rect::new(965, 545, 945, 525));
    }

    #[test]
    fn test_plan_with_master_end() {
        let prefs = UserPreferences { master_window: MasterWindow::End, ..master_start() };
        let plan = plan_tiles(&display(), windows(2), &prefs);

        assert_eq!(plan[0].target, Rect::new(965, 10, 945, 1060));
        assert_eq!(plan[1].target, Rect::new(10, 10, 945, 1060));
    }

    #[test]
    fn test_single_window_never_becomes_master() {
        let plan = plan_tiles(&display(), windows(1), &master_start());

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].role, TileRole::Grid);
        assert_eq!(plan[0].target, Rect::new(10, 10, 1900, 1060));
    }

    #[test]
    fn test_plan_offsets_by_display_origin() {
        let display = Display::new(2, Rect::new(1920, 25, 1920, 1055));
        let plan = plan_tiles(&display, windows(1), &UserPreferences::default());

        assert_eq!(plan[0].target, Rect::new(1930, 35, 1900, 1035));
    }

    #[test]
    fn test_plan_keeps_display_orientation_after_split() {
        // Master leaves a portrait-shaped remainder on a landscape display;
        // two grid windows still sit side by side if the area is wide enough.
        let display = Display::new(1, Rect::new(0, 0, 3440, 1440));
        let prefs = UserPreferences { master_ratio: MasterRatio::TwoThirds, ..master_start() };
        let plan = plan_tiles(&display, windows(3), &prefs);

        assert_eq!(plan[1].target.top, plan[2].target.top);
        assert!(plan[1].target.left < plan[2].target.left);
    }

    #[test]
    fn test_plan_empty() {
        assert!(plan_tiles(&display(), Vec::new(), &master_start()).is_empty());
    }

    // ------------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------------

    fn client(host: &InMemoryHost) -> HostClient<InMemoryHost> {
        HostClient::new(host.clone(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_apply_moves_only_misplaced_windows() {
        let host = InMemoryHost::with_displays(vec![display()]).with_windows(windows(2));
        host.window_table().drag(2, Rect::new(965, 10, 945, 1060));

        let plan = plan_tiles(&display(), host.window_table().snapshot(), &UserPreferences::default());
        let mut tracked = TrackedWindows::new();
        let report = apply(&client(&host), 1, &plan, &mut tracked, 1).await;

        assert_eq!(report, ApplyReport { placed: 2, moved: 1, failed: 0 });
        assert_eq!(host.window_table().moves()[0].window_id, 1);
        assert_eq!(tracked.len(), 2);
        assert!(tracked.windows.iter().all(|r| r.applied_epoch == 1 && r.display_id == 1));
    }

    #[tokio::test]
    async fn test_apply_twice_is_idempotent() {
        let host = InMemoryHost::with_displays(vec![display()]).with_windows(windows(4));
        let client = client(&host);
        let mut tracked = TrackedWindows::new();

        let plan = plan_tiles(&display(), host.window_table().snapshot(), &master_start());
        let first = apply(&client, 1, &plan, &mut tracked, 1).await;
        assert_eq!(first.moved, 4);

        let plan = plan_tiles(&display(), host.window_table().snapshot(), &master_start());
        let second = apply(&client, 1, &plan, &mut tracked, 2).await;
        assert_eq!(second.moved, 0);
        assert_eq!(host.window_table().move_count(), 4);
    }

    #[tokio::test]
    async fn test_apply_skips_failed_moves() {
        let host = InMemoryHost::with_displays(vec![display()]).with_windows(windows(3));
        host.window_table().fail_moves_for(2);

        let plan = plan_tiles(&display(), host.window_table().snapshot(), &UserPreferences::default());
        let mut tracked = TrackedWindows::new();
        let report = apply(&client(&host), 1, &plan, &mut tracked, 1).await;

        assert_eq!(report, ApplyReport { placed: 3, moved: 2, failed: 1 });
        // The failed window stays tracked
        assert!(tracked.contains(2));
    }
}
