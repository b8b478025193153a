//! Tiling passes run by the orchestrator.

use super::Orchestrator;
use crate::config::UserPreferences;
use crate::tiling::error::TilingError;
use crate::tiling::executor::{ApplyReport, apply, plan_tiles};
use crate::tiling::host::{BoundedStore, Host, KeyValueStore};
use crate::tiling::host::store::{self, SaveOutcome, load_tracked, save_tracked};
use crate::tiling::screen::{display_by_id, resolve_display, resolve_display_for_frame};
use crate::tiling::state::{Display, Rect, Window};
use crate::tiling::tracked::TrackedWindows;

impl<H: Host> Orchestrator<H> {
    /// Lists displays, logging and swallowing failures.
    async fn query_displays(&self) -> Option<Vec<Display>> {
        match self.client.list_displays().await {
            Ok(displays) => Some(displays),
            Err(err) => {
                tracing::warn!(error = %err, "failed to list displays, skipping pass");
                None
            }
        }
    }

    /// Tiles every connected display in host order.
    pub(super) async fn retile_all(&mut self, preferences: &UserPreferences) {
        let Some(displays) = self.query_displays().await else { return };

        for display in &displays {
            self.tile_display(&displays, display, preferences).await;
        }
    }

    /// Tiles the displays that hold tracked windows.
    ///
    /// With a single display connected it is tiled unconditionally.
    pub(super) async fn retile_tracked(&mut self, preferences: &UserPreferences) {
        let Some(displays) = self.query_displays().await else { return };

        if let [only] = displays.as_slice() {
            self.tile_display(&displays, only, preferences).await;
            return;
        }

        let tracked_ids = load_tracked(&self.client.session()).await.display_ids();
        if tracked_ids.is_empty() {
            tracing::debug!("no tracked windows, nothing to retile");
            return;
        }

        for display in displays.iter().filter(|d| tracked_ids.contains(&d.id)) {
            self.tile_display(&displays, display, preferences).await;
        }
    }

    /// Tiles the display holding `frame`.
    pub(super) async fn retile_display_of_frame(
        &mut self,
        preferences: &UserPreferences,
        frame: &Rect,
    ) {
        let Some(displays) = self.query_displays().await else { return };

        match resolve_display_for_frame(&displays, frame) {
            Some(display) => {
                self.tile_display(&displays, display, preferences).await;
            }
            None => tracing::debug!(?frame, "window is off-screen, skipping"),
        }
    }

    /// Tiles the display holding the window `window_id`.
    pub(super) async fn retile_display_of_window(
        &mut self,
        preferences: &UserPreferences,
        window_id: u32,
    ) {
        match self.client.get_window(window_id).await {
            Ok(window) => self.retile_display_of_frame(preferences, &window.frame).await,
            Err(err) => tracing::warn!(window_id, error = %err, "failed to look up window"),
        }
    }

    /// Stops tracking a closed window and tiles the display it left.
    ///
    /// The display is only retiled while other tracked windows remain on it.
    pub(super) async fn retile_after_removal(
        &mut self,
        preferences: &UserPreferences,
        window_id: u32,
    ) {
        let session = self.client.session();
        let mut tracked = load_tracked(&session).await;

        let Some(record) = tracked.remove(window_id) else {
            tracing::trace!(window_id, "closed window was not tracked");
            return;
        };

        persist(&session, &mut tracked).await;

        if tracked.count_on_display(record.display_id) == 0 {
            tracing::debug!(
                window_id,
                display_id = record.display_id,
                "last tracked window left display"
            );
            return;
        }

        let Some(displays) = self.query_displays().await else { return };

        match display_by_id(&displays, record.display_id)
            .ok_or(TilingError::DisplayNotFound(record.display_id))
        {
            Ok(display) => {
                self.tile_display(&displays, display, preferences).await;
            }
            Err(err) => tracing::debug!(window_id, error = %err, "display is gone, skipping"),
        }
    }

    /// Updates the display a tracked window belongs to after a user move.
    ///
    /// Bounds changes observed before the pass that last placed the window
    /// had settled are the engine's own echoes and are ignored.
    pub(super) async fn track_display(&mut self, window_id: u32, observed_epoch: u64) {
        let session = self.client.session();
        let mut tracked = load_tracked(&session).await;

        let Some(record) = tracked.get(window_id) else { return };

        if !self.epochs.trusts(record, observed_epoch) {
            tracing::trace!(
                window_id,
                observed_epoch,
                applied_epoch = record.applied_epoch,
                "ignoring bounds change caused by tiling"
            );
            return;
        }

        let window = match self.client.get_window(window_id).await {
            Ok(window) => window,
            Err(err) => {
                tracing::warn!(window_id, error = %err, "failed to look up window");
                return;
            }
        };

        let Some(displays) = self.query_displays().await else { return };
        let Some(target) = resolve_display(&displays, &window) else {
            tracing::debug!(window_id, "window moved off-screen");
            return;
        };

        if let Some(record) = tracked.get_mut(window_id)
            && record.display_id != target.id
        {
            tracing::debug!(
                window_id,
                from = record.display_id,
                to = target.id,
                "window changed display"
            );
            record.display_id = target.id;
            persist(&session, &mut tracked).await;
        }
    }

    /// Forgets every tracked window.
    pub(super) async fn clear_tracked(&self) {
        match store::clear_tracked(&self.client.session()).await {
            Ok(()) => tracing::debug!("cleared tracked windows"),
            Err(err) => tracing::warn!(error = %err, "failed to clear tracked windows"),
        }
    }

    /// Runs one tiling pass for `target` under a fresh epoch.
    pub(super) async fn tile_display(
        &mut self,
        displays: &[Display],
        target: &Display,
        preferences: &UserPreferences,
    ) -> Option<ApplyReport> {
        let epoch = self.epochs.begin();
        let report = self.run_pass(displays, target, preferences, epoch).await;
        self.epochs.settle(epoch);
        report
    }

    async fn run_pass(
        &self,
        displays: &[Display],
        target: &Display,
        preferences: &UserPreferences,
        epoch: u64,
    ) -> Option<ApplyReport> {
        let windows = match self.client.list_windows().await {
            Ok(windows) => windows,
            Err(err) => {
                tracing::warn!(
                    display_id = target.id,
                    transient = err.is_transient(),
                    error = %err,
                    "failed to list windows"
                );
                return None;
            }
        };

        let eligible = windows_on_display(windows, displays, target);
        if eligible.is_empty() {
            tracing::trace!(display_id = target.id, "no windows to tile");
            return None;
        }

        let session = self.client.session();
        let mut tracked = load_tracked(&session).await;

        let placements = plan_tiles(target, eligible, preferences);
        let report = apply(&self.client, target.id, &placements, &mut tracked, epoch).await;

        persist(&session, &mut tracked).await;

        tracing::debug!(
            display_id = target.id,
            epoch,
            placed = report.placed,
            moved = report.moved,
            failed = report.failed,
            "tiled display"
        );

        Some(report)
    }
}

/// Keeps the tileable windows that belong to `target`, in host order.
///
/// With a single display every tileable window belongs to it.
fn windows_on_display(windows: Vec<Window>, displays: &[Display], target: &Display) -> Vec<Window> {
    let single = displays.len() == 1;

    windows
        .into_iter()
        .filter(Window::is_tileable)
        .filter(|w| single || resolve_display(displays, w).is_some_and(|d| d.id == target.id))
        .collect()
}

/// Writes tracked windows back, logging failures and stale writes.
async fn persist<S: KeyValueStore>(session: &BoundedStore<'_, S>, tracked: &mut TrackedWindows) {
    match save_tracked(session, tracked).await {
        Ok(SaveOutcome::Saved(revision)) => tracing::trace!(revision, "saved tracked windows"),
        Ok(SaveOutcome::Stale { .. }) => {}
        Err(err) => tracing::warn!(error = %err, "failed to save tracked windows"),
    }
}
