//! Tiling orchestrator actor.
//!
//! The orchestrator owns the host connection and the epoch counters, and
//! processes [`TilingEvent`]s one at a time from a bounded queue. Because
//! only one handler runs at any moment, two tiling passes never interleave
//! and never race on the persisted tracked-window state.
//!
//! # Decisions
//!
//! Each handler maps its event to an [`Action`] through
//! [`transitions::plan`] and then performs it. See that module for the full
//! table.
//!
//! # Epochs
//!
//! Every per-display tiling pass runs under a fresh epoch and stamps the
//! records it touches with it. The newest finished epoch is shared with
//! [`OrchestratorHandle`], which stamps bounds-changed reports with it. A
//! report observed before the pass that last placed a window finished is
//! the engine's own echo and is ignored.
//!
//! The session store can outlive the actor. Before handling its first event
//! the actor catches its clock up with the newest stored epoch, and records
//! stamped by an earlier actor count as settled.
//!
//! # Panic Recovery
//!
//! If a handler panics, the panic is caught and logged and the actor moves
//! on to the next event. Persisted state is only ever written as a whole, so
//! a panicking handler leaves the previous state in place.

mod handle;
mod messages;
mod pass;
pub mod transitions;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
pub use handle::{ActorError, OrchestratorHandle};
pub use messages::{PreferenceUpdate, Snapshot, TilingEvent, TriggerCommand, TriggerParseError};
use tokio::sync::mpsc;
use transitions::{Action, EventKind, plan};

use super::host::store::{
    initialize_preferences, load_display_count, load_preferences, load_tracked, save_display_count,
    save_preferences,
};
use super::host::{Host, HostClient};
use super::state::Window;
use super::tracked::TiledWindowRecord;
use crate::config::{AutotileConfig, UserPreferences};

// ============================================================================
// Epochs
// ============================================================================

/// Epoch counters of the orchestrator.
#[derive(Debug)]
struct EpochClock {
    in_flight: u64,
    settled: Arc<AtomicU64>,
    /// Newest epoch found in the session store when the actor started.
    restored: u64,
}

impl EpochClock {
    const fn new(settled: Arc<AtomicU64>) -> Self { Self { in_flight: 0, settled, restored: 0 } }

    /// Starts a pass and returns its epoch.
    const fn begin(&mut self) -> u64 {
        self.in_flight += 1;
        self.in_flight
    }

    /// Marks the pass with `epoch` as finished.
    fn settle(&self, epoch: u64) { self.settled.store(epoch, Ordering::Release); }

    fn settled(&self) -> u64 { self.settled.load(Ordering::Acquire) }

    /// Moves both counters forward to at least `floor`.
    ///
    /// Used after a restart so stored records never carry an epoch newer
    /// than the clock.
    fn advance_to(&mut self, floor: u64) {
        if floor > self.in_flight {
            self.in_flight = floor;
            self.settle(floor);
        }
    }

    /// Records the newest stored epoch left by an earlier actor.
    ///
    /// Passes up to that epoch ran in a previous life and have settled, even
    /// for bounds changes stamped before the clock caught up.
    fn restore(&mut self, floor: u64) {
        self.restored = self.restored.max(floor);
        self.advance_to(floor);
    }

    /// Returns `true` if a bounds change observed at `observed_epoch` is a
    /// user action for `record`.
    const fn trusts(&self, record: &TiledWindowRecord, observed_epoch: u64) -> bool {
        record.applied_epoch <= self.restored || record.is_user_observation(observed_epoch)
    }
}

// ============================================================================
// Actor
// ============================================================================

/// What an action applies to.
#[derive(Debug, Clone)]
enum Subject {
    Nothing,
    Window(Window),
    WindowId(u32),
    Bounds { window_id: u32, observed_epoch: u64 },
}

/// The tiling orchestrator.
pub struct Orchestrator<H: Host> {
    client: HostClient<H>,
    receiver: mpsc::Receiver<TilingEvent>,
    epochs: EpochClock,
    /// Preferences written to the durable store on first startup.
    seed: UserPreferences,
}

impl<H: Host> Orchestrator<H> {
    /// Spawns an orchestrator on the current tokio runtime and returns a
    /// handle for communication.
    #[must_use]
    pub fn spawn(host: H, config: &AutotileConfig) -> OrchestratorHandle {
        tracing::debug!(
            host_timeout_ms = config.engine.host_timeout_ms,
            channel_capacity = config.engine.channel_capacity,
            "spawning tiling orchestrator"
        );
        let (sender, receiver) = mpsc::channel(config.engine.channel_capacity.max(1));
        let settled = Arc::new(AtomicU64::new(0));

        let actor = Self {
            client: HostClient::new(host, config.engine.host_timeout()),
            receiver,
            epochs: EpochClock::new(Arc::clone(&settled)),
            seed: config.preferences,
        };

        tokio::spawn(actor.run());

        OrchestratorHandle::new(sender, settled)
    }

    /// Runs the event loop until shutdown or until every handle is dropped.
    async fn run(mut self) {
        tracing::trace!("orchestrator loop starting");
        self.restore_epochs().await;

        while let Some(event) = self.receiver.recv().await {
            if matches!(event, TilingEvent::Shutdown) {
                tracing::debug!("orchestrator received shutdown");
                return;
            }

            let name = event.name();
            let result = AssertUnwindSafe(self.handle_event(event)).catch_unwind().await;

            if let Err(panic_info) = result {
                let message = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(event = name, panic = %message, "orchestrator recovered from panic");
            }
        }

        tracing::debug!("orchestrator channel closed, exiting");
    }

    /// Catches the epoch clock up with records stored by an earlier actor.
    async fn restore_epochs(&mut self) {
        let floor = load_tracked(&self.client.session()).await.max_applied_epoch();
        if floor > 0 {
            tracing::debug!(epoch = floor, "restored epoch clock from stored windows");
        }
        self.epochs.restore(floor);
    }

    /// Handles one event.
    async fn handle_event(&mut self, event: TilingEvent) {
        tracing::trace!(event = event.name(), "handling event");

        match event {
            TilingEvent::Startup => {
                let seed = self.seed;
                self.perform(Action::Initialize, &seed, Subject::Nothing).await;
            }
            TilingEvent::DisplaysChanged => self.on_displays_changed().await,
            TilingEvent::WindowCreated { window } => {
                let kind = EventKind::WindowCreated { normal: window.is_normal() };
                self.decide(kind, Subject::Window(window)).await;
            }
            TilingEvent::WindowRemoved { window_id } => {
                self.decide(EventKind::WindowRemoved, Subject::WindowId(window_id)).await;
            }
            TilingEvent::WindowBoundsChanged { window_id, observed_epoch } => {
                let subject = Subject::Bounds { window_id, observed_epoch };
                self.decide(EventKind::WindowBoundsChanged, subject).await;
            }
            TilingEvent::TileNow | TilingEvent::Trigger(TriggerCommand::TileAll) => {
                self.decide(EventKind::TileNow, Subject::Nothing).await;
            }
            TilingEvent::TileDisplayOf { window_id }
            | TilingEvent::Trigger(TriggerCommand::TileCurrent { window_id }) => {
                self.decide(EventKind::TileDisplayOf, Subject::WindowId(window_id)).await;
            }
            TilingEvent::SetPreference(update) => self.on_set_preference(update).await,
            TilingEvent::Snapshot { respond_to } => {
                let snapshot = Snapshot {
                    tracked: load_tracked(&self.client.session()).await,
                    in_flight_epoch: self.epochs.in_flight,
                    settled_epoch: self.epochs.settled(),
                };
                if respond_to.send(snapshot).is_err() {
                    tracing::trace!("snapshot requester went away");
                }
            }
            TilingEvent::Sync { respond_to } => {
                if respond_to.send(()).is_err() {
                    tracing::trace!("sync requester went away");
                }
            }
            TilingEvent::Shutdown => {}
        }
    }

    /// Loads fresh preferences, looks up the action and performs it.
    async fn decide(&mut self, kind: EventKind, subject: Subject) {
        let preferences = load_preferences(&self.client.durable()).await;
        let action = plan(kind, preferences.auto_tiling, false);
        self.perform(action, &preferences, subject).await;
    }

    async fn on_displays_changed(&mut self) {
        let preferences = load_preferences(&self.client.durable()).await;

        let displays = match self.client.list_displays().await {
            Ok(displays) => displays,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list displays");
                return;
            }
        };

        let session = self.client.session();
        let previous = load_display_count(&session).await;
        let current = displays.len();

        if let Err(err) = save_display_count(&session, current).await {
            tracing::warn!(error = %err, "failed to save display count");
        }

        tracing::debug!(previous, current, "display configuration changed");

        let action = plan(EventKind::DisplaysChanged, preferences.auto_tiling, previous != current);
        self.perform(action, &preferences, Subject::Nothing).await;
    }

    async fn on_set_preference(&mut self, update: PreferenceUpdate) {
        let mut preferences = load_preferences(&self.client.durable()).await;
        update.apply_to(&mut preferences);

        if let Err(err) = save_preferences(&self.client.durable(), &preferences).await {
            tracing::warn!(key = %update.key(), error = %err, "failed to save preference");
        }

        tracing::debug!(?update, "preference changed");

        let kind = match update {
            PreferenceUpdate::AutoTiling(enabled) => EventKind::AutoTilingToggled(enabled),
            other => EventKind::PreferenceChanged(other.key()),
        };
        let action = plan(kind, preferences.auto_tiling, false);
        self.perform(action, &preferences, Subject::Nothing).await;
    }

    /// Performs an action.
    async fn perform(&mut self, action: Action, preferences: &UserPreferences, subject: Subject) {
        tracing::trace!(?action, ?subject, "performing action");

        match (action, subject) {
            (Action::None, _) => {}
            (Action::Initialize, _) => self.initialize().await,
            (Action::RetileAll, _) => self.retile_all(preferences).await,
            (Action::RetileTracked, _) => self.retile_tracked(preferences).await,
            (Action::ClearTracked, _) => self.clear_tracked().await,
            (Action::RetileDisplayOfWindow, Subject::Window(window)) => {
                self.retile_display_of_frame(preferences, &window.frame).await;
            }
            (Action::RetileDisplayOfWindow, Subject::WindowId(window_id)) => {
                self.retile_display_of_window(preferences, window_id).await;
            }
            (Action::RetileAfterRemoval, Subject::WindowId(window_id)) => {
                self.retile_after_removal(preferences, window_id).await;
            }
            (Action::TrackDisplay, Subject::Bounds { window_id, observed_epoch }) => {
                self.track_display(window_id, observed_epoch).await;
            }
            (action, subject) => {
                tracing::warn!(?action, ?subject, "action does not apply to subject");
            }
        }
    }

    /// Stores the display count and normalises preferences.
    async fn initialize(&mut self) {
        match self.client.list_displays().await {
            Ok(displays) => {
                if let Err(err) = save_display_count(&self.client.session(), displays.len()).await {
                    tracing::warn!(error = %err, "failed to save display count");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to list displays"),
        }

        let preferences = initialize_preferences(&self.client.durable(), self.seed).await;
        let tracked = load_tracked(&self.client.session()).await;

        tracing::info!(
            auto_tiling = preferences.auto_tiling,
            tracked = tracked.len(),
            "tiling orchestrator initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_clock() {
        let settled = Arc::new(AtomicU64::new(0));
        let mut clock = EpochClock::new(Arc::clone(&settled));

        let epoch = clock.begin();
        assert_eq!(epoch, 1);
        assert_eq!(clock.settled(), 0);

        clock.settle(epoch);
        assert_eq!(settled.load(Ordering::Acquire), 1);
    }

    #[test]
    fn test_epoch_clock_advance() {
        let mut clock = EpochClock::new(Arc::new(AtomicU64::new(0)));

        clock.advance_to(5);
        assert_eq!(clock.settled(), 5);
        assert_eq!(clock.begin(), 6);

        // Never moves backwards
        clock.advance_to(2);
        assert_eq!(clock.settled(), 5);
    }

    #[test]
    fn test_restored_records_are_trusted() {
        let mut clock = EpochClock::new(Arc::new(AtomicU64::new(0)));
        clock.restore(7);

        // Stamped before the clock caught up
        let restored = TiledWindowRecord::new(1, 1, 7);
        assert!(clock.trusts(&restored, 0));

        // Placed in this life and not settled when observed
        let epoch = clock.begin();
        let placed = TiledWindowRecord::new(2, 1, epoch);
        assert!(!clock.trusts(&placed, 7));
        assert!(clock.trusts(&placed, epoch));
    }
}
