//! Handle for communicating with the orchestrator actor.
//!
//! The `OrchestratorHandle` is the entry point for every host event. It is
//! cheap to clone and can be shared across tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::messages::{PreferenceUpdate, Snapshot, TilingEvent, TriggerCommand};
use crate::tiling::state::Window;

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

/// Handle for communicating with the orchestrator.
#[derive(Clone)]
pub struct OrchestratorHandle {
    sender: mpsc::Sender<TilingEvent>,
    settled_epoch: Arc<AtomicU64>,
}

impl OrchestratorHandle {
    /// Create a new handle with the given sender and shared settled epoch.
    pub(crate) const fn new(sender: mpsc::Sender<TilingEvent>, settled_epoch: Arc<AtomicU64>) -> Self {
        Self { sender, settled_epoch }
    }

    /// Returns the epoch of the newest finished tiling pass.
    #[must_use]
    pub fn settled_epoch(&self) -> u64 { self.settled_epoch.load(Ordering::Acquire) }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Send an event without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, event: TilingEvent) -> Result<(), ActorError> {
        self.sender.try_send(event).map_err(|_| ActorError::SendFailed)
    }

    /// Send an event, waiting for room in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn send_async(&self, event: TilingEvent) -> Result<(), ActorError> {
        self.sender.send(event).await.map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Reports a startup.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn startup(&self) -> Result<(), ActorError> { self.send(TilingEvent::Startup) }

    /// Reports a display configuration change.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn displays_changed(&self) -> Result<(), ActorError> {
        self.send(TilingEvent::DisplaysChanged)
    }

    /// Reports a new window.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn window_created(&self, window: Window) -> Result<(), ActorError> {
        self.send(TilingEvent::WindowCreated { window })
    }

    /// Reports a closed window.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn window_removed(&self, window_id: u32) -> Result<(), ActorError> {
        self.send(TilingEvent::WindowRemoved { window_id })
    }

    /// Reports a moved or resized window, stamped with the current settled
    /// epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn window_bounds_changed(&self, window_id: u32) -> Result<(), ActorError> {
        self.window_bounds_changed_at(window_id, self.settled_epoch())
    }

    /// Reports a moved or resized window observed at a given epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn window_bounds_changed_at(&self, window_id: u32, observed_epoch: u64) -> Result<(), ActorError> {
        self.send(TilingEvent::WindowBoundsChanged { window_id, observed_epoch })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Tiles every display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn tile_now(&self) -> Result<(), ActorError> { self.send(TilingEvent::TileNow) }

    /// Tiles the display holding a window.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn tile_display_of(&self, window_id: u32) -> Result<(), ActorError> {
        self.send(TilingEvent::TileDisplayOf { window_id })
    }

    /// Changes one preference.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn set_preference(&self, update: PreferenceUpdate) -> Result<(), ActorError> {
        self.send(TilingEvent::SetPreference(update))
    }

    /// Turns automatic tiling on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn set_auto_tiling(&self, enabled: bool) -> Result<(), ActorError> {
        self.set_preference(PreferenceUpdate::AutoTiling(enabled))
    }

    /// Runs an external command.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub fn trigger(&self, command: TriggerCommand) -> Result<(), ActorError> {
        self.send(TilingEvent::Trigger(command))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the tracked state once every earlier event has been handled.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn snapshot(&self) -> Result<Snapshot, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send_async(TilingEvent::Snapshot { respond_to: tx }).await?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Waits until every earlier event has been handled.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the actor does not catch up in
    /// time, or a channel error.
    pub async fn sync(&self, timeout: Duration) -> Result<(), ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send_async(TilingEvent::Sync { respond_to: tx }).await?;

        tokio::time::timeout(timeout, rx)
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
            .map_err(|_| ActorError::ReceiveFailed)
    }

    /// Stops the actor after the events already queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has already stopped.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        self.send_async(TilingEvent::Shutdown).await
    }
}
