//! Host service contracts.
//!
//! The engine never enumerates displays or windows itself. It talks to a
//! [`Host`] that bundles four capabilities:
//!
//! - a [`DisplayService`] listing connected displays
//! - a [`WindowService`] listing, reading and moving windows
//! - a durable [`KeyValueStore`] holding user preferences
//! - a session [`KeyValueStore`] holding tracked windows and the last known
//!   display count, cleared when the host session ends
//!
//! Every call the engine makes goes through [`HostClient`], which bounds it
//! with a timeout so a stuck host cannot stall the orchestrator.

pub mod memory;
pub mod store;

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use super::error::{CallKind, TilingError, TilingResult};
use super::state::{Display, Rect, Window};

// ============================================================================
// Service Contracts
// ============================================================================

/// Enumerates connected displays.
pub trait DisplayService: Send + Sync {
    /// Returns every connected display, in host order.
    fn list_displays(&self) -> impl Future<Output = TilingResult<Vec<Display>>> + Send;
}

/// Enumerates and moves windows.
pub trait WindowService: Send + Sync {
    /// Returns every window, in host order.
    fn list_windows(&self) -> impl Future<Output = TilingResult<Vec<Window>>> + Send;

    /// Returns a single window.
    fn get_window(&self, id: u32) -> impl Future<Output = TilingResult<Window>> + Send;

    /// Moves and resizes a window, restoring it to the normal state.
    fn move_resize(&self, id: u32, rect: Rect) -> impl Future<Output = TilingResult<()>> + Send;
}

/// A string-keyed JSON value store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = TilingResult<Option<Value>>> + Send;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = TilingResult<()>> + Send;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str) -> impl Future<Output = TilingResult<()>> + Send;
}

/// Everything the engine needs from its environment.
pub trait Host: Send + Sync + 'static {
    type Displays: DisplayService;
    type Windows: WindowService;
    type Store: KeyValueStore;

    fn displays(&self) -> &Self::Displays;

    fn windows(&self) -> &Self::Windows;

    /// Store that survives host restarts.
    fn durable_store(&self) -> &Self::Store;

    /// Store cleared when the host session ends.
    fn session_store(&self) -> &Self::Store;
}

// ============================================================================
// Bounded Access
// ============================================================================

/// Awaits `future`, failing with [`TilingError::Timeout`] after `limit`.
///
/// # Errors
///
/// Returns the future's own error, or a timeout classified as `kind`.
pub async fn bounded<T>(
    operation: &str,
    kind: CallKind,
    limit: Duration,
    future: impl Future<Output = TilingResult<T>>,
) -> TilingResult<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| TilingError::timeout(operation, kind, limit))?
}

/// Time-bounded access to a [`Host`].
pub struct HostClient<H: Host> {
    host: H,
    timeout: Duration,
}

impl<H: Host> HostClient<H> {
    /// Wraps a host, bounding every call by `timeout`.
    pub const fn new(host: H, timeout: Duration) -> Self { Self { host, timeout } }

    /// Returns the wrapped host.
    pub const fn host(&self) -> &H { &self.host }

    /// Returns the per-call time bound.
    pub const fn timeout(&self) -> Duration { self.timeout }

    /// Lists connected displays.
    ///
    /// # Errors
    ///
    /// Returns a query failure or timeout.
    pub async fn list_displays(&self) -> TilingResult<Vec<Display>> {
        bounded("list displays", CallKind::Query, self.timeout, self.host.displays().list_displays())
            .await
    }

    /// Lists windows.
    ///
    /// # Errors
    ///
    /// Returns a query failure or timeout.
    pub async fn list_windows(&self) -> TilingResult<Vec<Window>> {
        bounded("list windows", CallKind::Query, self.timeout, self.host.windows().list_windows())
            .await
    }

    /// Reads one window.
    ///
    /// # Errors
    ///
    /// Returns a query failure, `WindowNotFound` or timeout.
    pub async fn get_window(&self, id: u32) -> TilingResult<Window> {
        bounded("get window", CallKind::Query, self.timeout, self.host.windows().get_window(id))
            .await
    }

    /// Moves and resizes one window.
    ///
    /// # Errors
    ///
    /// Returns an update failure or timeout.
    pub async fn move_resize(&self, id: u32, rect: Rect) -> TilingResult<()> {
        bounded("move window", CallKind::Update, self.timeout, self.host.windows().move_resize(id, rect))
            .await
    }

    /// Returns time-bounded access to the durable store.
    pub fn durable(&self) -> BoundedStore<'_, H::Store> {
        BoundedStore::new(self.host.durable_store(), self.timeout)
    }

    /// Returns time-bounded access to the session store.
    pub fn session(&self) -> BoundedStore<'_, H::Store> {
        BoundedStore::new(self.host.session_store(), self.timeout)
    }
}

/// Time-bounded access to a [`KeyValueStore`].
pub struct BoundedStore<'a, S> {
    store: &'a S,
    timeout: Duration,
}

impl<'a, S: KeyValueStore> BoundedStore<'a, S> {
    /// Wraps a store, bounding every call by `timeout`.
    pub const fn new(store: &'a S, timeout: Duration) -> Self { Self { store, timeout } }

    /// Reads a key.
    ///
    /// # Errors
    ///
    /// Returns a storage failure or timeout.
    pub async fn get(&self, key: &str) -> TilingResult<Option<Value>> {
        bounded("store get", CallKind::Storage, self.timeout, self.store.get(key)).await
    }

    /// Writes a key.
    ///
    /// # Errors
    ///
    /// Returns a storage failure or timeout.
    pub async fn set(&self, key: &str, value: Value) -> TilingResult<()> {
        bounded("store set", CallKind::Storage, self.timeout, self.store.set(key, value)).await
    }

    /// Removes a key.
    ///
    /// # Errors
    ///
    /// Returns a storage failure or timeout.
    pub async fn remove(&self, key: &str) -> TilingResult<()> {
        bounded("store remove", CallKind::Storage, self.timeout, self.store.remove(key)).await
    }
}
