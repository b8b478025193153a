//! In-process host.
//!
//! [`InMemoryHost`] keeps displays, windows and both stores behind shared
//! mutexes. Clones share the same state, so a test can hand one clone to the
//! orchestrator and keep another to stage user actions and inspect results.
//!
//! Failures can be injected per service to exercise the engine's fallbacks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DisplayService, Host, KeyValueStore, WindowService};
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::state::{Display, Rect, Window, WindowState};

/// A move/resize request received by the window service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub window_id: u32,
    pub rect: Rect,
}

// ============================================================================
// Displays
// ============================================================================

#[derive(Debug, Default)]
struct DisplayTable {
    displays: Vec<Display>,
    fail: bool,
}

/// In-memory [`DisplayService`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDisplays {
    inner: Arc<Mutex<DisplayTable>>,
}

impl MemoryDisplays {
    /// Replaces the connected displays.
    pub fn set(&self, displays: Vec<Display>) { self.inner.lock().displays = displays; }

    /// Connects one more display.
    pub fn connect(&self, display: Display) { self.inner.lock().displays.push(display); }

    /// Disconnects a display.
    pub fn disconnect(&self, id: u32) { self.inner.lock().displays.retain(|d| d.id != id); }

    /// Returns the connected displays.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Display> { self.inner.lock().displays.clone() }

    /// Makes every listing fail while `fail` is set.
    pub fn fail_queries(&self, fail: bool) { self.inner.lock().fail = fail; }
}

impl DisplayService for MemoryDisplays {
    async fn list_displays(&self) -> TilingResult<Vec<Display>> {
        let table = self.inner.lock();
        if table.fail {
            return Err(TilingError::query("display service unavailable"));
        }
        Ok(table.displays.clone())
    }
}

// ============================================================================
// Windows
// ============================================================================

#[derive(Debug, Default)]
struct WindowTable {
    windows: Vec<Window>,
    moves: Vec<MoveRequest>,
    fail_queries: bool,
    failing_moves: HashSet<u32>,
    latency: Option<Duration>,
}

/// In-memory [`WindowService`].
#[derive(Debug, Clone, Default)]
pub struct MemoryWindows {
    inner: Arc<Mutex<WindowTable>>,
}

impl MemoryWindows {
    /// Adds a window, replacing any window with the same id.
    pub fn open(&self, window: Window) {
        let mut table = self.inner.lock();
        table.windows.retain(|w| w.id != window.id);
        table.windows.push(window);
    }

    /// Removes a window.
    pub fn close(&self, id: u32) { self.inner.lock().windows.retain(|w| w.id != id); }

    /// Moves a window without recording a move request, as a user would.
    pub fn drag(&self, id: u32, frame: Rect) {
        if let Some(window) = self.inner.lock().windows.iter_mut().find(|w| w.id == id) {
            window.frame = frame;
        }
    }

    /// Sets a window's lifecycle state.
    pub fn set_state(&self, id: u32, state: WindowState) {
        if let Some(window) = self.inner.lock().windows.iter_mut().find(|w| w.id == id) {
            window.state = state;
        }
    }

    /// Returns a window.
    #[must_use]
    pub fn window(&self, id: u32) -> Option<Window> {
        self.inner.lock().windows.iter().find(|w| w.id == id).cloned()
    }

    /// Returns every window.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Window> { self.inner.lock().windows.clone() }

    /// Returns every move request received so far.
    #[must_use]
    pub fn moves(&self) -> Vec<MoveRequest> { self.inner.lock().moves.clone() }

    /// Returns the number of move requests received so far.
    #[must_use]
    pub fn move_count(&self) -> usize { self.inner.lock().moves.len() }

    /// Forgets recorded move requests.
    pub fn clear_moves(&self) { self.inner.lock().moves.clear(); }

    /// Makes every listing fail while `fail` is set.
    pub fn fail_queries(&self, fail: bool) { self.inner.lock().fail_queries = fail; }

    /// Makes moves of one window fail.
    pub fn fail_moves_for(&self, id: u32) { self.inner.lock().failing_moves.insert(id); }

    /// Delays every window call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) { self.inner.lock().latency = latency; }

    async fn simulate_latency(&self) {
        let latency = self.inner.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl WindowService for MemoryWindows {
    async fn list_windows(&self) -> TilingResult<Vec<Window>> {
        self.simulate_latency().await;

        let table = self.inner.lock();
        if table.fail_queries {
            return Err(TilingError::query("window service unavailable"));
        }
        Ok(table.windows.clone())
    }

    async fn get_window(&self, id: u32) -> TilingResult<Window> {
        self.simulate_latency().await;

        let table = self.inner.lock();
        if table.fail_queries {
            return Err(TilingError::query("window service unavailable"));
        }
        table.windows.iter().find(|w| w.id == id).cloned().ok_or(TilingError::WindowNotFound(id))
    }

    async fn move_resize(&self, id: u32, rect: Rect) -> TilingResult<()> {
        self.simulate_latency().await;

        let mut table = self.inner.lock();
        if table.failing_moves.contains(&id) {
            return Err(TilingError::update(id, "move rejected"));
        }

        let window = table
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| TilingError::update(id, "window is gone"))?;
        window.frame = rect;
        window.state = WindowState::Normal;

        table.moves.push(MoveRequest { window_id: id, rect });
        Ok(())
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Default)]
struct StoreTable {
    values: HashMap<String, Value>,
    fail: bool,
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreTable>>,
}

impl MemoryStore {
    /// Returns the value under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> { self.inner.lock().values.get(key).cloned() }

    /// Writes `value` under `key`, bypassing failure injection.
    pub fn put(&self, key: &str, value: Value) {
        self.inner.lock().values.insert(key.to_string(), value);
    }

    /// Drops every key, as when the host session ends.
    pub fn wipe(&self) { self.inner.lock().values.clear(); }

    /// Makes every call fail while `fail` is set.
    pub fn fail(&self, fail: bool) { self.inner.lock().fail = fail; }

    fn check(&self) -> TilingResult<()> {
        if self.inner.lock().fail {
            return Err(TilingError::storage("store unavailable"));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> TilingResult<Option<Value>> {
        self.check()?;
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: Value) -> TilingResult<()> {
        self.check()?;
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> TilingResult<()> {
        self.check()?;
        self.inner.lock().values.remove(key);
        Ok(())
    }
}

// ============================================================================
// Host
// ============================================================================

/// A complete host living in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    displays: MemoryDisplays,
    windows: MemoryWindows,
    durable: MemoryStore,
    session: MemoryStore,
}

impl InMemoryHost {
    /// Creates a host with the given displays and no windows.
    #[must_use]
    pub fn with_displays(displays: Vec<Display>) -> Self {
        let host = Self::default();
        host.displays.set(displays);
        host
    }

    /// Opens every window in order.
    #[must_use]
    pub fn with_windows(self, windows: impl IntoIterator<Item = Window>) -> Self {
        for window in windows {
            self.windows.open(window);
        }
        self
    }

    /// Returns the display service.
    #[must_use]
    pub const fn display_table(&self) -> &MemoryDisplays { &self.displays }

    /// Returns the window service.
    #[must_use]
    pub const fn window_table(&self) -> &MemoryWindows { &self.windows }

    /// Returns the durable store.
    #[must_use]
    pub const fn durable(&self) -> &MemoryStore { &self.durable }

    /// Returns the session store.
    #[must_use]
    pub const fn session(&self) -> &MemoryStore { &self.session }
}

impl Host for InMemoryHost {
    type Displays = MemoryDisplays;
    type Store = MemoryStore;
    type Windows = MemoryWindows;

    fn displays(&self) -> &Self::Displays { &self.displays }

    fn windows(&self) -> &Self::Windows { &self.windows }

    fn durable_store(&self) -> &Self::Store { &self.durable }

    fn session_store(&self) -> &Self::Store { &self.session }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn host() -> InMemoryHost {
        InMemoryHost::with_displays(vec![Display::new(1, Rect::new(0, 0, 1920, 1080))])
            .with_windows([Window::new(10, Rect::new(0, 0, 800, 600))])
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let host = host();
        let other = host.clone();

        other.window_table().open(Window::new(11, Rect::new(0, 0, 10, 10)));
        assert_eq!(host.windows().list_windows().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_move_resize_records_and_normalizes() {
        let host = host();
        host.window_table().set_state(10, WindowState::Maximized);

        let target = Rect::new(10, 10, 500, 500);
        host.windows().move_resize(10, target).await.unwrap();

        let window = host.window_table().window(10).unwrap();
        assert_eq!(window.frame, target);
        assert_eq!(window.state, WindowState::Normal);
        assert_eq!(host.window_table().moves(), vec![MoveRequest { window_id: 10, rect: target }]);
    }

    #[tokio::test]
    async fn test_drag_is_not_a_move_request() {
        let host = host();
        host.window_table().drag(10, Rect::new(50, 50, 800, 600));

        assert_eq!(host.window_table().move_count(), 0);
        assert_eq!(host.window_table().window(10).unwrap().frame.left, 50);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let host = host();

        host.display_table().fail_queries(true);
        assert!(host.displays().list_displays().await.unwrap_err().is_query_failure());

        host.window_table().fail_moves_for(10);
        let err = host.windows().move_resize(10, Rect::default()).await.unwrap_err();
        assert!(err.is_update_failure());

        host.session().fail(true);
        assert!(host.session_store().get("x").await.unwrap_err().is_storage_failure());
    }

    #[tokio::test]
    async fn test_get_missing_window() {
        let host = host();
        assert!(host.windows().get_window(99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_store_roundtrip() {
        let host = host();
        let store = host.session_store();

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", json!(3)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(3)));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Stores are independent
        assert_eq!(host.durable().value("k"), None);
    }
}
