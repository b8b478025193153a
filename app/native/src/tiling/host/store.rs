//! Typed access to persisted state.
//!
//! The durable store holds the user preferences. The session store holds
//! the tracked-window records and the last known display count.
//!
//! Reads never fail: a storage failure or malformed value is logged and the
//! caller gets a default. Writes return their error so the caller can log
//! that the in-memory result was lost.

use serde::Deserialize;
use serde_json::Value;

use super::{BoundedStore, KeyValueStore};
use crate::config::UserPreferences;
use crate::tiling::constants::storage::{
    DEFAULT_DISPLAY_COUNT, DISPLAY_COUNT_KEY, PREFERENCES_KEY, TRACKED_WINDOWS_KEY,
};
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::tracked::{TiledWindowRecord, TrackedWindows};

// ============================================================================
// Preferences
// ============================================================================

/// Loads the user preferences, falling back to defaults.
pub async fn load_preferences<S: KeyValueStore>(durable: &BoundedStore<'_, S>) -> UserPreferences {
    match durable.get(PREFERENCES_KEY).await {
        Ok(Some(stored)) => UserPreferences::normalize(&stored).preferences,
        Ok(None) => UserPreferences::default(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load preferences, using defaults");
            UserPreferences::default()
        }
    }
}

/// Loads the user preferences and writes back their canonical form.
///
/// When nothing is stored yet, `seed` is written. Otherwise unknown keys are
/// pruned and missing ones defaulted, and the result is written only if it
/// differs from what was stored.
pub async fn initialize_preferences<S: KeyValueStore>(
    durable: &BoundedStore<'_, S>,
    seed: UserPreferences,
) -> UserPreferences {
    let (preferences, write) = match durable.get(PREFERENCES_KEY).await {
        Ok(Some(stored)) => {
            let normalized = UserPreferences::normalize(&stored);
            (normalized.preferences, normalized.changed)
        }
        Ok(None) => (seed, true),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load preferences, using defaults");
            return seed;
        }
    };

    if write {
        tracing::debug!("writing normalized preferences");
        if let Err(err) = save_preferences(durable, &preferences).await {
            tracing::warn!(error = %err, "failed to save normalized preferences");
        }
    }

    preferences
}

/// Saves the user preferences.
///
/// # Errors
///
/// Returns a storage failure or timeout.
pub async fn save_preferences<S: KeyValueStore>(
    durable: &BoundedStore<'_, S>,
    preferences: &UserPreferences,
) -> TilingResult<()> {
    durable.set(PREFERENCES_KEY, preferences.to_value()).await
}

// ============================================================================
// Tracked Windows
// ============================================================================

/// Stored forms of the tracked-window set.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTracked {
    /// Bare record array without a revision.
    Legacy(Vec<TiledWindowRecord>),
    Versioned(TrackedWindows),
}

impl From<StoredTracked> for TrackedWindows {
    fn from(stored: StoredTracked) -> Self {
        match stored {
            StoredTracked::Legacy(windows) => Self { revision: 0, windows },
            StoredTracked::Versioned(tracked) => tracked,
        }
    }
}

fn parse_tracked(value: Value) -> Result<TrackedWindows, serde_json::Error> {
    serde_json::from_value::<StoredTracked>(value).map(Into::into)
}

/// Loads the tracked windows, falling back to an empty set.
pub async fn load_tracked<S: KeyValueStore>(session: &BoundedStore<'_, S>) -> TrackedWindows {
    match session.get(TRACKED_WINDOWS_KEY).await {
        Ok(Some(stored)) => parse_tracked(stored).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "malformed tracked windows, starting empty");
            TrackedWindows::new()
        }),
        Ok(None) => TrackedWindows::new(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load tracked windows, starting empty");
            TrackedWindows::new()
        }
    }
}

/// Result of a tracked-window write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The write went through under the given revision.
    Saved(u64),
    /// The stored copy changed since it was loaded; nothing was written.
    Stale { loaded: u64, stored: u64 },
}

/// Saves the tracked windows if the stored copy is still the one they were
/// loaded from.
///
/// On success `tracked.revision` is advanced to the written revision.
///
/// # Errors
///
/// Returns a storage failure or timeout from either the revision check or
/// the write.
pub async fn save_tracked<S: KeyValueStore>(
    session: &BoundedStore<'_, S>,
    tracked: &mut TrackedWindows,
) -> TilingResult<SaveOutcome> {
    let stored_revision = match session.get(TRACKED_WINDOWS_KEY).await? {
        Some(stored) => parse_tracked(stored).map_or(0, |t| t.revision),
        None => 0,
    };

    if stored_revision != tracked.revision {
        tracing::warn!(
            loaded = tracked.revision,
            stored = stored_revision,
            "tracked windows changed since they were loaded, dropping write"
        );
        return Ok(SaveOutcome::Stale {
            loaded: tracked.revision,
            stored: stored_revision,
        });
    }

    let next = TrackedWindows {
        revision: tracked.revision + 1,
        windows: tracked.windows.clone(),
    };
    let value = serde_json::to_value(&next).map_err(|err| TilingError::storage(err.to_string()))?;
    session.set(TRACKED_WINDOWS_KEY, value).await?;

    tracked.revision = next.revision;
    Ok(SaveOutcome::Saved(next.revision))
}

/// Stops tracking every window.
///
/// # Errors
///
/// Returns a storage failure or timeout.
pub async fn clear_tracked<S: KeyValueStore>(session: &BoundedStore<'_, S>) -> TilingResult<()> {
    session.remove(TRACKED_WINDOWS_KEY).await
}

// ============================================================================
// Display Count
// ============================================================================

/// Loads the last known display count, falling back to one.
pub async fn load_display_count<S: KeyValueStore>(session: &BoundedStore<'_, S>) -> usize {
    match session.get(DISPLAY_COUNT_KEY).await {
        Ok(Some(stored)) => stored
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_DISPLAY_COUNT),
        Ok(None) => DEFAULT_DISPLAY_COUNT,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load display count");
            DEFAULT_DISPLAY_COUNT
        }
    }
}

/// Saves the display count.
///
/// # Errors
///
/// Returns a storage failure or timeout.
pub async fn save_display_count<S: KeyValueStore>(
    session: &BoundedStore<'_, S>,
    count: usize,
) -> TilingResult<()> {
    session.set(DISPLAY_COUNT_KEY, Value::from(count)).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::config::{MasterWindow, Padding};
    use crate::tiling::host::memory::MemoryStore;

    fn bounded(store: &MemoryStore) -> BoundedStore<'_, MemoryStore> {
        BoundedStore::new(store, Duration::from_secs(1))
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_load_preferences_defaults() {
        let store = MemoryStore::default();
        assert_eq!(load_preferences(&bounded(&store)).await, UserPreferences::default());

        store.fail(true);
        assert_eq!(load_preferences(&bounded(&store)).await, UserPreferences::default());
    }

    #[tokio::test]
    async fn test_preferences_roundtrip() {
        let store = MemoryStore::default();
        let prefs = UserPreferences {
            master_window: MasterWindow::Start,
            padding: Padding::Large,
            ..UserPreferences::default()
        };

        save_preferences(&bounded(&store), &prefs).await.unwrap();
        assert_eq!(load_preferences(&bounded(&store)).await, prefs);
    }

    #[tokio::test]
    async fn test_initialize_writes_seed_when_empty() {
        let store = MemoryStore::default();
        let seed = UserPreferences { auto_tiling: false, ..UserPreferences::default() };

        assert_eq!(initialize_preferences(&bounded(&store), seed).await, seed);
        assert_eq!(store.value(PREFERENCES_KEY), Some(seed.to_value()));
    }

    #[tokio::test]
    async fn test_initialize_prunes_stored_preferences() {
        let store = MemoryStore::default();
        store.put(PREFERENCES_KEY, json!({ "padding": "20", "donate": true }));

        let prefs = initialize_preferences(&bounded(&store), UserPreferences::default()).await;
        assert_eq!(prefs.padding, Padding::Medium);
        assert_eq!(
            store.value(PREFERENCES_KEY),
            Some(json!({
                "auto_tiling": true,
                "master_window": "none",
                "master_ratio": "50%",
                "padding": "20"
            }))
        );
    }

    // ------------------------------------------------------------------------
    // Tracked Windows
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_tracked_roundtrip_advances_revision() {
        let store = MemoryStore::default();
        let session = bounded(&store);

        let mut tracked = load_tracked(&session).await;
        assert!(tracked.is_empty());
        tracked.upsert(1, 10, 1);

        assert_eq!(save_tracked(&session, &mut tracked).await.unwrap(), SaveOutcome::Saved(1));
        assert_eq!(tracked.revision, 1);

        let reloaded = load_tracked(&session).await;
        assert_eq!(reloaded, tracked);
    }

    #[tokio::test]
    async fn test_stale_write_is_rejected() {
        let store = MemoryStore::default();
        let session = bounded(&store);

        let mut first = load_tracked(&session).await;
        let mut second = load_tracked(&session).await;

        first.upsert(1, 10, 1);
        second.upsert(2, 10, 1);

        assert_eq!(save_tracked(&session, &mut first).await.unwrap(), SaveOutcome::Saved(1));
        assert_eq!(
            save_tracked(&session, &mut second).await.unwrap(),
            SaveOutcome::Stale { loaded: 0, stored: 1 }
        );

        let stored = load_tracked(&session).await;
        assert!(stored.contains(1));
        assert!(!stored.contains(2));
    }

    #[tokio::test]
    async fn test_legacy_array_is_accepted() {
        let store = MemoryStore::default();
        store.put(
            TRACKED_WINDOWS_KEY,
            json!([{ "winId": 5, "displayId": 2, "ignoreUpdate": true }]),
        );

        let tracked = load_tracked(&bounded(&store)).await;
        assert_eq!(tracked.revision, 0);
        assert_eq!(tracked.get(5).map(|r| r.display_id), Some(2));
    }

    #[tokio::test]
    async fn test_malformed_tracked_starts_empty() {
        let store = MemoryStore::default();
        store.put(TRACKED_WINDOWS_KEY, json!("garbage"));

        assert!(load_tracked(&bounded(&store)).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_tracked_failure_keeps_revision() {
        let store = MemoryStore::default();
        let mut tracked = TrackedWindows::new();
        tracked.upsert(1, 10, 1);

        store.fail(true);
        assert!(save_tracked(&bounded(&store), &mut tracked).await.is_err());
        assert_eq!(tracked.revision, 0);
    }

    #[tokio::test]
    async fn test_clear_tracked() {
        let store = MemoryStore::default();
        let session = bounded(&store);
        let mut tracked = TrackedWindows::new();
        tracked.upsert(1, 10, 1);
        save_tracked(&session, &mut tracked).await.unwrap();

        clear_tracked(&session).await.unwrap();
        assert!(store.value(TRACKED_WINDOWS_KEY).is_none());
        assert!(load_tracked(&session).await.is_empty());
    }

    // ------------------------------------------------------------------------
    // Display Count
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_display_count() {
        let store = MemoryStore::default();
        let session = bounded(&store);

        assert_eq!(load_display_count(&session).await, 1);
        save_display_count(&session, 3).await.unwrap();
        assert_eq!(load_display_count(&session).await, 3);

        store.fail(true);
        assert_eq!(load_display_count(&session).await, 1);
    }
}
