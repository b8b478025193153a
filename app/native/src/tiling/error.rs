//! Error types for the tiling engine.
//!
//! Every call into the host (display and window enumeration, window moves,
//! persisted-state reads and writes) is fallible. Failures are grouped into
//! three categories so call sites can pick the right fallback:
//!
//! - **Query failures**: display or window enumeration failed. The current
//!   pass is aborted and state is left untouched for the next event.
//! - **Update failures**: a move/resize request failed. The window is skipped
//!   and the pass continues.
//! - **Storage failures**: a persisted read or write failed. Reads fall back
//!   to defaults, writes lose the in-memory result without corrupting anything.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::tiling::error::{TilingError, TilingResult};
//!
//! async fn first_display(host: &impl DisplayService) -> TilingResult<Display> {
//!     let displays = host.list_displays().await?;
//!     displays.into_iter().next().ok_or_else(|| TilingError::query("no displays connected"))
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

/// Result type alias for tiling operations.
pub type TilingResult<T> = Result<T, TilingError>;

/// Kind of external call, used to classify timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Display or window enumeration.
    Query,
    /// Window move/resize.
    Update,
    /// Persisted-state read, write or removal.
    Storage,
}

/// Errors that can occur while talking to the host or reconciling state.
#[derive(Debug, Clone, Error)]
pub enum TilingError {
    /// Display or window enumeration failed.
    #[error("Query failed: {0}")]
    QueryFailure(String),

    /// A move/resize request for a window failed.
    #[error("Update of window {window_id} failed: {message}")]
    UpdateFailure {
        /// The window the request targeted.
        window_id: u32,
        /// A human-readable description of the failure.
        message: String,
    },

    /// A persisted read, write or removal failed.
    #[error("Storage failed: {0}")]
    StorageFailure(String),

    /// An external call did not complete within its time bound.
    #[error("Timeout after {timeout:?}: {operation}")]
    Timeout {
        /// Description of the call that timed out.
        operation: String,
        /// Which category of call timed out.
        kind: CallKind,
        /// The time bound that was exceeded.
        timeout: Duration,
    },

    /// A display with the given id is not connected.
    #[error("Display {0} not found")]
    DisplayNotFound(u32),

    /// A window with the given id does not exist.
    #[error("Window {0} not found")]
    WindowNotFound(u32),
}

impl TilingError {
    /// Creates a query failure with the given message.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self { Self::QueryFailure(message.into()) }

    /// Creates an update failure for the given window.
    #[must_use]
    pub fn update(window_id: u32, message: impl Into<String>) -> Self {
        Self::UpdateFailure { window_id, message: message.into() }
    }

    /// Creates a storage failure with the given message.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self { Self::StorageFailure(message.into()) }

    /// Creates a timeout error for a call of the given kind.
    #[must_use]
    pub fn timeout(operation: impl Into<String>, kind: CallKind, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            kind,
            timeout,
        }
    }

    /// Returns the category of call this error belongs to, if any.
    ///
    /// Lookup errors (`DisplayNotFound`, `WindowNotFound`) are reported by
    /// queries and classify as [`CallKind::Query`].
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        match self {
            Self::QueryFailure(_) | Self::DisplayNotFound(_) | Self::WindowNotFound(_) => {
                CallKind::Query
            }
            Self::UpdateFailure { .. } => CallKind::Update,
            Self::StorageFailure(_) => CallKind::Storage,
            Self::Timeout { kind, .. } => *kind,
        }
    }

    /// Returns `true` if this error came from display or window enumeration.
    #[must_use]
    pub const fn is_query_failure(&self) -> bool { matches!(self.kind(), CallKind::Query) }

    /// Returns `true` if this error came from a move/resize request.
    #[must_use]
    pub const fn is_update_failure(&self) -> bool { matches!(self.kind(), CallKind::Update) }

    /// Returns `true` if this error came from the persisted stores.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool { matches!(self.kind(), CallKind::Storage) }

    /// Returns `true` if a resource was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DisplayNotFound(_) | Self::WindowNotFound(_))
    }

    /// Returns `true` if the operation might succeed on retry.
    #[must_use]
    pub const fn is_transient(&self) -> bool { matches!(self, Self::Timeout { .. }) }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TilingError::query("display service offline").to_string(),
            "Query failed: display service offline"
        );

        assert_eq!(
            TilingError::update(42, "window is gone").to_string(),
            "Update of window 42 failed: window is gone"
        );

        assert_eq!(
            TilingError::storage("quota exceeded").to_string(),
            "Storage failed: quota exceeded"
        );

        assert_eq!(TilingError::WindowNotFound(7).to_string(), "Window 7 not found");
        assert_eq!(TilingError::DisplayNotFound(3).to_string(), "Display 3 not found");
    }

    #[test]
    fn test_timeout_display() {
        let err = TilingError::timeout("list windows", CallKind::Query, Duration::from_millis(250));
        assert_eq!(err.to_string(), "Timeout after 250ms: list windows");
    }

    #[test]
    fn test_error_kind_classification() {
        assert!(TilingError::query("x").is_query_failure());
        assert!(TilingError::WindowNotFound(1).is_query_failure());
        assert!(TilingError::update(1, "x").is_update_failure());
        assert!(TilingError::storage("x").is_storage_failure());

        let timed_out = TilingError::timeout("set", CallKind::Storage, Duration::from_secs(1));
        assert!(timed_out.is_storage_failure());
        assert!(!timed_out.is_query_failure());
    }

    #[test]
    fn test_error_predicates() {
        assert!(TilingError::WindowNotFound(1).is_not_found());
        assert!(TilingError::DisplayNotFound(1).is_not_found());
        assert!(!TilingError::query("x").is_not_found());

        assert!(TilingError::timeout("op", CallKind::Update, Duration::from_secs(1)).is_transient());
        assert!(!TilingError::storage("x").is_transient());
    }
}
