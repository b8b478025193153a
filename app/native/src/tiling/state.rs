//! State types for the tiling engine.
//!
//! This module defines the geometry and the read-only snapshots of displays
//! and windows the engine receives from the host. Neither displays nor windows
//! are owned by the engine; it only references them by id and requests moves.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Geometric Types
// ============================================================================

/// An axis-aligned rectangle in global pixel coordinates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Rect {
    /// Distance of the left edge from the global origin.
    pub left: i32,
    /// Distance of the top edge from the global origin.
    pub top: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    /// Returns the x coordinate of the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 { self.left + self.width }

    /// Returns the y coordinate of the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 { self.top + self.height }

    /// Returns the orientation of the rectangle.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Returns the axis-aligned intersection with another rectangle.
    ///
    /// The result may have a zero or negative width/height when the
    /// rectangles do not overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Self::new(left, top, right - left, bottom - top)
    }

    /// Returns the area shared with another rectangle.
    ///
    /// Negative extents are clamped to zero, so disjoint rectangles share
    /// an area of zero.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> i64 {
        let overlap = self.intersection(other);
        i64::from(overlap.width.max(0)) * i64::from(overlap.height.max(0))
    }

    /// Returns `true` if the rectangles share a region of positive area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool { self.intersection_area(other) > 0 }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns a copy moved by the given offsets.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Returns the area of the rectangle.
    #[must_use]
    pub fn area(&self) -> i64 { i64::from(self.width) * i64::from(self.height) }
}

/// Orientation of a display work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide, or square.
    Portrait,
}

impl Orientation {
    /// Returns `true` for landscape orientation.
    #[must_use]
    pub const fn is_landscape(self) -> bool { matches!(self, Self::Landscape) }
}

// ============================================================================
// Display
// ============================================================================

/// A connected physical display, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Display {
    /// Host-assigned display identifier.
    pub id: u32,

    /// Usable area excluding taskbars, docks and other system furniture.
    pub work_area: Rect,

    /// Full bounds of the display. Falls back to the work area when the
    /// host does not report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

impl Display {
    /// Creates a display whose bounds equal its work area.
    #[must_use]
    pub const fn new(id: u32, work_area: Rect) -> Self { Self { id, work_area, bounds: None } }

    /// Creates a display with distinct bounds and work area.
    #[must_use]
    pub const fn with_bounds(id: u32, bounds: Rect, work_area: Rect) -> Self {
        Self { id, work_area, bounds: Some(bounds) }
    }

    /// Returns the full bounds of the display.
    #[must_use]
    pub fn bounds(&self) -> Rect { self.bounds.unwrap_or(self.work_area) }

    /// Returns the orientation of the work area.
    #[must_use]
    pub const fn orientation(&self) -> Orientation { self.work_area.orientation() }
}

// ============================================================================
// Window
// ============================================================================

/// Lifecycle state of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    /// Regular, visible window.
    #[default]
    Normal,
    /// Minimized to the taskbar or dock.
    Minimized,
    /// Maximized to the work area.
    Maximized,
    /// Covering the whole display.
    Fullscreen,
}

/// Kind of window. Only `Normal` windows are tiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Regular application window.
    #[default]
    Normal,
    /// Popup window.
    Popup,
    /// Panel window.
    Panel,
    /// Application shell window.
    App,
    /// Developer tools window.
    Devtools,
}

/// A window snapshot, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Host-assigned window identifier.
    pub id: u32,

    /// Current bounds of the window.
    pub frame: Rect,

    /// Lifecycle state.
    #[serde(default)]
    pub state: WindowState,

    /// Window kind.
    #[serde(default)]
    pub kind: WindowKind,
}

impl Window {
    /// Creates a normal, visible window.
    #[must_use]
    pub const fn new(id: u32, frame: Rect) -> Self {
        Self {
            id,
            frame,
            state: WindowState::Normal,
            kind: WindowKind::Normal,
        }
    }

    /// Returns `true` if the window is a normal window.
    #[must_use]
    pub const fn is_normal(&self) -> bool { matches!(self.kind, WindowKind::Normal) }

    /// Returns `true` if the window takes part in tiling.
    ///
    /// Minimized windows and windows of any kind other than `Normal` are
    /// never tiled.
    #[must_use]
    pub const fn is_tileable(&self) -> bool {
        self.is_normal() && !matches!(self.state, WindowState::Minimized)
    }
}

// ============================================================================
// Tests
// ============================================================================
