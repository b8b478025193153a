//! Display resolution for windows.
//!
//! A window belongs to the display that holds the largest part of it. The
//! resolver compares the window's frame against each display's full bounds
//! and keeps the first display with the strictly greatest shared area, so on
//! exact ties the display listed first wins.

use super::state::{Display, Rect, Window};

/// Returns the display sharing the largest area with a window.
///
/// Returns `None` when the window does not intersect any display; callers
/// treat that as "skip this window".
#[must_use]
pub fn resolve_display<'a>(displays: &'a [Display], window: &Window) -> Option<&'a Display> {
    resolve_display_for_frame(displays, &window.frame)
}

/// Returns the display sharing the largest area with a frame.
#[must_use]
pub fn resolve_display_for_frame<'a>(displays: &'a [Display], frame: &Rect) -> Option<&'a Display> {
    let mut selected = None;
    let mut max_area = 0;

    for display in displays {
        let area = display.bounds().intersection_area(frame);

        if area > max_area {
            selected = Some(display);
            max_area = area;
        }
    }

    selected
}

/// Returns the connected display with the given id.
#[must_use]
pub fn display_by_id(displays: &[Display], id: u32) -> Option<&Display> {
    displays.iter().find(|d| d.id == id)
}

// ============================================================================
// Tests
// ============================================================================
