//! Grid layout - windows arranged in equal rows and columns.
//!
//! # Shape Rules
//!
//! Evaluated in order:
//!
//! 1. An area no wider than two minimum columns (plus outer padding) is a
//!    single column with one row per window.
//! 2. Two windows sit side by side on landscape areas and stacked on
//!    portrait ones.
//! 3. Otherwise `rows = ceil(sqrt(n))` and `columns = ceil(n / rows)`.
//!
//! ```text
//! 3 windows (2×2):     5 windows (3×2):
//! ┌─────┬─────┐        ┌─────┬─────┐
//! │  1  │  2  │        │  1  │  2  │
//! ├─────┼─────┘        ├─────┼─────┤
//! │  3  │              │  3  │  4  │
//! └─────┘              ├─────┼─────┘
//!                      │  5  │
//!                      └─────┘
//! ```
//!
//! Tiles are emitted row-major starting at `(padding, padding)`; a short
//! last row leaves its trailing cells empty.

use super::TileLayout;
use crate::tiling::constants::layout::MIN_COLUMN_WIDTH;
use crate::tiling::state::{Orientation, Rect};

/// Number of rows and columns of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: i32,
    pub columns: i32,
}

/// Picks the grid shape for `count` windows in an area of the given width.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn grid_shape(width: i32, orientation: Orientation, count: usize, padding: i32) -> GridShape {
    let count = count as i32;

    if width <= MIN_COLUMN_WIDTH * 2 + 2 * padding {
        return GridShape { rows: count, columns: 1 };
    }

    if count == 2 {
        return if orientation.is_landscape() {
            GridShape { rows: 1, columns: 2 }
        } else {
            GridShape { rows: 2, columns: 1 }
        };
    }

    let rows = ceil_sqrt(count);
    let columns = (count + rows - 1) / rows;
    GridShape { rows, columns }
}

/// Computes tile rectangles for `count` windows inside `area`.
///
/// `orientation` is passed separately because it is derived from the
/// display's full work area, which may differ from `area` after a master
/// split. The returned rectangles are relative to `area`'s origin.
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn compute_grid(area: &Rect, orientation: Orientation, count: usize, padding: i32) -> TileLayout {
    let mut tiles = TileLayout::new();
    if count == 0 {
        return tiles;
    }

    let shape = grid_shape(area.width, orientation, count, padding);

    let effective_width = area.width - 2 * padding;
    let effective_height = area.height - 2 * padding;

    let tile_width = (effective_width - (shape.columns - 1) * padding).div_euclid(shape.columns);
    let tile_height = (effective_height - (shape.rows - 1) * padding).div_euclid(shape.rows);

    let mut x = padding;
    let mut y = padding;

    for i in 0..count {
        if i > 0 && i % shape.columns as usize == 0 {
            y += tile_height + padding;
            x = padding;
        }

        tiles.push(Rect::new(x, y, tile_width, tile_height));
        x += tile_width + padding;
    }

    tiles
}

/// Smallest `r` with `r * r >= n`.
fn ceil_sqrt(n: i32) -> i32 {
    let mut r = 1;
    while r * r < n {
        r += 1;
    }
    r
}

// ============================================================================
// Tests
// ============================================================================
