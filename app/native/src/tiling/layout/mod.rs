//! Layout calculators for the tiling engine.
//!
//! Both calculators are pure: identical inputs always produce identical
//! rectangle sequences, which is what makes a repeated tiling pass issue no
//! moves at all.
//!
//! # Calculators
//!
//! - **Grid**: splits an area into `rows × columns` equal tiles, row-major
//! - **Master**: reserves one large rectangle at the start or end of the
//!   display and shrinks the area left for the grid
//!
//! # Performance
//!
//! Layouts use `SmallVec` so the common case of a handful of windows per
//! display does not allocate.

mod grid;
mod master;

pub use grid::{GridShape, compute_grid, grid_shape};
pub use master::{MasterSplit, compute_master};
use smallvec::SmallVec;

use crate::tiling::state::Rect;

/// Inline capacity for layout results.
pub const LAYOUT_INLINE_CAP: usize = 16;

/// An ordered sequence of tile rectangles, one per window slot.
///
/// Rectangles are relative to the origin of the area they were computed for.
pub type TileLayout = SmallVec<[Rect; LAYOUT_INLINE_CAP]>;
