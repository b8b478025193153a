//! Master layout - one reserved window at the start or end of a display.
//!
//! The master rectangle takes a ratio of the display along the split axis
//! and the full padded extent across it. The rest of the display is left to
//! the grid.
//!
//! ```text
//! Landscape, start:       Landscape, end:
//! ┌──────────┬─────┐      ┌─────┬──────────┐
//! │          │  2  │      │  2  │          │
//! │  Master  ├─────┤      ├─────┤  Master  │
//! │          │  3  │      │  3  │          │
//! └──────────┴─────┘      └─────┴──────────┘
//!
//! Portrait, start:        Portrait, end:
//! ┌─────────┐             ┌─────────┐
//! │ Master  │             │    2    │
//! ├─────────┤             ├─────────┤
//! │    2    │             │ Master  │
//! └─────────┘             └─────────┘
//! ```
//!
//! Landscape displays split left/right, portrait displays split top/bottom.

use crate::config::{MasterRatio, MasterWindow};
use crate::tiling::constants::layout::MASTER_PADDING_FACTOR;
use crate::tiling::state::{Orientation, Rect};

/// Result of reserving the master rectangle on a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterSplit {
    /// Absolute rectangle of the master window.
    pub master: Rect,

    /// Absolute area left for the grid.
    ///
    /// Shrunk by `master extent + padding` along the split axis and, for a
    /// `start` master, shifted past it.
    pub remaining: Rect,
}

/// Computes the master rectangle and the area left for the grid.
///
/// Returns `None` when `position` is [`MasterWindow::None`].
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn compute_master(
    area: &Rect,
    orientation: Orientation,
    position: MasterWindow,
    ratio: MasterRatio,
    padding: i32,
) -> Option<MasterSplit> {
    let at_end = match position {
        MasterWindow::None => return None,
        MasterWindow::Start => false,
        MasterWindow::End => true,
    };

    let fraction = ratio.fraction();
    let padding_share = MASTER_PADDING_FACTOR * f64::from(padding);
    let ratio_width = (f64::from(area.width) * fraction - padding_share).floor() as i32;
    let ratio_height = (f64::from(area.height) * fraction - padding_share).floor() as i32;

    let mut master = Rect::new(area.left + padding, area.top + padding, 0, 0);
    let mut remaining = *area;

    if orientation.is_landscape() {
        master.width = ratio_width;
        master.height = area.height - 2 * padding;
        if at_end {
            master.left = area.left + area.width - ratio_width - padding;
        } else {
            remaining.left += ratio_width + padding;
        }
        remaining.width -= ratio_width + padding;
    } else {
        master.width = area.width - 2 * padding;
        master.height = ratio_height;
        if at_end {
            master.top = area.top + area.height - ratio_height - padding;
        } else {
            remaining.top += ratio_height + padding;
        }
        remaining.height -= ratio_height + padding;
    }

    Some(MasterSplit { master, remaining })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::layout::compute_grid;

    fn landscape() -> Rect { Rect::new(0, 0, 1920, 1080) }

    fn portrait() -> Rect { Rect::new(0, 0, 1080, 1920) }

    fn split(area: Rect, position: MasterWindow, ratio: MasterRatio, padding: i32) -> MasterSplit {
        compute_master(&area, area.orientation(), position, ratio, padding).unwrap()
    }

    #[test]
    fn test_none_position() {
        let area = landscape();
        assert!(
            compute_master(&area, area.orientation(), MasterWindow::None, MasterRatio::Half, 10)
                .is_none()
        );
    }

    #[test]
    fn test_landscape_start_half() {
        let result = split(landscape(), MasterWindow::Start, MasterRatio::Half, 10);

        assert_eq!(result.master, Rect::new(10, 10, 945, 1060));
        assert_eq!(result.remaining.width, 1920 - 945 - 10);
        assert_eq!(result.remaining, Rect::new(955, 0, 965, 1080));
    }

    #[test]
    fn test_landscape_end_half() {
        let result = split(landscape(), MasterWindow::End, MasterRatio::Half, 10);

        // 1920 - 945 - 10
        assert_eq!(result.master, Rect::new(965, 10, 945, 1060));
        assert_eq!(result.remaining, Rect::new(0, 0, 965, 1080));
    }

    #[test]
    fn test_ratios() {
        let one_third = split(landscape(), MasterWindow::Start, MasterRatio::OneThird, 10);
        // floor(1920 * 0.33 - 15) = floor(618.6)
        assert_eq!(one_third.master.width, 618);

        let two_thirds = split(landscape(), MasterWindow::Start, MasterRatio::TwoThirds, 10);
        // floor(1920 * 0.66 - 15) = floor(1252.2)
        assert_eq!(two_thirds.master.width, 1252);
    }

    #[test]
    fn test_portrait_start() {
        let result = split(portrait(), MasterWindow::Start, MasterRatio::Half, 20);

        // floor(1920 * 0.5 - 30) = 930
        assert_eq!(result.master, Rect::new(20, 20, 1040, 930));
        assert_eq!(result.remaining, Rect::new(0, 950, 1080, 970));
    }

    #[test]
    fn test_portrait_end_anchors_bottom_edge() {
        let result = split(portrait(), MasterWindow::End, MasterRatio::Half, 20);

        // 1920 - 930 - 20
        assert_eq!(result.master, Rect::new(20, 970, 1040, 930));
        assert_eq!(result.remaining, Rect::new(0, 0, 1080, 970));
    }

    #[test]
    fn test_respects_display_origin() {
        let area = Rect::new(1920, 200, 1920, 1080);
        let result = split(area, MasterWindow::End, MasterRatio::Half, 10);

        assert_eq!(result.master, Rect::new(1920 + 965, 210, 945, 1060));
        assert_eq!(result.remaining.left, 1920);
    }

    #[test]
    fn test_zero_padding() {
        let result = split(landscape(), MasterWindow::Start, MasterRatio::Half, 0);
        assert_eq!(result.master, Rect::new(0, 0, 960, 1080));
        assert_eq!(result.remaining, Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn test_grid_never_overlaps_master() {
        for position in [MasterWindow::Start, MasterWindow::End] {
            for ratio in [MasterRatio::OneThird, MasterRatio::Half, MasterRatio::TwoThirds] {
                for area in [landscape(), portrait()] {
                    let result = split(area, position, ratio, 10);
                    let tiles = compute_grid(&result.remaining, area.orientation(), 3, 10);

                    for tile in &tiles {
                        let absolute = tile.translate(result.remaining.left, result.remaining.top);
                        assert!(!absolute.overlaps(&result.master));
                        assert!(area.contains_rect(&absolute));
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = split(landscape(), MasterWindow::End, MasterRatio::TwoThirds, 30);
        let b = split(landscape(), MasterWindow::End, MasterRatio::TwoThirds, 30);
        assert_eq!(a, b);
    }
}
