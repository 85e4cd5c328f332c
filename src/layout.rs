//! Index-to-offset math for the three positioning modes
//!
//! All functions are pure and take the reading progression explicitly, so the
//! RTL flip never leaks into stored geometry.

use crate::geometry::Rect;
use crate::page_view::ReadingProgression;

/// How resident page views are positioned on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One page per screen, snapped horizontally
    #[default]
    HorizontalPaging,
    /// Pages stacked back-to-back in one vertical scroll surface
    VerticalScroll,
    /// Rows materialized on demand by a windowed list host
    VirtualizedList,
}

/// A resident page view's computed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub index: usize,
    pub frame: Rect,
}

/// Horizontal offset of the page at `index`.
///
/// In RTL reading order logical index 0 is visually rightmost, so the offset
/// is measured from the content's trailing edge.
pub fn x_offset_for_index(
    index: usize,
    page_width: f32,
    page_count: usize,
    progression: ReadingProgression,
) -> f32 {
    match progression {
        ReadingProgression::Ltr => page_width * index as f32,
        ReadingProgression::Rtl => {
            page_width * page_count as f32 - page_width * (index + 1) as f32
        }
    }
}

/// Page index a settled horizontal offset corresponds to, clamped to
/// `[0, page_count)`.
pub fn index_for_x_offset(
    offset_x: f32,
    page_width: f32,
    page_count: usize,
    progression: ReadingProgression,
) -> usize {
    if page_width <= 0.0 || page_count == 0 {
        return 0;
    }

    let logical = match progression {
        ReadingProgression::Ltr => offset_x,
        ReadingProgression::Rtl => page_width * page_count as f32 - (offset_x + page_width),
    };

    let index = (logical / page_width).round().max(0.0) as usize;
    index.min(page_count - 1)
}

/// Stacks rows back-to-back vertically, each at its own measured height.
/// `rows` must already be in visual order.
pub fn arrange_rows(rows: &[(usize, f32)], width: f32) -> Vec<PageFrame> {
    let mut frames = Vec::with_capacity(rows.len());
    let mut y = 0.0;
    for &(index, height) in rows {
        frames.push(PageFrame {
            index,
            frame: Rect::new(0.0, y, width, height),
        });
        y += height;
    }
    frames
}

/// Top offset of the row with the given page index, if it is resident.
pub fn y_offset_for_index(frames: &[PageFrame], index: usize) -> Option<f32> {
    frames
        .iter()
        .find(|f| f.index == index)
        .map(|f| f.frame.origin.y)
}

/// Index of the first row (in visual order) whose span is not yet fully
/// scrolled past the given offset. Falls back to the last row once the offset
/// runs past all of them.
pub fn index_at_y_offset(frames: &[PageFrame], offset_y: f32) -> Option<usize> {
    frames
        .iter()
        .find(|f| f.frame.max_y() > offset_y)
        .or_else(|| frames.last())
        .map(|f| f.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltr_offset_is_index_times_width() {
        assert_eq!(
            x_offset_for_index(0, 100.0, 3, ReadingProgression::Ltr),
            0.0
        );
        assert_eq!(
            x_offset_for_index(1, 100.0, 3, ReadingProgression::Ltr),
            100.0
        );
        assert_eq!(
            x_offset_for_index(2, 100.0, 3, ReadingProgression::Ltr),
            200.0
        );
    }

    #[test]
    fn rtl_offset_measured_from_trailing_edge() {
        // N=3, W=100: index 0 is rightmost
        assert_eq!(
            x_offset_for_index(0, 100.0, 3, ReadingProgression::Rtl),
            200.0
        );
        assert_eq!(
            x_offset_for_index(1, 100.0, 3, ReadingProgression::Rtl),
            100.0
        );
        assert_eq!(
            x_offset_for_index(2, 100.0, 3, ReadingProgression::Rtl),
            0.0
        );
    }

    #[test]
    fn settle_index_round_trips_with_offset() {
        for progression in [ReadingProgression::Ltr, ReadingProgression::Rtl] {
            for index in 0..5 {
                let offset = x_offset_for_index(index, 320.0, 5, progression);
                assert_eq!(index_for_x_offset(offset, 320.0, 5, progression), index);
            }
        }
    }

    #[test]
    fn settle_index_rounds_to_nearest_page() {
        // Dragged 60% of the way to page 2
        assert_eq!(
            index_for_x_offset(160.0, 100.0, 3, ReadingProgression::Ltr),
            2
        );
        // Barely nudged off page 0
        assert_eq!(
            index_for_x_offset(30.0, 100.0, 3, ReadingProgression::Ltr),
            0
        );
    }

    #[test]
    fn settle_index_clamps_out_of_range_offsets() {
        assert_eq!(
            index_for_x_offset(9999.0, 100.0, 3, ReadingProgression::Ltr),
            2
        );
        assert_eq!(
            index_for_x_offset(-50.0, 100.0, 3, ReadingProgression::Ltr),
            0
        );
        assert_eq!(index_for_x_offset(100.0, 0.0, 3, ReadingProgression::Ltr), 0);
    }

    #[test]
    fn rows_stack_back_to_back() {
        let frames = arrange_rows(&[(3, 50.0), (4, 120.0), (5, 80.0)], 320.0);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].frame, Rect::new(0.0, 0.0, 320.0, 50.0));
        assert_eq!(frames[1].frame, Rect::new(0.0, 50.0, 320.0, 120.0));
        assert_eq!(frames[2].frame, Rect::new(0.0, 170.0, 320.0, 80.0));
    }

    #[test]
    fn y_offset_lookup() {
        let frames = arrange_rows(&[(3, 50.0), (4, 120.0)], 320.0);
        assert_eq!(y_offset_for_index(&frames, 4), Some(50.0));
        assert_eq!(y_offset_for_index(&frames, 9), None);
    }

    #[test]
    fn displayed_index_with_uneven_heights() {
        let frames = arrange_rows(&[(2, 50.0), (3, 120.0), (4, 80.0)], 320.0);

        assert_eq!(index_at_y_offset(&frames, 0.0), Some(2));
        // Page 2 (50 high) fully scrolled past at exactly 50
        assert_eq!(index_at_y_offset(&frames, 49.0), Some(2));
        assert_eq!(index_at_y_offset(&frames, 50.0), Some(3));
        assert_eq!(index_at_y_offset(&frames, 169.9), Some(3));
        assert_eq!(index_at_y_offset(&frames, 170.0), Some(4));
        // Past the end falls back to the last row
        assert_eq!(index_at_y_offset(&frames, 1000.0), Some(4));
        assert_eq!(index_at_y_offset(&[], 0.0), None);
    }
}
