//! Scroll position bookkeeping
//!
//! Pure arithmetic over the cursor index and sub-cell offset. Nothing here
//! touches a surface.

use crate::layout::Layout;

/// Logical scroll position of the wall
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Palette position of the top-left image before the offset wraps.
    /// May exceed the palette length; it is normalized before every draw.
    pub cursor_index: usize,
    /// Upward displacement of every row, in `[0, actual_cell_size)`
    pub offset_pixels: f64,
}

/// Pixels a row moves per redraw so one full row passes in `scroll_speed_ms`
#[inline]
pub fn offset_step(actual_cell_size: f64, redraw_rate_ms: u64, scroll_speed_ms: u64) -> f64 {
    let offset_change_per_ms = actual_cell_size / scroll_speed_ms as f64;
    redraw_rate_ms as f64 * offset_change_per_ms
}

impl ScrollState {
    /// Same position with the cursor index wrapped into `[0, palette_len)`
    #[inline]
    pub fn normalized(self, palette_len: usize) -> Self {
        Self {
            cursor_index: self.cursor_index % palette_len,
            ..self
        }
    }

    /// Position after one redraw.
    ///
    /// Once a full cell of offset has accumulated the window advances by one
    /// row of images and the offset starts over. Returns the new state and
    /// whether a row was committed.
    pub fn advanced(self, layout: &Layout, redraw_rate_ms: u64, scroll_speed_ms: u64) -> (Self, bool) {
        let offset = self.offset_pixels
            + offset_step(layout.actual_cell_size, redraw_rate_ms, scroll_speed_ms);

        if offset >= layout.actual_cell_size {
            let next = Self {
                cursor_index: self.cursor_index + layout.column_count as usize,
                offset_pixels: 0.0,
            };
            (next, true)
        } else {
            let next = Self {
                offset_pixels: offset,
                ..self
            };
            (next, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SurfaceSize;

    fn layout(width: u32, height: u32, preferred: f64) -> Layout {
        Layout::compute(SurfaceSize::new(width, height), preferred).unwrap()
    }

    #[test]
    fn test_offset_step() {
        // 100px rows, 5s per row, redraw every 20ms -> 0.4px per redraw
        assert!((offset_step(100.0, 20, 5000) - 0.4).abs() < 1e-12);
        assert_eq!(offset_step(125.0, 500, 1000), 62.5);
    }

    #[test]
    fn test_row_commit_after_exactly_one_cell() {
        let layout = layout(250, 300, 100.0); // 2 columns of 125px
        let mut state = ScrollState::default();
        let mut commits = 0;
        let mut ticks = 0;

        // 25ms redraw at 100ms per row: four ticks per row
        while commits == 0 {
            let (next, committed) = state.advanced(&layout, 25, 100);
            state = next;
            ticks += 1;
            if committed {
                commits += 1;
            }
            assert!(state.offset_pixels >= 0.0);
            assert!(state.offset_pixels < layout.actual_cell_size);
        }

        assert_eq!(ticks, 4);
        assert_eq!(state.cursor_index, 2);
        assert_eq!(state.offset_pixels, 0.0);
    }

    #[test]
    fn test_offset_accumulates_below_cell() {
        let layout = layout(100, 100, 100.0);
        let (state, committed) = ScrollState::default().advanced(&layout, 20, 5000);
        assert!(!committed);
        assert_eq!(state.cursor_index, 0);
        assert!((state.offset_pixels - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_keeps_offset() {
        let state = ScrollState {
            cursor_index: 17,
            offset_pixels: 3.5,
        };
        let normal = state.normalized(5);
        assert_eq!(normal.cursor_index, 2);
        assert_eq!(normal.offset_pixels, 3.5);
    }
}
