//! Viewport management for scrolling.
//!
//! The [`Viewport`] tracks which part of a buffer is on screen, both
//! vertically (first visible line) and horizontally (first visible column),
//! and keeps the cursor inside it.

use std::ops::Range;

/// The visible part of a text buffer.
///
/// # Example
///
/// ```
/// use codetab::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24);
/// vp.reveal(30, 0, 100);
/// assert_eq!(vp.visible_range(100), 7..31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    top: usize,
    left: usize,
}

impl Viewport {
    /// Create a viewport `width` text columns by `height` rows.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            top: 0,
            left: 0,
        }
    }

    /// First visible line.
    pub const fn top(&self) -> usize {
        self.top
    }

    /// First visible column.
    pub const fn left(&self) -> usize {
        self.left
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Lines on screen for a document of `total_lines`.
    pub fn visible_range(&self, total_lines: usize) -> Range<usize> {
        let start = self.top.min(total_lines);
        let end = (self.top + self.height as usize).min(total_lines);
        start..end
    }

    /// Scroll percentage (0-100) for a document of `total_lines`.
    pub fn scroll_percent(&self, total_lines: usize) -> u8 {
        let max_offset = self.max_top(total_lines);
        if max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.top.min(max_offset) as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    /// Scroll up by n lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.top = self.top.saturating_sub(n);
    }

    /// Scroll down by n lines.
    pub fn scroll_down(&mut self, n: usize, total_lines: usize) {
        self.top = (self.top + n).min(self.max_top(total_lines));
    }

    /// Resize the viewport, keeping the offsets valid.
    pub fn resize(&mut self, width: u16, height: u16, total_lines: usize) {
        self.width = width;
        self.height = height;
        self.top = self.top.min(self.max_top(total_lines));
    }

    /// Scroll the minimum amount that puts `(line, col)` on screen.
    ///
    /// Horizontally the cursor stays clear of the trailing ellipsis column
    /// and of the cell the end-of-line cursor needs.
    pub fn reveal(&mut self, line: usize, col: usize, total_lines: usize) {
        let height = (self.height as usize).max(1);
        if line < self.top {
            self.top = line;
        } else if line >= self.top + height {
            self.top = line + 1 - height;
        }
        self.top = self.top.min(self.max_top(total_lines));

        let width = self.width as usize;
        if width < 3 {
            self.left = col;
            return;
        }
        if col < self.left {
            self.left = col;
        } else if col + 2 >= self.left + width {
            self.left = col + 3 - width;
        }
    }

    /// Reset to the top-left corner.
    pub const fn reset(&mut self) {
        self.top = 0;
        self.left = 0;
    }

    const fn max_top(&self, total_lines: usize) -> usize {
        total_lines.saturating_sub(self.height as usize)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_origin() {
        let vp = Viewport::new(80, 24);
        assert_eq!((vp.top(), vp.left()), (0, 0));
    }

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = Viewport::new(80, 24);
        assert_eq!(vp.visible_range(10), 0..10);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24);
        vp.scroll_down(1000, 100);
        assert_eq!(vp.top(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24);
        vp.scroll_down(10, 100);
        vp.scroll_up(100);
        assert_eq!(vp.top(), 0);
    }

    #[test]
    fn test_reveal_scrolls_down_minimally() {
        let mut vp = Viewport::new(80, 10);
        vp.reveal(15, 0, 100);
        assert_eq!(vp.top(), 6);
        assert_eq!(vp.visible_range(100), 6..16);
    }

    #[test]
    fn test_reveal_scrolls_up_to_line() {
        let mut vp = Viewport::new(80, 10);
        vp.scroll_down(50, 100);
        vp.reveal(20, 0, 100);
        assert_eq!(vp.top(), 20);
    }

    #[test]
    fn test_reveal_line_already_visible_keeps_offset() {
        let mut vp = Viewport::new(80, 10);
        vp.scroll_down(5, 100);
        vp.reveal(8, 0, 100);
        assert_eq!(vp.top(), 5);
    }

    #[test]
    fn test_reveal_scrolls_right_leaving_room_for_ellipsis() {
        let mut vp = Viewport::new(10, 5);
        vp.reveal(0, 9, 1);
        assert_eq!(vp.left(), 2);
        vp.reveal(0, 25, 1);
        assert_eq!(vp.left(), 18);
    }

    #[test]
    fn test_reveal_scrolls_back_left() {
        let mut vp = Viewport::new(10, 5);
        vp.reveal(0, 40, 1);
        vp.reveal(0, 0, 1);
        assert_eq!(vp.left(), 0);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 24);
        vp.scroll_down(50, 100);
        vp.resize(80, 60, 100);
        assert_eq!(vp.top(), 40);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = Viewport::new(80, 24);
        assert_eq!(vp.scroll_percent(100), 0);
        vp.scroll_down(76, 100);
        assert_eq!(vp.scroll_percent(100), 100);
        assert_eq!(vp.scroll_percent(10), 100);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reveal_puts_cursor_on_screen(
                total_lines in 1..5000usize,
                height in 1..100u16,
                width in 3..200u16,
                line_seed in 0..5000usize,
                col in 0..1000usize,
            ) {
                let line = line_seed % total_lines;
                let mut vp = Viewport::new(width, height);
                vp.reveal(line, col, total_lines);
                prop_assert!(vp.visible_range(total_lines).contains(&line));
                prop_assert!(col >= vp.left());
                prop_assert!(col < vp.left() + width as usize);
            }

            #[test]
            fn visible_range_within_bounds(
                total_lines in 0..10000usize,
                height in 1..100u16,
                offset in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height);
                vp.scroll_down(offset, total_lines);
                let range = vp.visible_range(total_lines);
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
            }
        }
    }
}
