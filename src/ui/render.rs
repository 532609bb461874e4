//! Turning highlighted lines into styled terminal text.

use std::ops::Range;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::highlight::HighlightedLine;

use super::style::Theme;
use super::window::ELLIPSIS;

/// Options for [`render_line`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// Maximum columns to emit; `None` for unlimited.
    pub max_width: Option<usize>,
    /// Replace the last column with `…` when the line does not fit.
    pub add_ellipsis: bool,
    /// Column drawn with the cursor style. At or past the end of the line
    /// the cursor is a styled space.
    pub cursor_col: Option<usize>,
    /// Right-pad with spaces up to this many columns.
    pub pad_to_width: usize,
    /// Column ranges patched with an extra style (selection, search matches).
    pub overlays: &'a [(Range<usize>, Style)],
}

/// Style `line` with `theme`, returning the terminal line and whether it was
/// cut short.
pub fn render_line(
    line: &HighlightedLine,
    theme: &Theme,
    opts: &RenderOptions<'_>,
) -> (Line<'static>, bool) {
    let total = line.len();
    let allowed = match opts.max_width {
        Some(max) if opts.add_ellipsis && total > max && max > 1 => Some(max - 1),
        other => other,
    };
    let fits = |width: usize| allowed.is_none_or(|limit| width < limit);

    let mut spans = SpanBuilder::default();
    let mut width = 0;
    let mut col = 0;
    'segments: for segment in line.segments() {
        let base = theme.token(segment.kind);
        for ch in segment.text.chars() {
            let (glyph, cells) = display_glyph(ch);
            if !fits(width + cells - 1) {
                break 'segments;
            }
            let mut style = opts
                .overlays
                .iter()
                .filter(|(range, _)| range.contains(&col))
                .fold(base, |acc, (_, overlay)| acc.patch(*overlay));
            if opts.cursor_col == Some(col) {
                style = theme.cursor;
            }
            spans.push(glyph, style);
            width += cells;
            col += 1;
        }
    }
    let truncated = col < total;

    if opts.cursor_col.is_some_and(|c| c >= total) && fits(width) {
        spans.push(' ', theme.cursor);
        width += 1;
    }

    if truncated && opts.add_ellipsis && opts.max_width.is_some_and(|max| width < max) {
        spans.push_str(ELLIPSIS, theme.plain);
        width += 1;
    }

    if width < opts.pad_to_width {
        spans.push_str(&" ".repeat(opts.pad_to_width - width), Style::default());
    }

    (Line::from(spans.finish()), truncated)
}

/// Glyph drawn for `ch` and the cells it takes. Control characters such as
/// tabs would corrupt the terminal and are drawn as one space.
fn display_glyph(ch: char) -> (char, usize) {
    if ch.is_control() {
        return (' ', 1);
    }
    match ch.width() {
        Some(0) | None => (' ', 1),
        Some(cells) => (ch, cells),
    }
}

/// Collects chars into spans, starting a new span whenever the style changes.
#[derive(Default)]
struct SpanBuilder {
    spans: Vec<Span<'static>>,
    text: String,
    style: Style,
}

impl SpanBuilder {
    fn push(&mut self, ch: char, style: Style) {
        if style != self.style && !self.text.is_empty() {
            self.flush();
        }
        self.style = style;
        self.text.push(ch);
    }

    fn push_str(&mut self, s: &str, style: Style) {
        for ch in s.chars() {
            self.push(ch, style);
        }
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.text);
        self.spans.push(Span::styled(text, self.style));
    }

    fn finish(mut self) -> Vec<Span<'static>> {
        if !self.text.is_empty() {
            self.flush();
        }
        self.spans
    }
}
