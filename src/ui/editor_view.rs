use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::editor::{EditSession, Mode};
use crate::highlight::HighlightedLine;

use super::CHROME_ROWS;
use super::render::{RenderOptions, render_line};
use super::status;
use super::style::Theme;
use super::window::window_line;

/// Gutter columns for a document of `line_count` lines: diagnostic marker,
/// space, right-aligned line number, space.
pub fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).to_string().len();
    u16::try_from(digits + 3).unwrap_or(u16::MAX)
}

/// Size of the text area (without gutter and chrome) for a terminal.
pub fn text_area_size(width: u16, height: u16, line_count: usize) -> (u16, u16) {
    (
        width.saturating_sub(gutter_width(line_count)),
        height.saturating_sub(CHROME_ROWS),
    )
}

/// Draw the whole screen.
pub fn render(model: &Model, frame: &mut Frame) {
    let _scope = crate::perf::scope("ui.render");
    let [tabs_area, text_area, status_area, bottom_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    status::render_tab_bar(model, frame, tabs_area);
    if let Some(session) = model.active_session() {
        render_session(session, &model.theme, frame, text_area);
        status::render_status_bar(session, &model.theme, frame, status_area);
        if let Some(prompt) = session.prompt() {
            status::render_prompt(prompt, &model.theme, frame, bottom_area);
            return;
        }
    }
    status::render_toast_bar(model, frame, bottom_area);
}

fn render_session(session: &EditSession, theme: &Theme, frame: &mut Frame, area: Rect) {
    let buffer = session.buffer();
    let line_count = buffer.line_count();
    let gutter = usize::from(gutter_width(line_count));
    let digits = gutter - 3;
    let text_width = usize::from(area.width).saturating_sub(gutter);
    let viewport = session.viewport();
    let left = viewport.left();
    let cursor = buffer.cursor();
    let selection = buffer.selection_range();
    let show_cursor = session.mode() != Mode::Command;

    let mut lines = Vec::with_capacity(usize::from(area.height));
    for row in 0..usize::from(area.height) {
        let idx = viewport.top() + row;
        if idx >= line_count {
            lines.push(Line::from(Span::styled("~", theme.gutter)));
            continue;
        }

        let (marker, marker_style) =
            theme.diagnostic_marker(session.diagnostics().severity_at(idx));
        let number_style = if idx == cursor.line {
            theme.gutter_current
        } else {
            theme.gutter
        };
        let mut spans = vec![
            Span::styled(marker.to_string(), marker_style),
            Span::styled(format!(" {:>digits$} ", idx + 1), number_style),
        ];

        let fallback;
        let highlighted = match session.highlighter().line(idx) {
            Some(hl) => hl,
            None => {
                fallback = HighlightedLine::plain(&buffer.line(idx).unwrap_or_default());
                &fallback
            }
        };
        let windowed = window_line(highlighted, left, text_width);

        let line_len = buffer.line_len(idx);
        let mut overlays = Vec::new();
        if let Some((start, end)) = selection
            && (start.line..=end.line).contains(&idx)
        {
            let from = if idx == start.line { start.col } else { 0 };
            let to = if idx == end.line { end.col } else { line_len + 1 };
            if let Some(range) = screen_range(from..to, left) {
                overlays.push((range, theme.selection));
            }
        }
        for m in session.search().matches().iter().filter(|m| m.line == idx) {
            if let Some(range) = screen_range(m.start..m.end, left) {
                overlays.push((range, theme.search_match));
            }
        }

        let cursor_col = (show_cursor && idx == cursor.line)
            .then(|| screen_col(cursor.col, left))
            .flatten();
        let opts = RenderOptions {
            max_width: Some(text_width),
            add_ellipsis: false,
            cursor_col,
            pad_to_width: text_width,
            overlays: &overlays,
        };
        let (text, _) = render_line(&windowed, theme, &opts);
        spans.extend(text.spans);
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Screen column of buffer column `col` when the window starts at `left`.
/// A window scrolled right spends its first column on `…`.
fn screen_col(col: usize, left: usize) -> Option<usize> {
    if left == 0 {
        Some(col)
    } else {
        col.checked_sub(left).map(|c| c + 1)
    }
}

fn screen_range(range: Range<usize>, left: usize) -> Option<Range<usize>> {
    let offset = usize::from(left > 0);
    let start = range.start.max(left);
    if start >= range.end {
        return None;
    }
    Some(start - left + offset..range.end - left + offset)
}
