use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::editor::{EditSession, Prompt};

use super::style::Theme;

pub fn render_tab_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for tab in model.tab_titles() {
        let style = if tab.active {
            model.theme.tab_active
        } else {
            model.theme.tab_inactive
        };
        spans.push(Span::styled(format!(" {} ", tab.title), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_status_bar(session: &EditSession, theme: &Theme, frame: &mut Frame, area: Rect) {
    let cursor = session.buffer().cursor();
    let total = session.buffer().line_count();
    let pending = session
        .pending()
        .map(|p| format!("  {}", p.key()))
        .unwrap_or_default();
    let search = session
        .search()
        .position()
        .map(|(index, count)| format!("  Match {index}/{count}"))
        .unwrap_or_default();
    let percent = session.viewport().scroll_percent(total);

    let status = format!(
        " {}  {}  Ln {}, Col {}{}{}  [{}%]",
        session.mode().as_str(),
        session.title(),
        cursor.line + 1,
        cursor.col + 1,
        search,
        pending,
        percent
    );
    frame.render_widget(Paragraph::new(status).style(theme.status_bar), area);
}

pub fn render_prompt(prompt: &Prompt, theme: &Theme, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(format!("{}{}", prompt.kind.prefix(), prompt.text), theme.plain),
        Span::styled(" ", theme.cursor),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
