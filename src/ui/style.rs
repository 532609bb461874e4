//! Theming and color definitions.
//!
//! Token colors come in a dark and a light palette. Which one is used is
//! decided once at startup (`--theme`, or the terminal's `COLORFGBG`).

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::editor::Severity;
use crate::highlight::TokenKind;

/// Terminal background brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// Resolve a configured theme mode, probing the environment for `Auto`.
    pub fn resolve(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::Light,
            ThemeMode::Dark => Self::Dark,
            ThemeMode::Auto => {
                Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
            }
        }
    }

    /// Parse `COLORFGBG` (`"fg;bg"`); a background index of 7 or above is light.
    pub fn from_colorfgbg(colorfgbg: Option<&str>) -> Self {
        let Some(value) = colorfgbg else {
            return Self::Dark;
        };
        let bg_str = value.rsplit(';').next().unwrap_or(value);
        match bg_str.parse::<u8>() {
            Ok(bg) if bg >= 7 => Self::Light,
            _ => Self::Dark,
        }
    }
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Styles for token kinds and editor chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub plain: Style,
    pub keyword: Style,
    pub builtin_type: Style,
    pub type_name: Style,
    pub string: Style,
    pub number: Style,
    pub comment: Style,
    pub directive: Style,
    pub attribute: Style,
    pub operator: Style,
    pub cursor: Style,
    pub selection: Style,
    pub search_match: Style,
    pub gutter: Style,
    pub gutter_current: Style,
    pub status_bar: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            plain: Style::default().fg(rgb(0xE2_E8F0)),
            keyword: Style::default()
                .fg(rgb(0xC0_84FC))
                .add_modifier(Modifier::BOLD),
            builtin_type: Style::default()
                .fg(rgb(0x38_BDF8))
                .add_modifier(Modifier::BOLD),
            type_name: Style::default().fg(rgb(0x60_A5FA)),
            string: Style::default().fg(rgb(0xFD_E68A)),
            number: Style::default().fg(rgb(0xFB_923C)),
            comment: Style::default().fg(rgb(0x64_748B)),
            directive: Style::default().fg(rgb(0x22_D3EE)),
            attribute: Style::default().fg(rgb(0xF4_72B6)),
            operator: Style::default().fg(rgb(0xA5_B4FC)),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            selection: Style::default().bg(rgb(0x33_4155)),
            search_match: Style::default().bg(rgb(0x85_4D0E)),
            gutter: Style::default().fg(Color::DarkGray),
            gutter_current: Style::default().fg(Color::Gray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            tab_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
        }
    }

    pub fn light() -> Self {
        Self {
            plain: Style::default().fg(rgb(0x1F_2937)),
            keyword: Style::default()
                .fg(rgb(0x7C_3AED))
                .add_modifier(Modifier::BOLD),
            builtin_type: Style::default()
                .fg(rgb(0x25_63EB))
                .add_modifier(Modifier::BOLD),
            type_name: Style::default().fg(rgb(0x1D_4ED8)),
            string: Style::default().fg(rgb(0xB4_5309)),
            number: Style::default().fg(rgb(0xD9_7706)),
            comment: Style::default().fg(rgb(0x94_A3B8)),
            directive: Style::default().fg(rgb(0x0E_A5E9)),
            attribute: Style::default().fg(rgb(0xDB_2777)),
            operator: Style::default().fg(rgb(0x25_63EB)),
            cursor: Style::default().bg(Color::Black).fg(Color::White),
            selection: Style::default().bg(rgb(0xCB_D5E1)),
            search_match: Style::default().bg(rgb(0xFD_E68A)),
            gutter: Style::default().fg(Color::Indexed(245)),
            gutter_current: Style::default().fg(Color::Indexed(238)),
            status_bar: Style::default().bg(Color::Indexed(252)).fg(Color::Black),
            tab_active: Style::default()
                .bg(Color::Indexed(24))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Indexed(238)),
        }
    }

    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        }
    }

    /// Style for a token kind.
    pub const fn token(&self, kind: TokenKind) -> Style {
        match kind {
            TokenKind::Plain => self.plain,
            TokenKind::Keyword => self.keyword,
            TokenKind::BuiltinType => self.builtin_type,
            TokenKind::TypeName => self.type_name,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
            TokenKind::Comment => self.comment,
            TokenKind::Directive => self.directive,
            TokenKind::Attribute => self.attribute,
            TokenKind::Operator => self.operator,
        }
    }

    /// Gutter marker and style for a diagnostic severity.
    pub fn diagnostic_marker(&self, severity: Option<Severity>) -> (&'static str, Style) {
        match severity {
            Some(Severity::Error) => ("●", Style::default().fg(Color::Red)),
            Some(Severity::Warning) => ("▲", Style::default().fg(Color::Yellow)),
            Some(Severity::Info) => ("·", Style::default().fg(Color::Cyan)),
            None => ("·", self.gutter),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
