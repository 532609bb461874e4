//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state (open tabs, toasts)
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions; session IO is queued, not performed
//! - [`App::run`]: Main event loop with rendering and side effects

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, TabTitle, ToastLevel};
pub use update::{Message, update};

use crate::config::{EditorSettings, ThemeMode};
use crate::editor::io::Location;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    files: Vec<Location>,
    settings: EditorSettings,
    theme_mode: ThemeMode,
}

impl App {
    /// Create a new application opening `files` as tabs.
    pub fn new(files: Vec<Location>) -> Self {
        Self {
            files,
            settings: EditorSettings::default(),
            theme_mode: ThemeMode::Auto,
        }
    }

    /// Settings every session is opened with.
    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Force a light or dark palette, or probe the terminal with `Auto`.
    pub const fn with_theme_mode(mut self, mode: ThemeMode) -> Self {
        self.theme_mode = mode;
        self
    }
}
