//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`window`]: Horizontal windowing of highlighted lines
//! - [`render`]: Highlighted lines to styled terminal text
//! - [`style`]: Theming and colors

pub mod render;
pub mod style;
pub mod viewport;
pub mod window;

mod editor_view;
mod status;

pub use editor_view::{gutter_width, render, text_area_size};

/// Rows taken by the tab bar, status bar and prompt/toast line.
pub const CHROME_ROWS: u16 = 3;
