// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorError)
    clippy::module_name_repetitions
)]

//! # Codetab
//!
//! A tabbed terminal source-code editor.
//!
//! Codetab edits files in the terminal with:
//! - Modal editing (normal, insert, command) with vim-style keys
//! - Undo/redo, clipboard and incremental search
//! - Incremental syntax highlighting
//! - Autosave to a sidecar file and compiler diagnostics in the gutter
//!
//! ## Architecture
//!
//! Codetab uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state (one [`editor::EditSession`] per tab)
//! - **Message**: Events and actions
//! - **Update**: State transitions; IO is returned as effects
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Buffer, history and the modal editing session
//! - [`highlight`]: Incremental syntax highlighting
//! - [`search`]: Search functionality
//! - [`ui`]: Terminal UI components
//! - [`config`]: Command-line and dotfile settings

pub mod app;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod perf;
pub mod search;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{Buffer, EditSession, Effect, KeyPress};
    pub use crate::ui::viewport::Viewport;
}
