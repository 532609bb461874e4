//! The editing engine: text buffer, undo history and the modal session.
//!
//! Everything here is synchronous and terminal-agnostic. The host decodes
//! input into [`KeyPress`]es and performs the [`Effect`]s a session returns.

mod buffer;
mod diagnostics;
mod error;
mod history;
pub mod io;
mod key;
mod mode;
mod session;

pub use buffer::{Buffer, BufferState, Direction, Position};
pub use diagnostics::{Diagnostic, DiagnosticSet, Severity};
pub use error::EditorError;
pub use history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
pub use key::{Key, KeyPress, Modifiers};
pub use mode::{Mode, Pending, PromptKind};
pub use session::{EditSession, Effect, ExternalEdit, Prompt, SessionId, Status, StatusLevel};
