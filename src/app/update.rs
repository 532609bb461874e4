use std::path::PathBuf;
use std::time::SystemTime;

use crate::app::Model;
use crate::app::model::ToastLevel;
use crate::editor::{Diagnostic, Effect, EditorError, KeyPress, SessionId};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and results of background work.
#[derive(Debug)]
pub enum Message {
    // Editing
    /// Key press for the active session
    Key(KeyPress),

    // Files and tabs
    /// Open a file in a new tab, or focus it if already open
    OpenFile(PathBuf),
    /// Open or focus a file and jump to a 1-based position
    OpenLocation {
        path: PathBuf,
        line: usize,
        col: usize,
    },
    /// Close the active session; dirty sessions need confirmation unless forced
    RequestClose { force: bool },
    /// Answer to the discard prompt
    ConfirmClose(bool),
    /// Replace the diagnostics of the session showing `path`
    SetDiagnostics {
        path: PathBuf,
        list: Vec<Diagnostic>,
    },
    /// Focus the next tab
    NextTab,
    /// Focus the previous tab
    PrevTab,

    // Background work
    /// An autosave timer elapsed
    AutosaveFired { session: SessionId, generation: u64 },
    /// A background save finished
    SaveCompleted {
        session: SessionId,
        revision: u64,
        result: Result<Option<SystemTime>, EditorError>,
    },
    /// The external editor process exited
    ExternalEditorExited {
        session: SessionId,
        result: Result<(), String>,
    },

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Update the model for one message.
///
/// Session state changes happen here; IO the sessions ask for is queued on
/// the model and performed by the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Background results must not cancel a pending quit confirmation.
    if matches!(msg, Message::Key(_)) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::Key(key) => {
            if let Some(session) = model.active_session_mut() {
                let id = session.id();
                let effects = session.handle_key(key);
                apply_effects(&mut model, id, effects);
            }
        }

        Message::OpenFile(path) => {
            if let Err(err) = model.open_file(&path) {
                model.show_toast(ToastLevel::Error, format!("Open failed: {err}"));
            }
        }
        Message::OpenLocation { path, line, col } => match model.open_file(&path) {
            Ok(id) => {
                if let Some(session) = model.session_mut(id) {
                    session.goto_location(line, col);
                }
            }
            Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
        },
        Message::RequestClose { force } => {
            if let Some(id) = model.active_session().map(crate::editor::EditSession::id) {
                request_close(&mut model, id, force);
            }
        }
        Message::ConfirmClose(confirmed) => {
            if let Some(id) = model.close_confirmation.take() {
                if confirmed {
                    model.close_session(id);
                } else {
                    model.show_toast(ToastLevel::Info, "Close cancelled");
                }
            }
        }
        Message::SetDiagnostics { path, list } => {
            let target = model
                .tabs
                .iter_mut()
                .find(|s| s.path() == path.as_path());
            match target {
                Some(session) => session.set_diagnostics(list),
                None => {
                    tracing::debug!(target: "app", path = %path.display(), "diagnostics for unopened file");
                }
            }
        }
        Message::NextTab => {
            if !model.tabs.is_empty() {
                model.active = (model.active + 1) % model.tabs.len();
            }
        }
        Message::PrevTab => {
            if !model.tabs.is_empty() {
                model.active = (model.active + model.tabs.len() - 1) % model.tabs.len();
            }
        }

        Message::AutosaveFired {
            session,
            generation,
        } => {
            if let Some(s) = model.session_mut(session) {
                s.on_autosave_timer(generation);
            }
        }
        Message::SaveCompleted {
            session,
            revision,
            result,
        } => {
            if let Some(s) = model.session_mut(session) {
                let effects = s.on_save_completed(revision, result);
                let status = s.take_status();
                apply_effects(&mut model, session, effects);
                if let Some(status) = status {
                    model.show_toast(status.level.into(), status.text);
                }
            }
        }
        Message::ExternalEditorExited { session, result } => {
            if let Err(err) = result {
                model.show_toast(ToastLevel::Error, format!("External editor failed: {err}"));
            }
            if let Some(s) = model.session_mut(session) {
                s.on_external_editor_exited();
            }
        }

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
        }

        Message::Quit => {
            let dirty = model.dirty_count();
            if dirty == 0 || model.quit_confirmed {
                model.should_quit = true;
            } else {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    format!("{dirty} tab(s) have unsaved changes (quit again to discard)"),
                );
            }
        }
    }

    model.sync_viewport();
    model.collect_status();
    model
}

/// Handle effects that only change model state; queue the rest.
fn apply_effects(model: &mut Model, id: SessionId, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Close { force } => request_close(model, id, force),
            other => model.pending_effects.push((id, other)),
        }
    }
}

fn request_close(model: &mut Model, id: SessionId, force: bool) {
    let Some(idx) = model.tab_index(id) else {
        return;
    };
    let dirty = model.tabs[idx].is_dirty();
    if !dirty || force || model.close_confirmation == Some(id) {
        model.close_session(id);
        return;
    }
    let title = model.tabs[idx].title();
    model.close_confirmation = Some(id);
    model.show_toast(
        ToastLevel::Warning,
        format!("Discard unsaved changes to {title}? (y/n)"),
    );
}
