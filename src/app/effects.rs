use std::io::{Write, stdout};
use std::process::Command;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel};
use crate::editor::io::{SaveRequest, save_file};
use crate::editor::{Effect, ExternalEdit, SessionId};

impl App {
    /// Perform the IO queued by the last update.
    ///
    /// Timers and saves run on their own threads and report back through
    /// `tx`; clipboard writes and the external editor run inline.
    pub(super) fn handle_effects(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        tx: &Sender<Message>,
    ) -> Result<()> {
        for (session, effect) in model.take_effects() {
            match effect {
                Effect::ScheduleAutosave { generation, delay } => {
                    spawn_autosave_timer(tx.clone(), session, generation, delay);
                }
                Effect::Save(request) => spawn_save(tx.clone(), session, request),
                Effect::CopyToClipboard(text) => {
                    if let Err(err) = copy_to_clipboard(&text) {
                        model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
                    }
                }
                Effect::LaunchExternalEditor(edit) => {
                    let result = run_external_editor(terminal, &edit)?;
                    let _ = tx.send(Message::ExternalEditorExited { session, result });
                }
                // Resolved in `update`.
                Effect::Close { .. } => {}
            }
        }
        Ok(())
    }
}

pub(super) fn spawn_autosave_timer(
    tx: Sender<Message>,
    session: SessionId,
    generation: u64,
    delay: Duration,
) {
    thread::spawn(move || {
        thread::sleep(delay);
        // The receiver is gone once the app has exited.
        let _ = tx.send(Message::AutosaveFired {
            session,
            generation,
        });
    });
}

pub(super) fn spawn_save(tx: Sender<Message>, session: SessionId, request: SaveRequest) {
    thread::spawn(move || {
        let _scope = crate::perf::scope("app.save");
        let result = save_file(&request);
        if let Err(err) = &result {
            tracing::warn!(target: "app", error = %err, "save failed");
        }
        let _ = tx.send(Message::SaveCompleted {
            session,
            revision: request.revision,
            result,
        });
    });
}

/// Hand the terminal to an external editor until it exits.
///
/// The outer `Result` fails only when the terminal cannot be restored; the
/// inner one describes the editor process.
fn run_external_editor(
    terminal: &mut DefaultTerminal,
    edit: &ExternalEdit,
) -> Result<std::result::Result<(), String>> {
    let Some((program, args)) = split_command(&edit.command) else {
        return Ok(Err("empty editor command".to_string()));
    };
    tracing::debug!(target: "app", program, path = %edit.path.display(), "launching external editor");
    ratatui::restore();
    let status = Command::new(program).args(args).arg(&edit.path).status();
    *terminal = ratatui::try_init().context("Failed to re-initialize terminal")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("exited with {status}")),
        Err(err) => Err(err.to_string()),
    })
}

/// Split `"code --wait"` into the program and its arguments.
fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::Stdio;

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
