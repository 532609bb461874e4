//! One open file: buffer, history and the modal key machine.
//!
//! [`EditSession::handle_key`] is the whole interface for keystrokes. It
//! mutates the session synchronously and returns [`Effect`]s describing IO
//! the host has to perform (timers, saves, clipboard, external editor). Their
//! results come back through [`EditSession::on_autosave_timer`],
//! [`EditSession::on_save_completed`] and
//! [`EditSession::on_external_editor_exited`].

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::EditorSettings;
use crate::highlight::{DocumentHighlighter, LineEdit};
use crate::search::SearchState;
use crate::ui::viewport::Viewport;

use super::buffer::{Buffer, Direction, Position};
use super::diagnostics::{Diagnostic, DiagnosticSet, Severity};
use super::error::EditorError;
use super::history::{History, Snapshot};
use super::io::{self, DEFAULT_FILE_MODE, SaveRequest};
use super::key::{Key, KeyPress};
use super::mode::{Mode, Pending, PromptKind};

/// Identifies a session inside the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Work the host performs on behalf of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call [`EditSession::on_autosave_timer`] with `generation` after `delay`.
    ScheduleAutosave { generation: u64, delay: Duration },
    /// Write the file, then report through [`EditSession::on_save_completed`].
    Save(SaveRequest),
    /// Close the session. Without `force` the host confirms when dirty.
    Close { force: bool },
    /// Put text on the system clipboard.
    CopyToClipboard(String),
    /// Suspend the terminal and run an external editor on the file.
    LaunchExternalEditor(ExternalEdit),
}

/// Command line for [`Effect::LaunchExternalEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEdit {
    pub command: String,
    pub path: PathBuf,
}

/// What to do once an explicit save succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AfterSave {
    #[default]
    Nothing,
    Close,
    LaunchExternalEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Last user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

/// Text typed after `:` or `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

pub struct EditSession {
    id: SessionId,
    path: PathBuf,
    buffer: Buffer,
    history: History,
    highlighter: DocumentHighlighter,
    settings: EditorSettings,
    file_mode: u32,
    modified: Option<SystemTime>,
    dirty: bool,
    revision: u64,
    mode: Mode,
    pending: Option<Pending>,
    clipboard: Option<String>,
    prompt: Option<Prompt>,
    search: SearchState,
    autosave_generation: u64,
    after_save: AfterSave,
    viewport: Viewport,
    diagnostics: DiagnosticSet,
    status: Option<Status>,
}

impl EditSession {
    /// Open `path`. A missing file gives an empty, clean buffer that is
    /// created on first save.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Io`] when the file exists but cannot be read
    /// or is not UTF-8.
    pub fn open(
        id: SessionId,
        path: impl Into<PathBuf>,
        settings: EditorSettings,
    ) -> Result<Self, EditorError> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(target: "editor.session", path = %path.display(), "new file");
            return Ok(Self::from_text(id, path, "", settings));
        }
        let loaded = io::load_file(&path)?;
        let mut session = Self::from_text(id, path, &loaded.text, settings);
        session.file_mode = loaded.mode;
        session.modified = loaded.modified;
        tracing::debug!(
            target: "editor.session",
            path = %session.path.display(),
            lines = session.buffer.line_count(),
            "opened"
        );
        Ok(session)
    }

    /// Session over in-memory text; nothing is read from `path`.
    pub fn from_text(
        id: SessionId,
        path: impl Into<PathBuf>,
        text: &str,
        settings: EditorSettings,
    ) -> Self {
        let buffer = Buffer::from_text(text);
        let mut highlighter = DocumentHighlighter::new(settings.highlight);
        highlighter.rebuild(&buffer);
        Self {
            id,
            path: path.into(),
            buffer,
            history: History::new(settings.history_limit),
            highlighter,
            settings,
            file_mode: DEFAULT_FILE_MODE,
            modified: None,
            dirty: false,
            revision: 0,
            mode: Mode::Normal,
            pending: None,
            clipboard: None,
            prompt: None,
            search: SearchState::default(),
            autosave_generation: 0,
            after_save: AfterSave::Nothing,
            viewport: Viewport::default(),
            diagnostics: DiagnosticSet::default(),
            status: None,
        }
    }

    // --- Accessors ---

    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub const fn highlighter(&self) -> &DocumentHighlighter {
        &self.highlighter
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn diagnostics(&self) -> &DiagnosticSet {
        &self.diagnostics
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub const fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn autosave_generation(&self) -> u64 {
        self.autosave_generation
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Take the status message, leaving none.
    pub fn take_status(&mut self) -> Option<Status> {
        self.status.take()
    }

    /// File name, with `*` appended when dirty.
    pub fn title(&self) -> String {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        if self.dirty { format!("{name}*") } else { name }
    }

    /// Set the text area size used for scrolling and paging.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport
            .resize(width, height, self.buffer.line_count());
        self.reveal_cursor();
    }

    // --- Key handling ---

    /// Feed one key press through the modal machine.
    pub fn handle_key(&mut self, key: KeyPress) -> Vec<Effect> {
        if self.mode == Mode::Normal
            && let Some(pending) = self.pending.take()
        {
            return self.complete_pending(pending, key);
        }
        if self.mode != Mode::Command {
            if let Some(c) = key.ctrl_char() {
                return self.handle_chord(c);
            }
            if key.modifiers.alt {
                match key.key {
                    Key::Up => self.goto_diagnostic(false),
                    Key::Down => self.goto_diagnostic(true),
                    _ => {}
                }
                return Vec::new();
            }
            if key.modifiers.shift && self.apply_motion(key.key, true) {
                return Vec::new();
            }
        }
        match self.mode {
            Mode::Normal => self.handle_normal(key.key),
            Mode::Insert => self.handle_insert(key.key),
            Mode::Command => self.handle_prompt(key.key),
        }
    }

    fn handle_chord(&mut self, c: char) -> Vec<Effect> {
        match c {
            's' => self.request_save(),
            'z' => self.undo(),
            'y' | 'r' => self.redo(),
            'c' => self.copy(),
            'x' => self.cut(),
            'v' => self.paste_at_cursor(),
            'f' => {
                self.open_prompt(PromptKind::Search);
                Vec::new()
            }
            'e' => self.launch_external_editor(),
            'w' | 'q' => vec![Effect::Close { force: false }],
            _ => Vec::new(),
        }
    }

    fn handle_normal(&mut self, key: Key) -> Vec<Effect> {
        if self.apply_motion(key, false) {
            return Vec::new();
        }
        let Key::Char(c) = key else {
            return match key {
                Key::Esc => {
                    self.buffer.clear_anchor();
                    Vec::new()
                }
                Key::Delete => self.delete_forward(),
                Key::Backspace => {
                    self.move_plain(Direction::Left);
                    Vec::new()
                }
                _ => Vec::new(),
            };
        };
        match c {
            'i' => self.enter_insert(),
            'a' => {
                let cursor = self.buffer.cursor();
                self.buffer.move_to(cursor.line, cursor.col + 1);
                self.enter_insert();
            }
            'o' => {
                self.buffer.move_end();
                let fx = self.edit(Buffer::split_line);
                self.enter_insert();
                return fx;
            }
            'O' => {
                self.buffer.move_home();
                let fx = self.edit(|buf| {
                    buf.split_line();
                    buf.move_cursor(Direction::Up);
                });
                self.enter_insert();
                return fx;
            }
            ':' => self.open_prompt(PromptKind::Command),
            '/' => self.open_prompt(PromptKind::Search),
            'h' => self.move_plain(Direction::Left),
            'j' => self.move_plain(Direction::Down),
            'k' => self.move_plain(Direction::Up),
            'l' => self.move_plain(Direction::Right),
            '0' => self.motion(false, Buffer::move_home),
            '$' => self.motion(false, Buffer::move_end),
            'w' => self.motion(false, Buffer::move_word_right),
            'b' => self.motion(false, Buffer::move_word_left),
            'G' => self.motion(false, Buffer::move_to_end),
            'x' => return self.delete_forward(),
            'p' => return self.paste_line_below(),
            'u' => return self.undo(),
            'n' => self.search_step(true),
            'N' => self.search_step(false),
            _ => {
                if let Some(pending) = Pending::from_char(c) {
                    self.pending = Some(pending);
                }
            }
        }
        Vec::new()
    }

    fn complete_pending(&mut self, pending: Pending, key: KeyPress) -> Vec<Effect> {
        let plain = !key.modifiers.ctrl && !key.modifiers.alt;
        if !plain || key.key != Key::Char(pending.key()) {
            tracing::trace!(target: "editor.session", ?pending, "pending cleared");
            return Vec::new();
        }
        match pending {
            Pending::Goto => {
                self.motion(false, Buffer::move_to_start);
                Vec::new()
            }
            Pending::Yank => {
                let line = self.buffer.line(self.buffer.cursor().line).unwrap_or_default();
                self.report(StatusLevel::Info, "Yanked line");
                self.store_clipboard(line)
            }
            Pending::Delete => self.cut_line(),
        }
    }

    fn handle_insert(&mut self, key: Key) -> Vec<Effect> {
        if self.apply_motion(key, false) {
            return Vec::new();
        }
        match key {
            Key::Esc => {
                self.mode = Mode::Normal;
                let cursor = self.buffer.cursor();
                if cursor.col > 0 {
                    self.buffer.move_to(cursor.line, cursor.col - 1);
                }
                self.buffer.clear_anchor();
                self.reveal_cursor();
                Vec::new()
            }
            Key::Char(c) => self.edit(|buf| buf.insert_char(c)),
            Key::Enter => self.edit(Buffer::split_line),
            Key::Backspace => {
                if self.buffer.can_delete_backward() {
                    self.edit(|buf| {
                        buf.delete_backward();
                    })
                } else {
                    Vec::new()
                }
            }
            Key::Delete => self.delete_forward(),
            Key::Tab => {
                let (tab_size, use_spaces) = (self.settings.tab_size, self.settings.use_spaces);
                self.edit(|buf| buf.indent(tab_size, use_spaces))
            }
            _ => Vec::new(),
        }
    }

    fn handle_prompt(&mut self, key: Key) -> Vec<Effect> {
        let Some(prompt) = self.prompt.as_mut() else {
            self.mode = Mode::Normal;
            return Vec::new();
        };
        match key {
            Key::Esc => self.close_prompt(),
            Key::Char(c) => prompt.text.push(c),
            Key::Backspace => {
                if prompt.text.pop().is_none() {
                    self.close_prompt();
                }
            }
            Key::Enter => {
                let Prompt { kind, text } = prompt.clone();
                self.close_prompt();
                return match kind {
                    PromptKind::Command => self.execute_command(&text),
                    PromptKind::Search => {
                        self.start_search(&text);
                        Vec::new()
                    }
                };
            }
            _ => {}
        }
        Vec::new()
    }

    /// Run a `:` command line.
    pub fn execute_command(&mut self, input: &str) -> Vec<Effect> {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }
        let (command, force) = match input.strip_suffix('!') {
            Some(rest) => (rest, true),
            None => (input, false),
        };
        tracing::debug!(target: "editor.session", command, force, "command");
        if let Ok(line) = command.parse::<usize>() {
            self.goto_location(line, 1);
            return Vec::new();
        }
        match command {
            "w" | "write" => self.request_save(),
            "q" | "quit" => {
                if self.dirty && !force {
                    self.report(StatusLevel::Warning, "Unsaved changes (use :q!)");
                    Vec::new()
                } else {
                    vec![Effect::Close { force }]
                }
            }
            "wq" | "x" | "xit" => self.save_then(AfterSave::Close),
            _ => {
                self.report_error(&EditorError::InvalidCommand(input.to_string()));
                Vec::new()
            }
        }
    }

    // --- Motions ---

    /// Arrow-style motions shared by Normal and Insert. With `extend` the
    /// selection grows from the current anchor.
    fn apply_motion(&mut self, key: Key, extend: bool) -> bool {
        let page = (self.viewport.height() as usize).max(1);
        match key {
            Key::Left => self.motion(extend, |b| b.move_cursor(Direction::Left)),
            Key::Right => self.motion(extend, |b| b.move_cursor(Direction::Right)),
            Key::Up => self.motion(extend, |b| b.move_cursor(Direction::Up)),
            Key::Down => self.motion(extend, |b| b.move_cursor(Direction::Down)),
            Key::Home => self.motion(extend, Buffer::move_home),
            Key::End => self.motion(extend, Buffer::move_end),
            Key::PageUp => self.motion(extend, |b| b.page_up(page)),
            Key::PageDown => self.motion(extend, |b| b.page_down(page)),
            _ => return false,
        }
        true
    }

    fn motion(&mut self, extend: bool, f: impl FnOnce(&mut Buffer)) {
        if extend {
            if self.buffer.anchor().is_none() {
                self.buffer.set_anchor();
            }
        } else {
            self.buffer.clear_anchor();
        }
        f(&mut self.buffer);
        self.reveal_cursor();
    }

    fn move_plain(&mut self, direction: Direction) {
        self.motion(false, |b| b.move_cursor(direction));
    }

    /// Jump to a 1-based position, clamped to the buffer; back to Normal.
    pub fn goto_location(&mut self, line: usize, col: usize) {
        self.mode = Mode::Normal;
        self.pending = None;
        self.prompt = None;
        self.motion(false, |b| {
            b.move_to(line.saturating_sub(1), col.saturating_sub(1));
        });
    }

    fn reveal_cursor(&mut self) {
        let cursor = self.buffer.cursor();
        self.viewport
            .reveal(cursor.line, cursor.col, self.buffer.line_count());
    }

    // --- Mode transitions ---

    fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.reveal_cursor();
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.mode = Mode::Command;
        self.pending = None;
        self.prompt = Some(Prompt {
            kind,
            text: String::new(),
        });
    }

    fn close_prompt(&mut self) {
        self.mode = Mode::Normal;
        self.prompt = None;
    }

    // --- Mutations ---

    /// Apply a buffer mutation: history snapshot first, then dirty,
    /// revision, highlights, search matches, scroll and autosave.
    fn edit(&mut self, f: impl FnOnce(&mut Buffer)) -> Vec<Effect> {
        let before_cursor = self.buffer.cursor();
        let before_lines = self.buffer.line_count();
        let (mut first, mut last) = (before_cursor.line, before_cursor.line);
        if let Some((start, end)) = self.buffer.selection_range() {
            first = first.min(start.line);
            last = last.max(end.line);
        }
        self.history.begin_mutation(self.snapshot());

        f(&mut self.buffer);

        let after_lines = self.buffer.line_count();
        first = first.min(self.buffer.cursor().line);
        let grew = after_lines.saturating_sub(before_lines);
        let shrank = before_lines.saturating_sub(after_lines);
        let removed = (last - first + 1).max(1 + shrank).min(before_lines);
        let inserted = removed + grew - shrank;
        let start = first.min(before_lines - removed);
        self.highlighter.refresh(
            &self.buffer,
            LineEdit {
                start,
                removed,
                inserted,
            },
        );
        self.after_change();
        self.schedule_autosave().into_iter().collect()
    }

    fn after_change(&mut self) {
        self.dirty = true;
        self.revision += 1;
        if self.search.is_active() {
            self.search.recompute(&self.buffer.lines());
        }
        self.reveal_cursor();
    }

    fn delete_forward(&mut self) -> Vec<Effect> {
        if !self.buffer.can_delete_forward() {
            return Vec::new();
        }
        self.edit(|buf| {
            buf.delete_forward();
        })
    }

    fn paste_line_below(&mut self) -> Vec<Effect> {
        let Some(text) = self.clipboard.clone() else {
            self.report_error(&EditorError::EmptyClipboard);
            return Vec::new();
        };
        let line = self.buffer.cursor().line;
        self.edit(|buf| buf.insert_line_below(line, &text))
    }

    fn paste_at_cursor(&mut self) -> Vec<Effect> {
        match self.clipboard.clone() {
            None => {
                self.report_error(&EditorError::EmptyClipboard);
                Vec::new()
            }
            Some(text) if text.is_empty() && !self.buffer.has_selection() => Vec::new(),
            Some(text) => self.edit(|buf| buf.insert_str(&text)),
        }
    }

    fn copy(&mut self) -> Vec<Effect> {
        let text = if self.buffer.has_selection() {
            self.buffer.selected_text()
        } else {
            self.buffer.line(self.buffer.cursor().line).unwrap_or_default()
        };
        self.report(StatusLevel::Info, "Copied");
        self.store_clipboard(text)
    }

    fn cut(&mut self) -> Vec<Effect> {
        if !self.buffer.has_selection() {
            return self.cut_line();
        }
        let text = self.buffer.selected_text();
        let mut fx = self.edit(|buf| {
            buf.delete_selection();
        });
        fx.extend(self.store_clipboard(text));
        fx
    }

    fn cut_line(&mut self) -> Vec<Effect> {
        let line = self.buffer.cursor().line;
        let text = self.buffer.line(line).unwrap_or_default();
        let mut fx = self.edit(|buf| {
            buf.delete_line(line);
        });
        fx.extend(self.store_clipboard(text));
        fx
    }

    fn store_clipboard(&mut self, text: String) -> Vec<Effect> {
        self.clipboard = Some(text.clone());
        vec![Effect::CopyToClipboard(text)]
    }

    // --- History ---

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            buffer: self.buffer.state(),
            dirty: self.dirty,
        }
    }

    /// Step back one mutation. Silent when there is nothing to undo.
    pub fn undo(&mut self) -> Vec<Effect> {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => self.apply_snapshot(previous),
            None => Vec::new(),
        }
    }

    /// Re-apply an undone mutation. Silent when there is nothing to redo.
    pub fn redo(&mut self) -> Vec<Effect> {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => self.apply_snapshot(next),
            None => Vec::new(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) -> Vec<Effect> {
        self.buffer.restore(snapshot.buffer);
        self.highlighter.rebuild(&self.buffer);
        self.after_change();
        self.dirty = snapshot.dirty;
        if self.dirty {
            self.schedule_autosave().into_iter().collect()
        } else {
            self.autosave_generation += 1;
            Vec::new()
        }
    }

    // --- Search ---

    fn start_search(&mut self, query: &str) {
        if query.is_empty() {
            self.search.clear();
            return;
        }
        self.search.set_query(query, &self.buffer.lines());
        self.search_step(true);
    }

    fn search_step(&mut self, forward: bool) {
        if !self.search.is_active() {
            return;
        }
        let cursor = self.buffer.cursor();
        // Step past the match under the cursor so `n` advances.
        let from = if forward {
            Position::new(cursor.line, cursor.col + 1)
        } else {
            cursor
        };
        match self.search.step(from, forward) {
            Some(found) => {
                self.motion(false, |b| b.move_to(found.line, found.start));
                if let Some((index, total)) = self.search.position() {
                    self.report(StatusLevel::Info, format!("Match {index}/{total}"));
                }
            }
            None => self.report_error(&EditorError::NoMatches),
        }
    }

    // --- Diagnostics ---

    pub fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = DiagnosticSet::new(diagnostics);
        tracing::debug!(
            target: "editor.session",
            count = self.diagnostics.len(),
            "diagnostics updated"
        );
    }

    /// Move to the next (or previous) diagnostic, wrapping, and show its
    /// message.
    pub fn goto_diagnostic(&mut self, forward: bool) {
        let line = self.buffer.cursor().line;
        let Some(found) = self.diagnostics.next_from(line, forward).cloned() else {
            self.report_error(&EditorError::NoDiagnostics);
            return;
        };
        self.goto_location(found.line, found.column);
        let level = match found.severity {
            Severity::Error => StatusLevel::Error,
            Severity::Warning => StatusLevel::Warning,
            Severity::Info => StatusLevel::Info,
        };
        self.report(level, found.message);
    }

    // --- Saving ---

    /// Request an explicit save.
    pub fn request_save(&mut self) -> Vec<Effect> {
        self.save_then(AfterSave::Nothing)
    }

    fn save_then(&mut self, after: AfterSave) -> Vec<Effect> {
        self.after_save = after;
        vec![Effect::Save(SaveRequest {
            path: self.path.clone(),
            text: self.buffer.full_text(),
            mode: self.file_mode,
            revision: self.revision,
        })]
    }

    /// Apply the result of a save started at `revision`.
    ///
    /// `dirty` is cleared only when no edits happened since.
    pub fn on_save_completed(
        &mut self,
        revision: u64,
        result: Result<Option<SystemTime>, EditorError>,
    ) -> Vec<Effect> {
        let after = std::mem::take(&mut self.after_save);
        let modified = match result {
            Ok(modified) => modified,
            Err(err) => {
                self.report_error(&err);
                return Vec::new();
            }
        };
        self.modified = modified;
        if revision == self.revision {
            self.dirty = false;
        }
        if let Err(err) = io::remove_autosave(&self.path) {
            tracing::warn!(target: "editor.session", error = %err, "failed to remove autosave");
        }
        tracing::debug!(target: "editor.session", revision, dirty = self.dirty, "saved");
        self.report(StatusLevel::Info, format!("Saved {}", self.path.display()));
        match after {
            AfterSave::Nothing => Vec::new(),
            AfterSave::Close if self.dirty => {
                self.report(StatusLevel::Warning, "Unsaved changes (use :q!)");
                Vec::new()
            }
            AfterSave::Close => vec![Effect::Close { force: false }],
            AfterSave::LaunchExternalEditor => self.external_edit_effect().into_iter().collect(),
        }
    }

    // --- Autosave ---

    fn schedule_autosave(&mut self) -> Option<Effect> {
        self.autosave_generation += 1;
        self.settings.autosave.then(|| Effect::ScheduleAutosave {
            generation: self.autosave_generation,
            delay: self.settings.autosave_delay,
        })
    }

    /// Timer callback; writes the sidecar only if `generation` is current.
    /// Returns whether a sidecar was written.
    pub fn on_autosave_timer(&mut self, generation: u64) -> bool {
        if generation != self.autosave_generation || !self.settings.autosave || !self.dirty {
            return false;
        }
        match io::write_autosave(&self.path, &self.buffer.full_text()) {
            Ok(sidecar) => {
                tracing::debug!(target: "editor.session", path = %sidecar.display(), "autosaved");
                true
            }
            Err(err) => {
                self.report_error(&err);
                false
            }
        }
    }

    // --- External editor ---

    fn launch_external_editor(&mut self) -> Vec<Effect> {
        if self.dirty {
            return self.save_then(AfterSave::LaunchExternalEditor);
        }
        self.external_edit_effect().into_iter().collect()
    }

    fn external_edit_effect(&mut self) -> Option<Effect> {
        let Some(command) = self.settings.external_editor.clone() else {
            self.report(StatusLevel::Error, "No external editor configured");
            return None;
        };
        Some(Effect::LaunchExternalEditor(ExternalEdit {
            command,
            path: self.path.clone(),
        }))
    }

    /// Called once the external editor exits; reloads if the file changed.
    pub fn on_external_editor_exited(&mut self) {
        let current = io::file_modified(&self.path);
        let changed = match (current, self.modified) {
            (Some(now), Some(before)) => now > before,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if changed {
            self.reload();
        }
    }

    /// Re-read the file from disk. On failure the buffer is kept and the
    /// error reported.
    pub fn reload(&mut self) {
        let loaded = match io::load_file(&self.path) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.report_error(&err);
                return;
            }
        };
        let cursor = self.buffer.cursor();
        self.buffer.replace_all(&loaded.text);
        self.buffer.move_to(cursor.line, cursor.col);
        self.file_mode = loaded.mode;
        self.modified = loaded.modified;
        self.history.clear();
        self.highlighter.rebuild(&self.buffer);
        if self.search.is_active() {
            self.search.recompute(&self.buffer.lines());
        }
        self.dirty = false;
        self.revision += 1;
        self.autosave_generation += 1;
        self.reveal_cursor();
        self.report(StatusLevel::Info, "Reloaded");
    }

    // --- Status ---

    fn report(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(Status {
            level,
            text: text.into(),
        });
    }

    fn report_error(&mut self, err: &EditorError) {
        if matches!(err, EditorError::Io { .. }) {
            tracing::warn!(target: "editor.session", error = %err, "io failure");
        }
        self.report(StatusLevel::Error, err.to_string());
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("cursor", &self.buffer.cursor())
            .finish_non_exhaustive()
    }
}
