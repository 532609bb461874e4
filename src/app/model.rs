use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::EditorSettings;
use crate::editor::{EditSession, Effect, EditorError, SessionId, StatusLevel};
use crate::ui::style::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl From<StatusLevel> for ToastLevel {
    fn from(level: StatusLevel) -> Self {
        match level {
            StatusLevel::Info => Self::Info,
            StatusLevel::Warning => Self::Warning,
            StatusLevel::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Title and dirty flag of one tab, for the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabTitle {
    pub title: String,
    pub dirty: bool,
    pub active: bool,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Open sessions in tab order
    pub tabs: Vec<EditSession>,
    /// Index of the focused tab
    pub active: usize,
    next_id: u64,
    /// Settings new sessions are opened with
    pub settings: EditorSettings,
    pub theme: Theme,
    /// Terminal size (columns, rows)
    pub terminal_size: (u16, u16),
    /// Dirty session waiting for a discard confirmation
    pub close_confirmation: Option<SessionId>,
    /// Set after the first quit attempt with dirty tabs; a second quit proceeds
    pub quit_confirmed: bool,
    toast: Option<Toast>,
    /// Effects waiting for the side-effect handler
    pub(super) pending_effects: Vec<(SessionId, Effect)>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("tabs", &self.tabs.len())
            .field("active", &self.active)
            .field("close_confirmation", &self.close_confirmation)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(settings: EditorSettings, theme: Theme, terminal_size: (u16, u16)) -> Self {
        Self {
            settings,
            theme,
            terminal_size,
            ..Self::default()
        }
    }

    pub fn active_session(&self) -> Option<&EditSession> {
        self.tabs.get(self.active)
    }

    pub fn active_session_mut(&mut self) -> Option<&mut EditSession> {
        self.tabs.get_mut(self.active)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut EditSession> {
        self.tabs.iter_mut().find(|s| s.id() == id)
    }

    pub fn tab_index(&self, id: SessionId) -> Option<usize> {
        self.tabs.iter().position(|s| s.id() == id)
    }

    fn tab_for_path(&self, path: &Path) -> Option<usize> {
        self.tabs.iter().position(|s| same_file(s.path(), path))
    }

    /// Focus `path` if it is already open, otherwise open it in a new tab.
    ///
    /// # Errors
    ///
    /// Returns the load error; no tab is added in that case.
    pub fn open_file(&mut self, path: &Path) -> Result<SessionId, EditorError> {
        if let Some(idx) = self.tab_for_path(path) {
            self.active = idx;
            return Ok(self.tabs[idx].id());
        }
        self.next_id += 1;
        let id = SessionId(self.next_id);
        let session = EditSession::open(id, path, self.settings.clone())?;
        self.tabs.push(session);
        self.active = self.tabs.len() - 1;
        self.sync_viewport();
        tracing::debug!(target: "app", path = %path.display(), ?id, "tab opened");
        Ok(id)
    }

    /// Remove a session; quits when the last tab goes.
    pub(super) fn close_session(&mut self, id: SessionId) {
        let Some(idx) = self.tab_index(id) else {
            return;
        };
        self.tabs.remove(idx);
        if self.close_confirmation == Some(id) {
            self.close_confirmation = None;
        }
        if self.active > idx || self.active >= self.tabs.len() {
            self.active = self.active.saturating_sub(1);
        }
        tracing::debug!(target: "app", ?id, remaining = self.tabs.len(), "tab closed");
        if self.tabs.is_empty() {
            self.should_quit = true;
        }
    }

    pub fn tab_titles(&self) -> Vec<TabTitle> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(idx, s)| TabTitle {
                title: s.title(),
                dirty: s.is_dirty(),
                active: idx == self.active,
            })
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.tabs.iter().filter(|s| s.is_dirty()).count()
    }

    /// Give the active session the text area it is drawn into.
    pub(super) fn sync_viewport(&mut self) {
        let (width, height) = self.terminal_size;
        if let Some(session) = self.tabs.get_mut(self.active) {
            let (text_width, text_height) =
                crate::ui::text_area_size(width, height, session.buffer().line_count());
            session.resize(text_width, text_height);
        }
    }

    /// Move the active session's status message into a toast.
    pub(super) fn collect_status(&mut self) {
        let status = self.active_session_mut().and_then(EditSession::take_status);
        if let Some(status) = status {
            self.show_toast(status.level.into(), status.text);
        }
    }

    pub fn take_effects(&mut self) -> Vec<(SessionId, Effect)> {
        std::mem::take(&mut self.pending_effects)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            active: 0,
            next_id: 0,
            settings: EditorSettings::default(),
            theme: Theme::default(),
            terminal_size: (80, 24),
            close_confirmation: None,
            quit_confirmed: false,
            toast: None,
            pending_effects: Vec::new(),
            should_quit: false,
        }
    }
}
