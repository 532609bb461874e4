use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::editor::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_TAB_SIZE: usize = 4;
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

/// Flags that can be saved as defaults and layered: global, local, CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_autosave: bool,
    pub use_tabs: bool,
    pub no_highlight: bool,
    pub perf: bool,
    pub tab_size: Option<usize>,
    pub autosave_delay: Option<u64>,
    pub theme: Option<ThemeMode>,
    pub external_editor: Option<String>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_autosave: self.no_autosave || other.no_autosave,
            use_tabs: self.use_tabs || other.use_tabs,
            no_highlight: self.no_highlight || other.no_highlight,
            perf: self.perf || other.perf,
            tab_size: other.tab_size.or(self.tab_size),
            autosave_delay: other.autosave_delay.or(self.autosave_delay),
            theme: other.theme.or(self.theme),
            external_editor: other
                .external_editor
                .clone()
                .or_else(|| self.external_editor.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

/// Editor behaviour resolved from flags and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub tab_size: usize,
    pub use_spaces: bool,
    pub autosave: bool,
    pub autosave_delay: Duration,
    pub highlight: bool,
    pub history_limit: usize,
    pub external_editor: Option<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            use_spaces: true,
            autosave: true,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            highlight: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            external_editor: None,
        }
    }
}

impl EditorSettings {
    /// Resolve flags; out-of-range values fall back to the defaults.
    ///
    /// Without a configured external editor, `$VISUAL` then `$EDITOR` is used.
    pub fn from_flags(flags: &ConfigFlags) -> Self {
        let tab_size = flags
            .tab_size
            .filter(|size| (1..=16).contains(size))
            .unwrap_or(DEFAULT_TAB_SIZE);
        let autosave_delay = flags
            .autosave_delay
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_AUTOSAVE_DELAY, Duration::from_secs);
        let external_editor = flags
            .external_editor
            .clone()
            .filter(|cmd| !cmd.trim().is_empty())
            .or_else(|| env_editor("VISUAL"))
            .or_else(|| env_editor("EDITOR"));
        Self {
            tab_size,
            use_spaces: !flags.use_tabs,
            autosave: !flags.no_autosave,
            autosave_delay,
            highlight: !flags.no_highlight,
            history_limit: DEFAULT_HISTORY_LIMIT,
            external_editor,
        }
    }
}

fn env_editor(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|cmd| !cmd.trim().is_empty())
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("codetab").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("codetab")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("codetab").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("codetab")
                .join("config");
        }
    }

    PathBuf::from(".codetabrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".codetabrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((name, value)) if !name.contains('=') => {
                vec![name.to_owned(), value.trim().to_owned()]
            }
            _ => vec![line.to_owned()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# codetab defaults (saved with --save)".to_string());
    if flags.no_autosave {
        lines.push("--no-autosave".to_string());
    }
    if flags.use_tabs {
        lines.push("--use-tabs".to_string());
    }
    if flags.no_highlight {
        lines.push("--no-highlight".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(size) = flags.tab_size {
        lines.push(format!("--tab-size {size}"));
    }
    if let Some(secs) = flags.autosave_delay {
        lines.push(format!("--autosave-delay {secs}"));
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(cmd) = &flags.external_editor {
        // Commands may contain spaces; the = form keeps them one token per line.
        lines.push(format!("--external-editor={cmd}"));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--tab-size" | "--autosave-delay" | "--theme" | "--external-editor" | "--debug-log"
        );
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).cloned()
        } else {
            inline_value
        };
        match name {
            "--no-autosave" => flags.no_autosave = true,
            "--use-tabs" => flags.use_tabs = true,
            "--no-highlight" => flags.no_highlight = true,
            "--perf" => flags.perf = true,
            "--tab-size" => flags.tab_size = value.and_then(|v| v.parse().ok()),
            "--autosave-delay" => flags.autosave_delay = value.and_then(|v| v.parse().ok()),
            "--theme" => flags.theme = value.as_deref().and_then(parse_theme),
            "--external-editor" => flags.external_editor = value,
            "--debug-log" => flags.debug_log = value.map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
