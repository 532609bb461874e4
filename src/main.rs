//! Codetab - A tabbed terminal source-code editor.
//!
//! # Usage
//!
//! ```bash
//! codetab main.lang
//! codetab src/lib.lang:42:7 src/util.lang
//! codetab --tab-size 2 --use-tabs main.lang
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use codetab::app::App;
use codetab::config::{
    ConfigFlags, EditorSettings, ThemeMode, clear_config_flags, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use codetab::editor::io::parse_location;
use codetab::perf;

/// A tabbed terminal source-code editor
#[derive(Parser, Debug)]
#[command(name = "codetab", version, about, long_about = None)]
struct Cli {
    /// Files to open, each optionally suffixed with :LINE or :LINE:COL
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,

    /// Line to place the cursor on in the first file (1-based)
    #[arg(long, value_name = "N")]
    line: Option<usize>,

    /// Column to place the cursor on in the first file (1-based)
    #[arg(long, value_name = "N")]
    col: Option<usize>,

    /// Columns per indentation level
    #[arg(long, value_name = "N")]
    tab_size: Option<usize>,

    /// Indent with tab characters instead of spaces
    #[arg(long)]
    use_tabs: bool,

    /// Disable writing autosave sidecar files
    #[arg(long)]
    no_autosave: bool,

    /// Seconds of inactivity before an autosave
    #[arg(long, value_name = "SECS")]
    autosave_delay: Option<u64>,

    /// Disable syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Force the color palette background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Command used by Ctrl+E to edit the file externally
    #[arg(long, value_name = "CMD")]
    external_editor: Option<String>,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write log events to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(debug_log: Option<&PathBuf>, perf: bool) -> Result<()> {
    let filter = perf::env_filter(perf).context("Invalid log filter")?;
    match debug_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create debug log {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.debug_log.as_ref(), effective.perf)?;
    perf::set_enabled(effective.perf);
    tracing::debug!(target: "app", ?effective, "configuration loaded");

    let mut files = cli
        .files
        .iter()
        .map(|arg| parse_location(arg).with_context(|| format!("Invalid location: {arg}")))
        .collect::<Result<Vec<_>>>()?;
    if let Some(first) = files.first_mut() {
        if cli.line.is_some() {
            first.line = cli.line;
        }
        if cli.col.is_some() {
            first.col = cli.col;
        }
    }

    let mut app = App::new(files)
        .with_settings(EditorSettings::from_flags(&effective))
        .with_theme_mode(effective.theme.unwrap_or(ThemeMode::Auto));

    app.run().context("Application error")
}
