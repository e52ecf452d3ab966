//! Firesale - a minimal terminal markdown editor.
//!
//! # Usage
//!
//! ```bash
//! firesale
//! firesale notes.md
//! firesale --watch --documents-dir ~/notes notes.md
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use firesale::app::App;
use firesale::config::{
    ConfigFlags, clear_config_flags, default_documents_dir, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};

/// A minimal markdown editor with a live preview pane
#[derive(Parser, Debug)]
#[command(name = "firesale", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Warn when the open file is changed by another program
    #[arg(short, long)]
    watch: bool,

    /// Start with the preview pane hidden
    #[arg(long)]
    no_preview: bool,

    /// Directory offered by save and export prompts
    #[arg(long, value_name = "DIR")]
    documents_dir: Option<PathBuf>,

    /// Write logs to a file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// The terminal belongs to the UI, so logs only go to an explicit file.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
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

    if let Some(log_file) = &effective.log_file {
        init_logging(log_file)?;
    }

    // Verify file exists
    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let documents_dir = effective
        .documents_dir
        .clone()
        .or_else(default_documents_dir);
    info!(
        file = ?cli.file,
        watch = effective.watch,
        documents_dir = ?documents_dir,
        "starting firesale"
    );

    // Run the application
    let mut app = App::new(cli.file)
        .with_watch(effective.watch)
        .with_preview_visible(!effective.no_preview)
        .with_documents_dir(documents_dir);

    app.run().context("Application error")
}
