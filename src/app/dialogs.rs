//! Terminal-prompt implementation of the store's file dialogs.
//!
//! The store thread blocks in [`PromptDialogs::choose_path`] while the UI
//! thread shows a prompt and answers through the [`DialogReply`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};

use crate::store::{DialogKind, Dialogs};

/// A pending dialog, handed from the store thread to the UI thread.
#[derive(Debug)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub default_dir: Option<PathBuf>,
    reply: DialogReply,
}

impl DialogRequest {
    pub fn into_parts(self) -> (DialogKind, Option<PathBuf>, DialogReply) {
        (self.kind, self.default_dir, self.reply)
    }
}

/// Answer slot for one dialog. Dropping it without answering counts as a
/// dismissal.
#[derive(Debug)]
pub struct DialogReply(Sender<Option<PathBuf>>);

impl DialogReply {
    pub fn answer(self, path: Option<PathBuf>) {
        // The store may have shut down in the meantime.
        let _ = self.0.send(path);
    }
}

/// [`Dialogs`] backed by prompts drawn on the UI thread.
#[derive(Debug, Clone)]
pub struct PromptDialogs {
    requests: Sender<DialogRequest>,
}

impl PromptDialogs {
    pub const fn new(requests: Sender<DialogRequest>) -> Self {
        Self { requests }
    }
}

impl Dialogs for PromptDialogs {
    fn choose_path(&mut self, kind: DialogKind, default_dir: Option<&Path>) -> Option<PathBuf> {
        let (tx, rx) = mpsc::channel();
        let request = DialogRequest {
            kind,
            default_dir: default_dir.map(Path::to_path_buf),
            reply: DialogReply(tx),
        };
        self.requests.send(request).ok()?;
        rx.recv().ok().flatten()
    }
}

/// Turn typed prompt text into a path: `~/` expands to the home directory,
/// relative paths are taken from `default_dir` when one is set.
pub fn resolve_input(input: &str, default_dir: Option<&Path>) -> PathBuf {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    let path = PathBuf::from(input);
    match default_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}
