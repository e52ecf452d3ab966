//! The edit surface: application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete surface state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! The surface never touches the filesystem. Everything it needs from disk
//! goes through the document store as an [`crate::ipc::Request`], queued by
//! `update` in the model's outbox and sent by the effects layer.

mod dialogs;
mod dirty;
mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use dialogs::{DialogReply, DialogRequest, PromptDialogs, resolve_input};
pub use dirty::DirtyTracker;
pub use input::message_for_event;
pub use model::{Affordances, Model, Prompt, REVERT_QUESTION, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    watch_enabled: bool,
    preview_visible: bool,
    documents_dir: Option<PathBuf>,
}

impl App {
    /// Create an application, optionally opening `file_path` at startup.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            preview_visible: true,
            documents_dir: None,
        }
    }

    /// Warn when the open file is changed by another program.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Set initial preview pane visibility.
    pub const fn with_preview_visible(mut self, visible: bool) -> Self {
        self.preview_visible = visible;
        self
    }

    /// Directory offered by save and export prompts.
    pub fn with_documents_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.documents_dir = dir;
        self
    }
}

#[cfg(test)]
mod tests;
