//! Messages exchanged between the edit surface and the document store.
//!
//! Both enums serialize with a kebab-case `type` tag (`open-file`,
//! `save-file`, `check-dirty`, ...) so the channel contract can be logged or
//! moved onto a real transport without renaming anything.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Surface → store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    /// Read a known path and make it the current document.
    OpenFile { path: PathBuf },
    /// Ask the user for a file, then open it.
    ShowOpenDialog,
    /// Persist the buffer (fire-and-forget).
    SaveFile { content: String },
    /// Write rendered markup to a user-chosen file.
    ExportRendered { html: String },
    /// Compare `content` with the persisted text. `id` is echoed back.
    CheckDirty { id: u64, content: String },
    /// Push the persisted text back to the surface.
    Revert,
    /// Forget the current document.
    NewFile,
    ShowInFolder,
    OpenExternally,
    /// Stop the store thread.
    Shutdown,
}

/// Store → surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    FileOpened { content: String, path: PathBuf },
    FileSaved { path: PathBuf },
    Exported { path: PathBuf },
    DirtyChecked { id: u64, dirty: bool },
    Reverted { content: String },
    Cleared,
    /// The open file was modified by someone else.
    ChangedOnDisk { path: PathBuf },
    Failed { operation: Operation, message: String },
}

/// Store operation named in a failure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Open,
    Save,
    Export,
    ShowInFolder,
    OpenExternally,
    Watch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "Open",
            Self::Save => "Save",
            Self::Export => "Export",
            Self::ShowInFolder => "Show in folder",
            Self::OpenExternally => "Open externally",
            Self::Watch => "Watch",
        };
        f.write_str(label)
    }
}

/// JSON form of a message, for tracing.
pub fn to_json<T: Serialize>(message: &T) -> String {
    serde_json::to_string(message).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}
