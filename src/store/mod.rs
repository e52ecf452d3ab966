//! Host-side document store.
//!
//! The store is the single owner of what is on disk: the path of the open
//! file and the exact text last read from or written to it. The edit surface
//! never touches this state directly; it talks to the store through the
//! messages in [`crate::ipc`], handled by [`service`].

mod dialogs;
pub mod service;
pub mod shell;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use dialogs::{DialogKind, Dialogs};
pub use service::{StoreHandle, StoreService};

/// Errors raised by store operations.
///
/// A dismissed dialog is not an error; operations that consult a dialog
/// return `Ok(None)` instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a UTF-8 text file", .path.display())]
    NotText { path: PathBuf },
    #[error("failed to launch {program} for {}: {source}", .path.display())]
    Shell {
        program: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The file currently represented by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    path: Option<PathBuf>,
    persisted_content: String,
}

impl Document {
    /// Location on disk, or `None` if the document was never saved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Text as of the last successful open or save.
    pub fn persisted_content(&self) -> &str {
        &self.persisted_content
    }

    fn replace(&mut self, path: PathBuf, content: String) {
        self.path = Some(path);
        self.persisted_content = content;
    }
}

/// Owner of the [`Document`] and of every filesystem operation on it.
pub struct DocumentStore {
    document: Document,
    dialogs: Box<dyn Dialogs>,
    default_dir: Option<PathBuf>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("document", &self.document)
            .field("default_dir", &self.default_dir)
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a store holding an empty, never-saved document.
    pub fn new(dialogs: Box<dyn Dialogs>) -> Self {
        Self {
            document: Document::default(),
            dialogs,
            default_dir: None,
        }
    }

    /// Directory offered first by save and export dialogs.
    pub fn with_default_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.default_dir = dir;
        self
    }

    /// Current document, as last opened or saved.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.document.path()
    }

    /// Read `path` fully and make it the current document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file is missing or unreadable and
    /// [`StoreError::NotText`] if it is not UTF-8. The current document is
    /// left untouched on failure.
    pub fn open(&mut self, path: &Path) -> Result<(String, PathBuf), StoreError> {
        let content = read_text(path)?;
        let path = path.to_path_buf();
        self.document.replace(path.clone(), content.clone());
        info!(path = %path.display(), bytes = content.len(), "opened document");
        Ok((content, path))
    }

    /// Ask for a file to open, then open it.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::open`].
    pub fn show_open_dialog(&mut self) -> Result<Option<(String, PathBuf)>, StoreError> {
        let Some(path) = self
            .dialogs
            .choose_path(DialogKind::OpenMarkdown, self.default_dir.as_deref())
        else {
            debug!("open dialog dismissed");
            return Ok(None);
        };
        self.open(&path).map(Some)
    }

    /// Write `content` to the document's path, asking for one first if the
    /// document was never saved.
    ///
    /// Returns `Ok(None)` without writing anything when that dialog is
    /// dismissed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written; the
    /// previously persisted state is kept.
    pub fn save(&mut self, content: &str) -> Result<Option<PathBuf>, StoreError> {
        let path = match self.document.path() {
            Some(path) => path.to_path_buf(),
            None => {
                let Some(chosen) = self
                    .dialogs
                    .choose_path(DialogKind::SaveMarkdown, self.default_dir.as_deref())
                else {
                    debug!("save dialog dismissed");
                    return Ok(None);
                };
                DialogKind::SaveMarkdown.complete_path(chosen)
            }
        };
        write_text(&path, content)?;
        self.document.replace(path.clone(), content.to_string());
        info!(path = %path.display(), bytes = content.len(), "saved document");
        Ok(Some(path))
    }

    /// Write rendered markup to a freshly chosen destination.
    ///
    /// Never reuses or changes the document's own path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the destination cannot be written.
    pub fn export_rendered(&mut self, rendered: &str) -> Result<Option<PathBuf>, StoreError> {
        let Some(chosen) = self
            .dialogs
            .choose_path(DialogKind::ExportHtml, self.default_dir.as_deref())
        else {
            debug!("export dialog dismissed");
            return Ok(None);
        };
        let path = DialogKind::ExportHtml.complete_path(chosen);
        write_text(&path, rendered)?;
        info!(path = %path.display(), bytes = rendered.len(), "exported rendered markup");
        Ok(Some(path))
    }

    /// Whether `candidate` differs from the persisted content.
    pub fn is_dirty(&self, candidate: &str) -> bool {
        candidate != self.document.persisted_content
    }

    /// The persisted content, for replacing the edit buffer.
    pub fn revert(&self) -> String {
        self.document.persisted_content.clone()
    }

    /// Forget the current document without writing anything.
    pub fn new_file(&mut self) {
        self.document = Document::default();
        debug!("document reset");
    }

    /// Whether the file on disk no longer matches the persisted content.
    ///
    /// Used after an external change notification. The persisted content is
    /// not refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read back.
    pub fn changed_on_disk(&self) -> Result<bool, StoreError> {
        let Some(path) = self.document.path() else {
            return Ok(false);
        };
        let on_disk = read_text(path)?;
        Ok(on_disk != self.document.persisted_content)
    }
}

fn read_text(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| StoreError::NotText {
        path: path.to_path_buf(),
    })
}

fn write_text(path: &Path, content: &str) -> Result<(), StoreError> {
    fs::write(path, content).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
