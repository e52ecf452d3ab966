use std::path::{Path, PathBuf};

/// Which file-choice dialog the store needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    OpenMarkdown,
    SaveMarkdown,
    ExportHtml,
}

impl DialogKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::OpenMarkdown => "Open File",
            Self::SaveMarkdown => "Save File",
            Self::ExportHtml => "Export HTML",
        }
    }

    /// Extensions offered by the dialog's filter, preferred first.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::OpenMarkdown => &["md", "txt"],
            Self::SaveMarkdown => &["md"],
            Self::ExportHtml => &["html"],
        }
    }

    /// Append the preferred extension when the chosen path has none.
    pub fn complete_path(self, path: PathBuf) -> PathBuf {
        if path.extension().is_some() {
            return path;
        }
        match self.extensions().first() {
            Some(ext) => path.with_extension(ext),
            None => path,
        }
    }
}

/// File-choice dialogs consulted by the store.
///
/// `None` means the user dismissed the dialog.
pub trait Dialogs: Send {
    fn choose_path(&mut self, kind: DialogKind, default_dir: Option<&Path>) -> Option<PathBuf>;
}
