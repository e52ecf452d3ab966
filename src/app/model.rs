use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::editor::EditorBuffer;
use crate::ipc::Request;
use crate::render::{self, PreviewLine};
use crate::store::DialogKind;

use super::DirtyTracker;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which document actions are currently offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    pub save: bool,
    pub revert: bool,
    /// Show in folder / open externally. Needs a path on disk.
    pub reveal: bool,
}

/// A modal prompt drawn over the panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// The store is waiting for a path.
    Path {
        kind: DialogKind,
        default_dir: Option<PathBuf>,
        input: String,
    },
    /// Reverting would discard edits.
    ConfirmRevert,
}

pub const REVERT_QUESTION: &str = "You have unsaved changes. Are you sure you want to revert?";

/// The complete surface state.
///
/// All state lives here; the document itself does not. The persisted text and
/// path are owned by the store and only mirrored through replies.
#[derive(Debug)]
pub struct Model {
    /// Text being edited
    pub buffer: EditorBuffer,
    /// First buffer line shown in the editor pane
    pub editor_scroll_offset: usize,
    /// Rendered preview of `buffer`
    pub preview: Vec<PreviewLine>,
    /// First preview line shown
    pub preview_scroll_offset: usize,
    pub preview_visible: bool,
    /// Path of the open document as last reported by the store
    pub file_path: Option<PathBuf>,
    /// Latest accepted dirty status
    pub dirty: bool,
    pub affordances: Affordances,
    pub dirty_checks: DirtyTracker,
    /// Id of a dirty check that decides whether a revert needs confirmation
    pub(super) revert_probe: Option<u64>,
    pub prompt: Option<Prompt>,
    /// Whether the store is watching the open file
    pub watch_enabled: bool,
    /// Terminal size (columns, rows)
    pub size: (u16, u16),
    pub should_quit: bool,
    pub(super) quit_confirmed: bool,
    pub(super) new_confirmed: bool,
    /// Requests for the store, drained by the effects layer
    pub(super) outbox: Vec<Request>,
    /// Text to place on the system clipboard, drained by the effects layer
    pub(super) clipboard: Option<String>,
    /// Answer for the store's pending path dialog (`None` inside = dismissed)
    pub(super) dialog_answer: Option<Option<PathBuf>>,
    toast: Option<Toast>,
}

impl Model {
    pub fn new(size: (u16, u16)) -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            editor_scroll_offset: 0,
            preview: Vec::new(),
            preview_scroll_offset: 0,
            preview_visible: true,
            file_path: None,
            dirty: false,
            affordances: Affordances::default(),
            dirty_checks: DirtyTracker::default(),
            revert_probe: None,
            prompt: None,
            watch_enabled: false,
            size,
            should_quit: false,
            quit_confirmed: false,
            new_confirmed: false,
            outbox: Vec::new(),
            clipboard: None,
            dialog_answer: None,
            toast: None,
        }
    }

    /// Window title: file name (or "Untitled"), with "(Edited)" while dirty.
    pub fn title(&self) -> String {
        let name = self
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "Untitled".to_string(), |n| n.to_string_lossy().into_owned());
        if self.dirty {
            format!("{name} (Edited)")
        } else {
            name
        }
    }

    /// Rows available to the editor pane.
    /// True when the last accepted check said dirty, or when the buffer has
    /// changed since and the store has not answered yet.
    pub const fn has_unsaved_changes(&self) -> bool {
        self.dirty || self.dirty_checks.is_pending()
    }

    pub const fn editor_height(&self) -> usize {
        self.size.1.saturating_sub(1) as usize
    }

    /// Text width of the preview pane, matching the UI layout.
    pub const fn preview_width(&self) -> u16 {
        crate::ui::preview_text_width(self.size.0)
    }

    pub(super) fn refresh_preview(&mut self) {
        self.preview = render::preview(&self.buffer.text(), self.preview_width());
        let max = self.preview.len().saturating_sub(1);
        self.preview_scroll_offset = self.preview_scroll_offset.min(max);
    }

    pub(super) fn send(&mut self, request: Request) {
        self.outbox.push(request);
    }

    /// Take the queued store requests.
    pub fn take_outbox(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub(super) fn take_clipboard(&mut self) -> Option<String> {
        self.clipboard.take()
    }

    pub(super) fn take_dialog_answer(&mut self) -> Option<Option<PathBuf>> {
        self.dialog_answer.take()
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
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

impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}
