use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::app::{Model, Prompt, ToastLevel, resolve_input};
use crate::editor::Direction;
use crate::ipc::{Event, Request};
use crate::render;
use crate::store::DialogKind;

/// All possible events and actions on the edit surface.
///
/// These represent user input, store replies and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert text at the cursor (paste)
    EditorInsertStr(String),
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Split line at cursor (Enter)
    EditorSplitLine,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    EditorMoveHome,
    EditorMoveEnd,
    EditorMoveToStart,
    EditorMoveToEnd,

    // Preview
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    TogglePreview,

    // Document
    /// Start a new, untitled document
    NewFile,
    /// Ask the store to show its open dialog
    OpenDialog,
    /// Open a known path
    OpenPath(PathBuf),
    Save,
    /// Render to HTML and export it
    Export,
    /// Discard edits, asking first if there are any
    Revert,
    ShowInFolder,
    OpenExternally,
    /// Copy the rendered HTML to the clipboard
    CopyHtml,

    /// A reply from the document store
    Store(Event),

    // Prompts
    /// The store is waiting for the user to pick a path
    PromptOpened {
        kind: DialogKind,
        default_dir: Option<PathBuf>,
    },
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,
    /// Answer to the revert question
    ConfirmRevert(bool),

    // Window
    /// Terminal resized
    Resize(u16, u16),
    // Application
    /// Quit the application
    Quit,
}

/// Update the model in response to a message.
///
/// This is the core state transition function. It takes ownership of the
/// current model and returns the new model. Store traffic is queued on the
/// model, never performed here.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset confirmation flags on any user action other than the confirmed one.
    let passive = matches!(msg, Message::Store(_) | Message::Resize(..));
    if !passive && msg != Message::Quit {
        model.quit_confirmed = false;
    }
    if !passive && msg != Message::NewFile {
        model.new_confirmed = false;
    }

    match msg {
        // Editor
        Message::EditorInsertChar(ch) => {
            model.buffer.insert_char(ch);
            on_content_changed(&mut model);
        }
        Message::EditorInsertStr(text) => {
            if !text.is_empty() {
                model.buffer.insert_str(&text);
                on_content_changed(&mut model);
            }
        }
        Message::EditorDeleteBack => {
            if model.buffer.delete_back() {
                on_content_changed(&mut model);
            }
        }
        Message::EditorDeleteForward => {
            if model.buffer.delete_forward() {
                on_content_changed(&mut model);
            }
        }
        Message::EditorSplitLine => {
            model.buffer.split_line();
            on_content_changed(&mut model);
        }
        Message::EditorMoveCursor(dir) => {
            model.buffer.move_cursor(dir);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveHome => {
            model.buffer.move_home();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveEnd => {
            model.buffer.move_end();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToStart => {
            model.buffer.move_to_start();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToEnd => {
            model.buffer.move_to_end();
            editor_ensure_cursor_visible(&mut model);
        }

        // Preview
        Message::PreviewScrollUp(n) => {
            model.preview_scroll_offset = model.preview_scroll_offset.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            let max = model.preview.len().saturating_sub(1);
            model.preview_scroll_offset = (model.preview_scroll_offset + n).min(max);
        }
        Message::TogglePreview => {
            model.preview_visible = !model.preview_visible;
        }

        // Document
        Message::NewFile => {
            if model.has_unsaved_changes() && !model.new_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+N again to discard them",
                );
                model.new_confirmed = true;
            } else {
                model.new_confirmed = false;
                model.buffer.set_text("");
                model.editor_scroll_offset = 0;
                model.preview_scroll_offset = 0;
                model.file_path = None;
                model.dirty = false;
                model.affordances = crate::app::Affordances::default();
                model.send(Request::NewFile);
                on_content_changed(&mut model);
            }
        }
        Message::OpenDialog => model.send(Request::ShowOpenDialog),
        Message::OpenPath(path) => model.send(Request::OpenFile { path }),
        Message::Save => {
            let content = model.buffer.text();
            model.send(Request::SaveFile { content });
        }
        Message::Export => {
            let html = render::to_html(&model.buffer.text());
            model.send(Request::ExportRendered { html });
        }
        Message::Revert => {
            let id = issue_dirty_check(&mut model);
            model.revert_probe = Some(id);
        }
        Message::ShowInFolder => request_reveal(&mut model, Request::ShowInFolder),
        Message::OpenExternally => request_reveal(&mut model, Request::OpenExternally),
        Message::CopyHtml => {
            model.clipboard = Some(render::to_html(&model.buffer.text()));
            model.show_toast(ToastLevel::Info, "Copied HTML to clipboard");
        }

        Message::Store(event) => on_store_event(&mut model, event),

        // Prompts
        Message::PromptOpened { kind, default_dir } => {
            model.prompt = Some(Prompt::Path {
                kind,
                default_dir,
                input: String::new(),
            });
        }
        Message::PromptInput(ch) => {
            if let Some(Prompt::Path { input, .. }) = &mut model.prompt {
                input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(Prompt::Path { input, .. }) = &mut model.prompt {
                input.pop();
            }
        }
        Message::PromptSubmit => match model.prompt.take() {
            Some(Prompt::Path {
                kind,
                default_dir,
                input,
            }) => {
                if input.trim().is_empty() {
                    // Nothing typed yet; keep asking.
                    model.prompt = Some(Prompt::Path {
                        kind,
                        default_dir,
                        input,
                    });
                } else {
                    model.dialog_answer = Some(Some(resolve_input(&input, default_dir.as_deref())));
                }
            }
            Some(Prompt::ConfirmRevert) => model.send(Request::Revert),
            None => {}
        },
        Message::PromptCancel => match model.prompt.take() {
            Some(Prompt::Path { .. }) => model.dialog_answer = Some(None),
            Some(Prompt::ConfirmRevert) | None => {}
        },
        Message::ConfirmRevert(confirmed) => {
            if model.prompt == Some(Prompt::ConfirmRevert) {
                model.prompt = None;
                if confirmed {
                    model.send(Request::Revert);
                }
            }
        }

        // Window
        Message::Resize(width, height) => {
            model.size = (width, height);
            model.refresh_preview();
            editor_ensure_cursor_visible(&mut model);
        }
        // Application
        Message::Quit => {
            if model.has_unsaved_changes() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

fn on_store_event(model: &mut Model, event: Event) {
    match event {
        Event::FileOpened { content, path } => {
            model.buffer.set_text(&content);
            model.editor_scroll_offset = 0;
            model.preview_scroll_offset = 0;
            model.dirty = false;
            model.affordances.save = false;
            model.affordances.revert = false;
            model.affordances.reveal = true;
            model.show_toast(ToastLevel::Info, format!("Opened {}", display_name(&path)));
            model.file_path = Some(path);
            on_content_changed(model);
        }
        Event::FileSaved { path } => {
            model.show_toast(ToastLevel::Info, format!("Saved {}", display_name(&path)));
            model.file_path = Some(path);
            model.affordances.reveal = true;
            // The buffer may have moved on since the save was queued.
            issue_dirty_check(model);
        }
        Event::Exported { path } => {
            model.show_toast(ToastLevel::Info, format!("Exported {}", path.display()));
        }
        Event::DirtyChecked { id, dirty } => {
            if !model.dirty_checks.accept(id) {
                trace!(id, latest = model.dirty_checks.latest(), "stale dirty check ignored");
                return;
            }
            model.dirty = dirty;
            model.affordances.save = dirty;
            model.affordances.revert = dirty;
            if model.revert_probe == Some(id) {
                model.revert_probe = None;
                if !dirty {
                    model.send(Request::Revert);
                } else if model.prompt.is_none() {
                    model.prompt = Some(Prompt::ConfirmRevert);
                }
            }
        }
        Event::Reverted { content } => {
            model.buffer.set_text(&content);
            model.editor_scroll_offset = 0;
            on_content_changed(model);
        }
        Event::Cleared => debug!("store cleared the document"),
        Event::ChangedOnDisk { path } => {
            model.show_toast(
                ToastLevel::Warning,
                format!("{} was changed by another program", display_name(&path)),
            );
        }
        Event::Failed { operation, message } => {
            model.show_toast(ToastLevel::Error, format!("{operation} failed: {message}"));
        }
    }
}

/// Re-render the preview and ask the store whether the new text is dirty.
fn on_content_changed(model: &mut Model) {
    editor_ensure_cursor_visible(model);
    model.refresh_preview();
    // A pending revert probe answered for older text; drop it.
    model.revert_probe = None;
    issue_dirty_check(model);
}

fn issue_dirty_check(model: &mut Model) -> u64 {
    let id = model.dirty_checks.issue();
    let content = model.buffer.text();
    model.send(Request::CheckDirty { id, content });
    id
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn request_reveal(model: &mut Model, request: Request) {
    if model.affordances.reveal {
        model.send(request);
    } else {
        model.show_toast(ToastLevel::Info, "Save the document first");
    }
}

/// Ensure the editor cursor line is visible in the viewport.
fn editor_ensure_cursor_visible(model: &mut Model) {
    let cursor_line = model.buffer.cursor().line;
    let visible_height = model.editor_height();
    if visible_height == 0 {
        model.editor_scroll_offset = cursor_line;
        return;
    }

    if cursor_line < model.editor_scroll_offset {
        model.editor_scroll_offset = cursor_line;
    } else if cursor_line >= model.editor_scroll_offset + visible_height {
        model.editor_scroll_offset = cursor_line + 1 - visible_height;
    }
}
