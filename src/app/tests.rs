use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use tempfile::tempdir;

use crate::ipc::{Event, Operation, Request};
use crate::store::testing::ScriptedDialogs;
use crate::store::{DialogKind, DocumentStore, StoreService};

use super::{Message, Model, Prompt, ToastLevel, update};

fn type_text(mut model: Model, text: &str) -> Model {
    for ch in text.chars() {
        model = update(model, Message::EditorInsertChar(ch));
    }
    model
}

fn reply(model: Model, event: Event) -> Model {
    update(model, Message::Store(event))
}

fn last_check_id(model: &mut Model) -> u64 {
    model
        .take_outbox()
        .into_iter()
        .rev()
        .find_map(|request| match request {
            Request::CheckDirty { id, .. } => Some(id),
            _ => None,
        })
        .expect("a dirty check was queued")
}

fn opened_model(content: &str) -> Model {
    let mut model = reply(
        Model::default(),
        Event::FileOpened {
            content: content.to_string(),
            path: PathBuf::from("/notes/today.md"),
        },
    );
    let id = last_check_id(&mut model);
    reply(model, Event::DirtyChecked { id, dirty: false })
}

/// Runs a real store in-process: queued requests are dispatched and the
/// replies fed back into `update` until nothing is left to send.
struct Loopback {
    service: StoreService,
    _events: Receiver<Event>,
}

impl Loopback {
    fn new(dialogs: &ScriptedDialogs) -> Self {
        let (tx, rx) = mpsc::channel();
        let store = DocumentStore::new(Box::new(dialogs.clone()));
        Self {
            service: StoreService::new(store, tx),
            _events: rx,
        }
    }

    fn settle(&mut self, mut model: Model) -> Model {
        loop {
            let requests = model.take_outbox();
            if requests.is_empty() {
                return model;
            }
            for request in requests {
                if let Some(event) = self.service.dispatch(request) {
                    model = update(model, Message::Store(event));
                }
            }
        }
    }
}

#[test]
fn test_each_edit_asks_the_store_with_current_text() {
    let mut model = type_text(Model::default(), "ab");
    let checks: Vec<Request> = model.take_outbox();
    assert_eq!(
        checks,
        vec![
            Request::CheckDirty {
                id: 1,
                content: "a".to_string()
            },
            Request::CheckDirty {
                id: 2,
                content: "ab".to_string()
            },
        ]
    );
}

#[test]
fn test_cursor_moves_do_not_ask_the_store() {
    let mut model = opened_model("hello");
    model = update(model, Message::EditorMoveEnd);
    model = update(model, Message::EditorMoveToStart);
    assert!(model.take_outbox().is_empty());
}

#[test]
fn test_backspace_at_start_does_not_ask_the_store() {
    let mut model = update(Model::default(), Message::EditorDeleteBack);
    assert!(model.take_outbox().is_empty());
}

#[test]
fn test_accepted_dirty_reply_marks_title_and_affordances() {
    let mut model = type_text(opened_model("hello"), "!");
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: true });

    assert!(model.dirty);
    assert_eq!(model.title(), "today.md (Edited)");
    assert!(model.affordances.save);
    assert!(model.affordances.revert);
    assert!(model.affordances.reveal);
}

#[test]
fn test_stale_dirty_reply_is_ignored() {
    let model = type_text(Model::default(), "ab");
    // The reply for "ab" overtakes the reply for "a".
    let model = reply(model, Event::DirtyChecked { id: 2, dirty: false });
    let model = reply(model, Event::DirtyChecked { id: 1, dirty: true });
    assert!(!model.dirty);
    assert_eq!(model.title(), "Untitled");
}

#[test]
fn test_reply_for_superseded_check_is_ignored_while_latest_pending() {
    let model = type_text(Model::default(), "ab");
    let model = reply(model, Event::DirtyChecked { id: 1, dirty: true });
    assert!(!model.dirty);
    assert!(model.dirty_checks.is_pending());
}

#[test]
fn test_file_opened_replaces_buffer_and_resets_affordances() {
    let mut model = type_text(Model::default(), "scratch");
    let id = last_check_id(&mut model);
    model = reply(model, Event::DirtyChecked { id, dirty: true });

    let mut model = reply(
        model,
        Event::FileOpened {
            content: "# Title\n\nbody".to_string(),
            path: PathBuf::from("/notes/a.md"),
        },
    );

    assert_eq!(model.buffer.text(), "# Title\n\nbody");
    assert_eq!(model.file_path, Some(PathBuf::from("/notes/a.md")));
    assert!(!model.dirty);
    assert!(!model.affordances.save);
    assert!(!model.affordances.revert);
    assert!(model.affordances.reveal);
    assert_eq!(model.preview[0].text, "# Title");
    // Older in-flight checks no longer count.
    let id = last_check_id(&mut model);
    assert!(id > 1);
}

#[test]
fn test_file_saved_rechecks_current_buffer() {
    let mut model = type_text(Model::default(), "draft");
    model.take_outbox();
    let mut model = reply(
        model,
        Event::FileSaved {
            path: PathBuf::from("/notes/draft.md"),
        },
    );
    assert_eq!(model.file_path, Some(PathBuf::from("/notes/draft.md")));
    assert!(model.affordances.reveal);
    let outbox = model.take_outbox();
    assert!(matches!(
        outbox.as_slice(),
        [Request::CheckDirty { content, .. }] if content == "draft"
    ));
}

#[test]
fn test_save_sends_buffer_when_untitled() {
    let mut model = type_text(Model::default(), "x");
    model.take_outbox();
    let mut model = update(model, Message::Save);
    assert_eq!(
        model.take_outbox(),
        vec![Request::SaveFile {
            content: "x".to_string()
        }]
    );
}

#[test]
fn test_save_of_clean_named_document_still_writes() {
    let mut model = update(opened_model("hello"), Message::Save);
    assert_eq!(
        model.take_outbox(),
        vec![Request::SaveFile {
            content: "hello".to_string()
        }]
    );
}

#[test]
fn test_save_right_after_typing_sends_the_edit() {
    // The dirty reply for the keystroke has not arrived yet.
    let model = update(opened_model("hello"), Message::EditorInsertChar('!'));
    let mut model = update(model, Message::Save);
    let outbox = model.take_outbox();
    assert!(outbox.contains(&Request::SaveFile {
        content: "!hello".to_string()
    }));
}

#[test]
fn test_export_sends_rendered_html() {
    let mut model = update(opened_model("# Hi"), Message::Export);
    let outbox = model.take_outbox();
    assert!(matches!(
        outbox.as_slice(),
        [Request::ExportRendered { html }] if html.contains("<h1>") && html.contains("Hi")
    ));
}

#[test]
fn test_revert_with_clean_buffer_reverts_without_asking() {
    let mut model = update(opened_model("hello"), Message::Revert);
    let id = last_check_id(&mut model);
    let mut model = reply(model, Event::DirtyChecked { id, dirty: false });
    assert_eq!(model.prompt, None);
    assert_eq!(model.take_outbox(), vec![Request::Revert]);
}

#[test]
fn test_revert_with_dirty_buffer_asks_first() {
    let mut model = type_text(opened_model("hello"), "!");
    model.take_outbox();
    let mut model = update(model, Message::Revert);
    let id = last_check_id(&mut model);
    let mut model = reply(model, Event::DirtyChecked { id, dirty: true });
    assert_eq!(model.prompt, Some(Prompt::ConfirmRevert));
    assert!(model.take_outbox().is_empty());

    let mut model = update(model, Message::ConfirmRevert(true));
    assert_eq!(model.prompt, None);
    assert_eq!(model.take_outbox(), vec![Request::Revert]);
}

#[test]
fn test_declined_revert_keeps_edits() {
    let mut model = type_text(opened_model("hello"), "!");
    model.take_outbox();
    let mut model = update(model, Message::Revert);
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: true });

    let mut model = update(model, Message::ConfirmRevert(false));
    assert_eq!(model.prompt, None);
    assert!(model.take_outbox().is_empty());
    assert_eq!(model.buffer.text(), "!hello");
}

#[test]
fn test_keystroke_after_revert_request_cancels_it() {
    let mut model = update(opened_model("hello"), Message::Revert);
    let revert_check = last_check_id(&mut model);
    let mut model = update(model, Message::EditorInsertChar('x'));
    model.take_outbox();

    let mut model = reply(model, Event::DirtyChecked { id: revert_check, dirty: false });
    assert_eq!(model.prompt, None);
    assert!(model.take_outbox().is_empty());
}

#[test]
fn test_reverted_replaces_buffer_and_rechecks() {
    let mut model = type_text(opened_model("hello"), "zz");
    model.take_outbox();
    let mut model = reply(
        model,
        Event::Reverted {
            content: "hello".to_string(),
        },
    );
    assert_eq!(model.buffer.text(), "hello");
    let outbox = model.take_outbox();
    assert!(matches!(
        outbox.as_slice(),
        [Request::CheckDirty { content, .. }] if content == "hello"
    ));
}

#[test]
fn test_new_file_clears_everything() {
    let mut model = update(opened_model("hello"), Message::NewFile);
    assert_eq!(model.buffer.text(), "");
    assert!(model.preview.is_empty());
    assert_eq!(model.file_path, None);
    assert_eq!(model.affordances, super::Affordances::default());
    let outbox = model.take_outbox();
    assert_eq!(outbox[0], Request::NewFile);
    assert_eq!(model.title(), "Untitled");
}

#[test]
fn test_new_file_with_unsaved_changes_needs_second_press() {
    let mut model = type_text(opened_model("hello"), "!");
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: true });

    let mut model = update(model, Message::NewFile);
    assert!(model.take_outbox().is_empty());
    assert_eq!(model.buffer.text(), "!hello");

    let mut model = update(model, Message::NewFile);
    assert_eq!(model.take_outbox()[0], Request::NewFile);
    assert_eq!(model.buffer.text(), "");
}

#[test]
fn test_quit_with_unsaved_changes_needs_second_press() {
    let mut model = type_text(Model::default(), "x");
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: true });

    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert_eq!(model.active_toast().map(|(_, l)| l), Some(ToastLevel::Warning));

    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_confirmation_resets_after_other_input() {
    let mut model = type_text(Model::default(), "x");
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: true });

    let model = update(model, Message::Quit);
    let model = update(model, Message::EditorMoveHome);
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

#[test]
fn test_quit_while_dirty_check_is_unanswered_asks_first() {
    let model = update(opened_model("hello"), Message::EditorInsertChar('!'));
    assert!(model.dirty_checks.is_pending());

    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert_eq!(model.buffer.text(), "!hello");
    assert_eq!(model.active_toast().map(|(_, l)| l), Some(ToastLevel::Warning));
}

#[test]
fn test_new_file_while_dirty_check_is_unanswered_asks_first() {
    let mut model = update(opened_model("hello"), Message::EditorInsertChar('!'));
    model.take_outbox();

    let mut model = update(model, Message::NewFile);
    assert!(model.take_outbox().is_empty());
    assert_eq!(model.buffer.text(), "!hello");
    assert_eq!(model.file_path, Some(PathBuf::from("/notes/today.md")));
}

#[test]
fn test_quit_after_clean_reply_is_immediate() {
    let mut model = update(opened_model("hello"), Message::EditorInsertChar('!'));
    let id = last_check_id(&mut model);
    let model = reply(model, Event::DirtyChecked { id, dirty: false });
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_clean_quit_is_immediate() {
    let model = update(Model::default(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_failure_becomes_error_toast() {
    let model = reply(
        Model::default(),
        Event::Failed {
            operation: Operation::Save,
            message: "permission denied".to_string(),
        },
    );
    assert_eq!(
        model.active_toast(),
        Some(("Save failed: permission denied", ToastLevel::Error))
    );
}

#[test]
fn test_changed_on_disk_warns() {
    let model = reply(
        opened_model("hello"),
        Event::ChangedOnDisk {
            path: PathBuf::from("/notes/today.md"),
        },
    );
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);
    assert!(message.contains("today.md"));
}

#[test]
fn test_reveal_needs_a_saved_document() {
    let mut model = update(Model::default(), Message::ShowInFolder);
    assert!(model.take_outbox().is_empty());

    let mut model = update(opened_model("x"), Message::OpenExternally);
    assert_eq!(model.take_outbox(), vec![Request::OpenExternally]);
}

#[test]
fn test_copy_html_fills_clipboard() {
    let mut model = update(opened_model("**bold**"), Message::CopyHtml);
    let html = model.take_clipboard().unwrap();
    assert!(html.contains("<strong>bold</strong>"));
}

#[test]
fn test_path_prompt_submit_resolves_against_default_dir() {
    let model = update(
        Model::default(),
        Message::PromptOpened {
            kind: DialogKind::SaveMarkdown,
            default_dir: Some(PathBuf::from("/docs")),
        },
    );
    let model = "notes.m".chars().fold(model, |m, c| update(m, Message::PromptInput(c)));
    let model = update(model, Message::PromptBackspace);
    let mut model = update(model, Message::PromptSubmit);

    assert_eq!(model.prompt, None);
    assert_eq!(
        model.take_dialog_answer(),
        Some(Some(PathBuf::from("/docs/notes.")))
    );
}

#[test]
fn test_empty_path_prompt_stays_open() {
    let model = update(
        Model::default(),
        Message::PromptOpened {
            kind: DialogKind::OpenMarkdown,
            default_dir: None,
        },
    );
    let mut model = update(model, Message::PromptSubmit);
    assert!(matches!(model.prompt, Some(Prompt::Path { .. })));
    assert_eq!(model.take_dialog_answer(), None);
}

#[test]
fn test_cancelled_path_prompt_dismisses_dialog() {
    let model = update(
        Model::default(),
        Message::PromptOpened {
            kind: DialogKind::ExportHtml,
            default_dir: None,
        },
    );
    let mut model = update(model, Message::PromptCancel);
    assert_eq!(model.prompt, None);
    assert_eq!(model.take_dialog_answer(), Some(None));
}

#[test]
fn test_preview_scroll_is_clamped() {
    let model = opened_model("a\n\nb\n\nc");
    let model = update(model, Message::PreviewScrollDown(100));
    assert_eq!(model.preview_scroll_offset, model.preview.len() - 1);
    let model = update(model, Message::PreviewScrollUp(100));
    assert_eq!(model.preview_scroll_offset, 0);
}

#[test]
fn test_editor_scrolls_to_follow_cursor() {
    let mut model = Model::new((80, 6));
    model = reply(
        model,
        Event::FileOpened {
            content: "1\n2\n3\n4\n5\n6\n7\n8\n9".to_string(),
            path: PathBuf::from("n.md"),
        },
    );
    model = update(model, Message::EditorMoveToEnd);
    assert_eq!(model.editor_scroll_offset, 9 - 5);
    model = update(model, Message::EditorMoveToStart);
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_resize_rewraps_preview() {
    let model = opened_model("alpha beta gamma delta epsilon");
    assert_eq!(model.preview.len(), 1);
    let model = update(model, Message::Resize(24, 10));
    assert!(model.preview.len() > 1);
}

#[test]
fn test_open_edit_save_round_trip_against_real_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    std::fs::write(&path, "hello").unwrap();
    let mut store = Loopback::new(&ScriptedDialogs::default());

    let model = store.settle(update(Model::default(), Message::OpenPath(path.clone())));
    assert_eq!(model.buffer.text(), "hello");
    assert!(!model.dirty);

    let model = store.settle(update(model, Message::EditorMoveEnd));
    let model = store.settle(type_text(model, " world"));
    assert!(model.dirty);
    assert_eq!(model.title(), "doc.md (Edited)");

    let model = store.settle(update(model, Message::Save));
    assert!(!model.dirty);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
}

#[test]
fn test_untitled_save_and_revert_against_real_store() {
    let dir = tempdir().unwrap();
    let chosen = dir.path().join("fresh");
    let dialogs = ScriptedDialogs::answering([Some(chosen.clone())]);
    let mut store = Loopback::new(&dialogs);

    let model = store.settle(type_text(Model::default(), "# Fresh"));
    assert!(model.dirty);
    let model = store.settle(update(model, Message::Save));
    assert_eq!(model.file_path, Some(chosen.with_extension("md")));
    assert!(!model.dirty);

    let model = store.settle(type_text(model, "zz"));
    assert!(model.dirty);
    let model = store.settle(update(model, Message::Revert));
    assert_eq!(model.prompt, Some(Prompt::ConfirmRevert));
    let model = store.settle(update(model, Message::ConfirmRevert(true)));
    assert_eq!(model.buffer.text(), "# Fresh");
    assert!(!model.dirty);
    assert_eq!(dialogs.asked(), vec![DialogKind::SaveMarkdown]);
}

#[test]
fn test_dismissed_save_dialog_leaves_surface_dirty() {
    let mut store = Loopback::new(&ScriptedDialogs::answering([None]));
    let model = store.settle(type_text(Model::default(), "draft"));
    let model = store.settle(update(model, Message::Save));
    assert!(model.dirty);
    assert_eq!(model.file_path, None);
}
