use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Message, Model, Prompt};
use crate::editor::Direction;

/// Lines moved by one PageUp/PageDown in the preview.
const PREVIEW_PAGE: usize = 10;

/// Map a terminal event to a message. Returns `None` for ignored input.
pub fn message_for_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(*key, model),
        Event::Paste(text) => {
            if model.prompt.is_some() {
                None
            } else {
                Some(Message::EditorInsertStr(text.clone()))
            }
        }
        Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
        _ => None,
    }
}

fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match &model.prompt {
        Some(Prompt::ConfirmRevert) => return confirm_key(key),
        Some(Prompt::Path { .. }) => return path_prompt_key(key),
        None => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('o') => Some(Message::OpenDialog),
            KeyCode::Char('s') => Some(Message::Save),
            KeyCode::Char('e') => Some(Message::Export),
            KeyCode::Char('r') => Some(Message::Revert),
            KeyCode::Char('n') => Some(Message::NewFile),
            KeyCode::Char('f') => Some(Message::ShowInFolder),
            KeyCode::Char('l') => Some(Message::OpenExternally),
            KeyCode::Char('y') => Some(Message::CopyHtml),
            KeyCode::Char('p') => Some(Message::TogglePreview),
            KeyCode::Char('q' | 'c') => Some(Message::Quit),
            KeyCode::Home => Some(Message::EditorMoveToStart),
            KeyCode::End => Some(Message::EditorMoveToEnd),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::EditorInsertChar(c))
        }
        KeyCode::Tab => Some(Message::EditorInsertStr("    ".to_string())),
        KeyCode::Enter => Some(Message::EditorSplitLine),
        KeyCode::Backspace => Some(Message::EditorDeleteBack),
        KeyCode::Delete => Some(Message::EditorDeleteForward),
        KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
        KeyCode::Home => Some(Message::EditorMoveHome),
        KeyCode::End => Some(Message::EditorMoveEnd),
        KeyCode::PageUp => Some(Message::PreviewScrollUp(PREVIEW_PAGE)),
        KeyCode::PageDown => Some(Message::PreviewScrollDown(PREVIEW_PAGE)),
        _ => None,
    }
}

fn confirm_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmRevert(true)),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Message::ConfirmRevert(false)),
        _ => None,
    }
}

fn path_prompt_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::PromptCancel),
        KeyCode::Enter => Some(Message::PromptSubmit),
        KeyCode::Backspace => Some(Message::PromptBackspace),
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            Some(Message::PromptInput(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DialogKind;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_plain_chars_insert_and_ctrl_chars_are_commands() {
        let model = Model::default();
        assert_eq!(
            message_for_event(&key(KeyCode::Char('s')), &model),
            Some(Message::EditorInsertChar('s'))
        );
        assert_eq!(message_for_event(&ctrl('s'), &model), Some(Message::Save));
        assert_eq!(message_for_event(&ctrl('r'), &model), Some(Message::Revert));
        assert_eq!(message_for_event(&ctrl('y'), &model), Some(Message::CopyHtml));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let model = Model::default();
        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(message_for_event(&Event::Key(release), &model), None);
    }

    #[test]
    fn test_paste_inserts_text() {
        let model = Model::default();
        assert_eq!(
            message_for_event(&Event::Paste("# hi".to_string()), &model),
            Some(Message::EditorInsertStr("# hi".to_string()))
        );
    }

    #[test]
    fn test_path_prompt_captures_typing() {
        let mut model = Model::default();
        model.prompt = Some(Prompt::Path {
            kind: DialogKind::SaveMarkdown,
            default_dir: None,
            input: String::new(),
        });
        assert_eq!(
            message_for_event(&key(KeyCode::Char('x')), &model),
            Some(Message::PromptInput('x'))
        );
        assert_eq!(message_for_event(&ctrl('s'), &model), None);
        assert_eq!(
            message_for_event(&key(KeyCode::Esc), &model),
            Some(Message::PromptCancel)
        );
    }

    #[test]
    fn test_confirm_prompt_takes_yes_or_no() {
        let mut model = Model::default();
        model.prompt = Some(Prompt::ConfirmRevert);
        assert_eq!(
            message_for_event(&key(KeyCode::Char('y')), &model),
            Some(Message::ConfirmRevert(true))
        );
        assert_eq!(
            message_for_event(&key(KeyCode::Esc), &model),
            Some(Message::ConfirmRevert(false))
        );
        assert_eq!(message_for_event(&key(KeyCode::Char('x')), &model), None);
    }
}
