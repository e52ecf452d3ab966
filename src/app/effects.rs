use std::io::{Write, stdout};

use base64::Engine;
use tracing::{debug, warn};

use crate::app::event_loop::Session;
use crate::app::{Model, ToastLevel};

impl Session {
    /// Carry out what `update` queued on the model: store requests, a dialog
    /// answer and clipboard writes.
    pub(super) fn handle_side_effects(&mut self, model: &mut Model) {
        for request in model.take_outbox() {
            if !self.store.send(request) {
                warn!("document store has stopped; request dropped");
                model.show_toast(ToastLevel::Error, "Document store stopped");
                break;
            }
        }

        if let Some(answer) = model.take_dialog_answer() {
            match self.pending_dialog.take() {
                Some(reply) => reply.answer(answer),
                None => debug!("prompt answered with no dialog pending"),
            }
        }

        if let Some(text) = model.take_clipboard()
            && let Err(err) = copy_to_clipboard(&text)
        {
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
