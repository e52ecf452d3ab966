use std::io::stdout;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, trace, warn};

use crate::app::{App, DialogReply, DialogRequest, Message, Model, PromptDialogs, update};
use crate::app::input::message_for_event;
use crate::ipc::{Event, Request};
use crate::store::{DocumentStore, StoreHandle, StoreService};

/// Quiet period before a change on disk is reported.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// How long to wait for terminal input while nothing needs drawing.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// The surface's end of the store connection.
pub(super) struct Session {
    pub(super) store: StoreHandle,
    /// Reply slot for the dialog currently shown as a prompt
    pub(super) pending_dialog: Option<DialogReply>,
}

impl Session {
    pub(super) const fn new(store: StoreHandle) -> Self {
        Self {
            store,
            pending_dialog: None,
        }
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the store thread cannot start, terminal
    /// initialization fails, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let (event_tx, event_rx) = mpsc::channel::<Event>();
        let (dialog_tx, dialog_rx) = mpsc::channel::<DialogRequest>();

        let store = DocumentStore::new(Box::new(PromptDialogs::new(dialog_tx)))
            .with_default_dir(self.documents_dir.clone());
        let (handle, join) = StoreService::new(store, event_tx)
            .with_watch(self.watch_enabled.then_some(WATCH_DEBOUNCE))
            .spawn()
            .context("Failed to start the document store")?;
        let mut session = Session::new(handle);

        // Initialize terminal
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; firesale requires an interactive terminal")?;
        let _ = execute!(stdout(), EnableBracketedPaste);
        let size = terminal.size()?;

        let mut model = Model::new((size.width, size.height));
        model.watch_enabled = self.watch_enabled;
        model.preview_visible = self.preview_visible;
        if let Some(path) = self.file_path.clone() {
            model = update(model, Message::OpenPath(path));
            session.handle_side_effects(&mut model);
        }

        // Main loop
        let result = Self::event_loop(&mut terminal, &mut model, &mut session, &event_rx, &dialog_rx);

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        // A store blocked on a dialog sees it dismissed once the reply slots
        // are gone; only then can it take the shutdown request.
        let Session {
            store,
            pending_dialog,
        } = session;
        drop(pending_dialog);
        drop(dialog_rx);
        store.send(Request::Shutdown);
        drop(store);
        if join.join().is_err() {
            warn!("document store thread panicked");
        }

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        session: &mut Session,
        events: &Receiver<Event>,
        dialogs: &Receiver<DialogRequest>,
    ) -> Result<()> {
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            for event in events.try_iter() {
                Self::apply(model, session, Message::Store(event));
                needs_render = true;
            }

            // One prompt at a time; further dialogs wait in the channel.
            if model.prompt.is_none()
                && session.pending_dialog.is_none()
                && let Ok(request) = dialogs.try_recv()
            {
                let (kind, default_dir, reply) = request.into_parts();
                debug!(?kind, "store asked for a path");
                session.pending_dialog = Some(reply);
                Self::apply(model, session, Message::PromptOpened { kind, default_dir });
                needs_render = true;
            }

            let poll = if needs_render { Duration::ZERO } else { IDLE_POLL };
            if event::poll(poll)? {
                if let Some(msg) = message_for_event(&event::read()?, model) {
                    Self::apply(model, session, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    if let Some(msg) = message_for_event(&event::read()?, model) {
                        Self::apply(model, session, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn apply(model: &mut Model, session: &mut Session, msg: Message) {
        trace!(?msg, "update");
        *model = update(std::mem::take(model), msg);
        session.handle_side_effects(model);
    }
}
