//! The store thread.
//!
//! Requests are handled one at a time, in arrival order. Replies are pushed
//! onto the surface's event channel; fire-and-forget requests only reply on
//! success or failure, never on a dismissed dialog.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::{DocumentStore, StoreError, shell};
use crate::ipc::{self, Event, Operation, Request};
use crate::watcher::FileWatcher;

/// How long the loop waits for a request before polling the watcher.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sending half of the store's request channel.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: Sender<Request>,
}

impl StoreHandle {
    #[cfg(test)]
    pub(crate) const fn from_sender(tx: Sender<Request>) -> Self {
        Self { tx }
    }

    /// Queue a request. Returns `false` once the store thread has stopped.
    pub fn send(&self, request: Request) -> bool {
        trace!(json = %ipc::to_json(&request), "surface -> store");
        self.tx.send(request).is_ok()
    }
}

/// Document store plus the plumbing that connects it to the surface.
pub struct StoreService {
    store: DocumentStore,
    events: Sender<Event>,
    watch_debounce: Option<Duration>,
    watcher: Option<FileWatcher>,
}

impl StoreService {
    pub fn new(store: DocumentStore, events: Sender<Event>) -> Self {
        Self {
            store,
            events,
            watch_debounce: None,
            watcher: None,
        }
    }

    /// Watch the open file for outside modification.
    pub const fn with_watch(mut self, debounce: Option<Duration>) -> Self {
        self.watch_debounce = debounce;
        self
    }

    /// Start the store thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<(StoreHandle, JoinHandle<()>)> {
        let (tx, rx) = mpsc::channel();
        let join = thread::Builder::new()
            .name("document-store".to_string())
            .spawn(move || self.run(&rx))?;
        Ok((StoreHandle { tx }, join))
    }

    fn run(mut self, rx: &Receiver<Request>) {
        debug!("document store started");
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Request::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(request) => {
                    if let Some(event) = self.dispatch(request)
                        && !self.emit(event)
                    {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
            if let Some(event) = self.poll_watcher()
                && !self.emit(event)
            {
                break;
            }
        }
        debug!("document store stopped");
    }

    fn emit(&self, event: Event) -> bool {
        trace!(json = %ipc::to_json(&event), "store -> surface");
        self.events.send(event).is_ok()
    }

    /// Handle one request and produce the reply, if any.
    pub(crate) fn dispatch(&mut self, request: Request) -> Option<Event> {
        match request {
            Request::OpenFile { path } => match self.store.open(&path) {
                Ok((content, path)) => Some(self.opened(content, path)),
                Err(err) => Some(failed(Operation::Open, &err)),
            },
            Request::ShowOpenDialog => match self.store.show_open_dialog() {
                Ok(Some((content, path))) => Some(self.opened(content, path)),
                Ok(None) => None,
                Err(err) => Some(failed(Operation::Open, &err)),
            },
            Request::SaveFile { content } => match self.store.save(&content) {
                Ok(Some(path)) => {
                    self.rewatch();
                    Some(Event::FileSaved { path })
                }
                Ok(None) => None,
                Err(err) => Some(failed(Operation::Save, &err)),
            },
            Request::ExportRendered { html } => match self.store.export_rendered(&html) {
                Ok(Some(path)) => Some(Event::Exported { path }),
                Ok(None) => None,
                Err(err) => Some(failed(Operation::Export, &err)),
            },
            Request::CheckDirty { id, content } => Some(Event::DirtyChecked {
                id,
                dirty: self.store.is_dirty(&content),
            }),
            Request::Revert => Some(Event::Reverted {
                content: self.store.revert(),
            }),
            Request::NewFile => {
                self.store.new_file();
                self.watcher = None;
                Some(Event::Cleared)
            }
            Request::ShowInFolder => {
                let path = self.store.path()?.to_path_buf();
                shell::show_in_folder(&path)
                    .err()
                    .map(|err| failed(Operation::ShowInFolder, &err))
            }
            Request::OpenExternally => {
                let path = self.store.path()?.to_path_buf();
                shell::open_externally(&path)
                    .err()
                    .map(|err| failed(Operation::OpenExternally, &err))
            }
            Request::Shutdown => None,
        }
    }

    fn opened(&mut self, content: String, path: std::path::PathBuf) -> Event {
        self.rewatch();
        Event::FileOpened { content, path }
    }

    fn rewatch(&mut self) {
        let Some(debounce) = self.watch_debounce else {
            return;
        };
        let Some(path) = self.store.path() else {
            self.watcher = None;
            return;
        };
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self
            .watcher
            .as_ref()
            .is_some_and(|w| w.target_path() == canonical.as_path())
        {
            return;
        }
        match FileWatcher::new(path, debounce) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(err) => {
                warn!(path = %path.display(), %err, "watch unavailable");
                self.watcher = None;
            }
        }
    }

    fn poll_watcher(&mut self) -> Option<Event> {
        if !self.watcher.as_mut()?.take_change_ready() {
            return None;
        }
        let path = self.store.path()?.to_path_buf();
        match self.store.changed_on_disk() {
            Ok(true) => {
                debug!(path = %path.display(), "file changed on disk");
                Some(Event::ChangedOnDisk { path })
            }
            Ok(false) => None,
            Err(err) => Some(failed(Operation::Watch, &err)),
        }
    }
}

fn failed(operation: Operation, err: &StoreError) -> Event {
    warn!(%operation, %err, "store operation failed");
    Event::Failed {
        operation,
        message: err.to_string(),
    }
}
