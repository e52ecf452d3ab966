// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # Firesale
//!
//! A minimal terminal markdown editor with a live preview pane.
//!
//! The open document lives in a single owner, the [`store::DocumentStore`],
//! running on its own thread. The edit surface never touches the disk; it
//! talks to the store only through [`ipc`] messages and keeps its "unsaved
//! changes" indicator correct by asking the store, tagging every question
//! with an id so late answers can be told apart from current ones.
//!
//! ## Architecture
//!
//! The surface uses The Elm Architecture (TEA) pattern:
//! - **Model**: Surface state
//! - **Message**: Key presses and store replies
//! - **Update**: Pure state transitions that queue store requests
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Edit surface state and main loop
//! - [`store`]: Document store, dialogs and the store thread
//! - [`ipc`]: Requests and events exchanged between the two
//! - [`editor`]: Text buffer with cursor
//! - [`render`]: Markdown to HTML and to preview lines
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod editor;
pub mod ipc;
pub mod render;
pub mod store;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::ipc::{Event, Request};
    pub use crate::store::{DocumentStore, StoreError, StoreService};
}
