//! Markdown rendering.
//!
//! This module handles:
//! - HTML output for export and the clipboard, via comrak
//! - Display lines for the terminal preview pane

mod preview;

use comrak::{Options, markdown_to_html};

pub use preview::{LineKind, PreviewLine, preview};

/// Render markdown to an HTML fragment.
///
/// # Example
///
/// ```
/// let html = firesale::render::to_html("# Hello");
/// assert!(html.contains("<h1"));
/// ```
pub fn to_html(markdown: &str) -> String {
    markdown_to_html(markdown, &create_options())
}

pub(crate) fn create_options() -> Options {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.extension.header_ids = Some(String::new());

    options
}
