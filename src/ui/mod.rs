//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: Pane layout, editor and preview drawing
//! - [`style`]: Theming and colors for preview lines

pub mod style;

mod overlays;
mod render;
mod status;

pub use render::{preview_text_width, render, split_panes};

/// Columns taken by the preview pane's left border and padding.
pub const PREVIEW_CHROME: u16 = 2;
