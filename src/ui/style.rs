//! Theming and color definitions.
//!
//! Preview lines are styled by kind with ANSI colors, so the terminal's own
//! palette decides the exact shades.

use ratatui::style::{Color, Modifier, Style};

use crate::render::LineKind;

/// Get the style for a preview line kind.
pub fn style_for_line_kind(kind: LineKind) -> Style {
    match kind {
        // Headings - bold with distinct colors per level
        LineKind::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(5) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),

        LineKind::CodeBlock => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),
        LineKind::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        LineKind::Rule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),
        LineKind::Html => Style::default().fg(Color::Indexed(245)),

        LineKind::ListItem | LineKind::Table | LineKind::Paragraph | LineKind::Empty => {
            Style::default()
        }
    }
}
