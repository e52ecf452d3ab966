use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let base = Style::default().bg(Color::DarkGray).fg(Color::White);
    let cursor = model.buffer.cursor();
    let watch_indicator = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };

    let mut spans = vec![
        Span::styled(format!(" {}", model.title()), base.add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  Ln {}, Col {}{watch_indicator}  ",
            cursor.line + 1,
            cursor.col + 1
        )),
    ];
    let affordances = model.affordances;
    for (label, enabled) in [
        ("^S Save", affordances.save || model.file_path.is_none()),
        ("^R Revert", affordances.revert),
        ("^F Folder", affordances.reveal),
        ("^E Export", true),
        ("^O Open", true),
        ("^N New", true),
        ("^Q Quit", true),
    ] {
        let style = if enabled {
            base
        } else {
            base.fg(Color::Gray).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!(" {label}"), style));
    }

    let status_bar = Paragraph::new(Line::from(spans)).style(base);
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
