use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::{Prompt, REVERT_QUESTION};

const HINT_COLOR: Color = Color::Indexed(245);

pub fn render_prompt_overlay(prompt: &Prompt, frame: &mut Frame, area: Rect) {
    let (title, lines) = match prompt {
        Prompt::Path {
            kind,
            default_dir,
            input,
        } => {
            let mut lines = Vec::new();
            if let Some(dir) = default_dir {
                lines.push(Line::styled(
                    format!("in {}", dir.display()),
                    Style::default().fg(HINT_COLOR),
                ));
            }
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::raw(input.clone()),
                Span::styled(" ", Style::default().bg(Color::White)),
            ]));
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Enter accept · Esc cancel",
                Style::default().fg(HINT_COLOR),
            ));
            (kind.title(), lines)
        }
        Prompt::ConfirmRevert => (
            "Revert",
            vec![
                Line::styled(REVERT_QUESTION, Style::default().add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::styled(
                    "y revert · n keep editing",
                    Style::default().fg(HINT_COLOR),
                ),
            ],
        ),
    };

    let popup_width = area.width.saturating_sub(8).clamp(20, 72);
    // Border and padding take two rows each; the question may wrap once.
    #[allow(clippy::cast_possible_truncation)]
    let popup_height = lines.len() as u16 + 5;
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
