use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{PREVIEW_CHROME, overlays, status, style};

/// Split the main area into editor and (optional) preview panes, half each.
pub const fn split_panes(area: Rect, preview_visible: bool) -> (Rect, Option<Rect>) {
    if !preview_visible {
        return (area, None);
    }
    let editor_width = area.width / 2;
    let editor = Rect {
        width: editor_width,
        ..area
    };
    let preview = Rect {
        x: area.x + editor_width,
        width: area.width - editor_width,
        ..area
    };
    (editor, Some(preview))
}

/// Columns available for preview text in a terminal `total_width` wide.
pub const fn preview_text_width(total_width: u16) -> u16 {
    (total_width - total_width / 2).saturating_sub(PREVIEW_CHROME)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);
    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(footer_rows),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let (editor_area, preview_area) = split_panes(main_area, model.preview_visible);
    render_editor(model, frame, editor_area);
    if let Some(preview_area) = preview_area {
        render_preview(model, frame, preview_area);
    }

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);

    if let Some(prompt) = &model.prompt {
        overlays::render_prompt_overlay(prompt, frame, main_area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;

    // Line number gutter width
    let total_lines = buf.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));

    let visible_height = area.height as usize;
    let start = model.editor_scroll_offset;
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();
    let show_cursor = model.prompt.is_none();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);

        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if show_cursor && line_idx == cursor.line {
            // Split line at cursor position for cursor rendering
            let split = line_text
                .char_indices()
                .nth(cursor.col)
                .map_or(line_text.len(), |(byte, _)| byte);
            let (before, rest) = line_text.split_at(split);
            let mut rest_chars = rest.chars();
            let cursor_char = rest_chars.next().map_or_else(|| " ".to_string(), String::from);
            let after = rest_chars.as_str();

            if !before.is_empty() {
                spans.push(Span::raw(before.to_string()));
            }
            spans.push(Span::styled(
                cursor_char,
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after.to_string()));
            }
        } else {
            spans.push(Span::raw(line_text));
        }

        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::left(PREVIEW_CHROME - 1));
    let inner_height = block.inner(area).height as usize;

    let lines: Vec<Line> = model
        .preview
        .iter()
        .skip(model.preview_scroll_offset)
        .take(inner_height)
        .map(|line| Line::styled(line.text.clone(), style::style_for_line_kind(line.kind)))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
