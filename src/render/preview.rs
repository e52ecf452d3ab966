//! Markdown to display lines, for the preview pane.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, parse_document};
use unicode_width::UnicodeWidthStr;

use super::create_options;

/// Type of rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    CodeBlock,
    ListItem,
    BlockQuote,
    Table,
    Html,
    Rule,
    Empty,
}

/// One row of the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub kind: LineKind,
    pub text: String,
}

impl PreviewLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Render markdown into display lines wrapped at `width` columns.
pub fn preview(markdown: &str, width: u16) -> Vec<PreviewLine> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, markdown, &options);

    let mut out = Builder {
        lines: Vec::new(),
        width: usize::from(width.max(1)),
    };
    out.children(root, "", false);
    while out.lines.last().is_some_and(|l| l.kind == LineKind::Empty) {
        out.lines.pop();
    }
    out.lines
}

struct Builder {
    lines: Vec<PreviewLine>,
    width: usize,
}

impl Builder {
    fn children<'a>(&mut self, node: &'a AstNode<'a>, prefix: &str, quoted: bool) {
        for child in node.children() {
            self.block(child, prefix, quoted);
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, prefix: &str, quoted: bool) {
        let kind_or = |kind| if quoted { LineKind::BlockQuote } else { kind };
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let text = format!("{} {}", "#".repeat(usize::from(heading.level)), inline_text(node));
                self.wrapped(&text, prefix, prefix, kind_or(LineKind::Heading(heading.level)));
                self.blank();
            }
            NodeValue::Paragraph => {
                self.wrapped(&inline_text(node), prefix, prefix, kind_or(LineKind::Paragraph));
                self.blank();
            }
            NodeValue::CodeBlock(code) => {
                for line in code.literal.lines() {
                    self.push(kind_or(LineKind::CodeBlock), format!("{prefix}    {line}"));
                }
                self.blank();
            }
            NodeValue::HtmlBlock(html) => {
                for line in html.literal.lines() {
                    self.push(kind_or(LineKind::Html), format!("{prefix}{line}"));
                }
                self.blank();
            }
            NodeValue::BlockQuote => {
                self.children(node, &format!("{prefix}│ "), true);
            }
            NodeValue::List(list) => {
                let mut number = list.start;
                for item in node.children() {
                    let marker = match list.list_type {
                        ListType::Bullet => "•".to_string(),
                        ListType::Ordered => {
                            let delim = match list.delimiter {
                                ListDelimType::Period => '.',
                                ListDelimType::Paren => ')',
                            };
                            format!("{number}{delim}")
                        }
                    };
                    number += 1;
                    self.item(item, prefix, &marker, quoted);
                }
                self.blank();
            }
            NodeValue::ThematicBreak => {
                let avail = self.width.saturating_sub(prefix.width()).max(1);
                self.push(LineKind::Rule, format!("{prefix}{}", "─".repeat(avail)));
                self.blank();
            }
            NodeValue::Table(_) => {
                for row in node.children() {
                    let cells: Vec<String> = row.children().map(inline_text).collect();
                    self.push(kind_or(LineKind::Table), format!("{prefix}| {} |", cells.join(" | ")));
                }
                self.blank();
            }
            _ => self.children(node, prefix, quoted),
        }
    }

    /// A list item: its first paragraph carries the marker, later blocks and
    /// nested lists are indented under it.
    fn item<'a>(&mut self, item: &'a AstNode<'a>, prefix: &str, marker: &str, quoted: bool) {
        let marker = match &item.data.borrow().value {
            NodeValue::TaskItem(symbol) => {
                if symbol.is_some() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            _ => marker.to_string(),
        };
        let first = format!("{prefix}{marker} ");
        let next = format!("{prefix}{}", " ".repeat(marker.width() + 1));
        let kind = if quoted {
            LineKind::BlockQuote
        } else {
            LineKind::ListItem
        };

        let mut marked = false;
        for child in item.children() {
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            if is_paragraph {
                let lead = if marked { next.as_str() } else { first.as_str() };
                self.wrapped(&inline_text(child), lead, &next, kind);
                marked = true;
            } else {
                if !marked {
                    self.push(kind, first.trim_end().to_string());
                    marked = true;
                }
                self.block(child, &next, quoted);
                // Nested blocks should not leave gaps inside the list.
                if self.lines.last().is_some_and(|l| l.kind == LineKind::Empty) {
                    self.lines.pop();
                }
            }
        }
        if !marked {
            self.push(kind, first.trim_end().to_string());
        }
    }

    fn wrapped(&mut self, text: &str, first_prefix: &str, next_prefix: &str, kind: LineKind) {
        let mut lead = first_prefix;
        for hard_line in text.split('\n') {
            for line in wrap(hard_line, self.width, lead, next_prefix) {
                self.push(kind, line);
            }
            lead = next_prefix;
        }
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.lines.push(PreviewLine::new(kind, text));
    }

    fn blank(&mut self) {
        if self
            .lines
            .last()
            .is_some_and(|l| l.kind != LineKind::Empty)
        {
            self.push(LineKind::Empty, String::new());
        }
    }
}

/// Flatten inline content to plain text. Hard breaks become `\n`.
fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect_inline(node, &mut text);
    text
}

fn collect_inline<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => {
            text.push('`');
            text.push_str(&code.literal);
            text.push('`');
        }
        NodeValue::HtmlInline(html) => text.push_str(html),
        NodeValue::SoftBreak => text.push(' '),
        NodeValue::LineBreak => text.push('\n'),
        NodeValue::Image(image) => {
            let mut alt = String::new();
            for child in node.children() {
                collect_inline(child, &mut alt);
            }
            let label = if alt.is_empty() { &image.url } else { &alt };
            text.push_str(&format!("[image: {label}]"));
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str(&format!("[^{}]", reference.name));
        }
        _ => {
            for child in node.children() {
                collect_inline(child, text);
            }
        }
    }
}

/// Greedy word wrap by display width.
fn wrap(text: &str, width: usize, first_prefix: &str, next_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = first_prefix.to_string();
    let mut current_width = first_prefix.width();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if has_word { word_width + 1 } else { word_width };
        if has_word && current_width + needed > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(next_prefix);
            current_width = next_prefix.width();
            has_word = false;
        }
        if has_word {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
        has_word = true;
    }
    if has_word || lines.is_empty() {
        lines.push(current);
    }
    lines
}
