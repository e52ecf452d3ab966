use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars.
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The live text being edited.
///
/// Backed by a rope; the cursor is a char offset into it. The buffer has no
/// idea whether it matches the file on disk, that question belongs to the
/// document store.
#[derive(Debug, Clone)]
pub struct EditorBuffer {
    rope: Rope,
    /// Char offset of the cursor.
    cursor: usize,
    /// Column remembered across vertical moves.
    goal_col: Option<usize>,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            goal_col: None,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Replace the whole text and put the cursor at the start.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines; a trailing newline opens an empty last line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in chars, excluding its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        while len > 0 && matches!(line.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    pub fn cursor(&self) -> Cursor {
        let line = self.rope.char_to_line(self.cursor);
        Cursor::at(line, self.cursor - self.rope.line_to_char(line))
    }

    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.cursor, ch);
        self.cursor += 1;
        self.goal_col = None;
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.rope.insert(self.cursor, s);
        self.cursor += s.chars().count();
        self.goal_col = None;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let mut start = self.cursor - 1;
        // Treat CRLF as one line break.
        if start > 0 && self.rope.char(start) == '\n' && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..self.cursor);
        self.cursor = start;
        self.goal_col = None;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let len = self.rope.len_chars();
        if self.cursor >= len {
            return false;
        }
        let mut end = self.cursor + 1;
        if self.rope.char(self.cursor) == '\r' && end < len && self.rope.char(end) == '\n' {
            end += 1;
        }
        self.rope.remove(self.cursor..end);
        self.goal_col = None;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let Cursor { line, col } = self.cursor();
                if col > 0 {
                    self.cursor -= 1;
                } else if line > 0 {
                    self.place(line - 1, self.line_len(line - 1));
                }
                self.goal_col = None;
            }
            Direction::Right => {
                let Cursor { line, col } = self.cursor();
                if col < self.line_len(line) {
                    self.cursor += 1;
                } else if line + 1 < self.line_count() {
                    self.place(line + 1, 0);
                }
                self.goal_col = None;
            }
            Direction::Up => {
                let Cursor { line, col } = self.cursor();
                let goal = *self.goal_col.get_or_insert(col);
                if line == 0 {
                    self.place(0, 0);
                } else {
                    self.place(line - 1, goal);
                }
            }
            Direction::Down => {
                let Cursor { line, col } = self.cursor();
                let goal = *self.goal_col.get_or_insert(col);
                if line + 1 >= self.line_count() {
                    self.place(line, self.line_len(line));
                } else {
                    self.place(line + 1, goal);
                }
            }
        }
    }

    /// Move to the beginning of the line (Home).
    pub fn move_home(&mut self) {
        let line = self.cursor().line;
        self.place(line, 0);
        self.goal_col = None;
    }

    /// Move to the end of the line (End).
    pub fn move_end(&mut self) {
        let line = self.cursor().line;
        self.place(line, self.line_len(line));
        self.goal_col = None;
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
        self.goal_col = None;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.rope.len_chars();
        self.goal_col = None;
    }

    /// Move to an absolute position, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.place(line, col);
        self.goal_col = None;
    }

    fn place(&mut self, line: usize, col: usize) {
        let col = col.min(self.line_len(line));
        self.cursor = self.rope.line_to_char(line) + col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_text_round_trip() {
        let mut buf = EditorBuffer::empty();
        buf.insert_str("hello");
        buf.insert_char('!');
        assert_eq!(buf.text(), "hello!");
        assert_eq!(buf.cursor(), Cursor::at(0, 6));
    }

    #[test]
    fn test_split_line_moves_cursor_to_next_line() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.split_line();
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("a\nb");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "x");
    }

    #[test]
    fn test_delete_back_removes_crlf_as_one() {
        let mut buf = EditorBuffer::from_text("a\r\nb");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        buf.move_to_end();
        assert!(!buf.delete_forward());
        buf.move_to_start();
        assert!(buf.delete_forward());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_multibyte_chars_move_by_char() {
        let mut buf = EditorBuffer::from_text("héllo");
        buf.move_to(0, 2);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "hllo");
    }

    #[test]
    fn test_vertical_moves_remember_column() {
        let mut buf = EditorBuffer::from_text("long line\nab\nanother line");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(2, 7));
    }

    #[test]
    fn test_left_at_line_start_wraps_to_previous_end() {
        let mut buf = EditorBuffer::from_text("abc\nd");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = EditorBuffer::from_text("one\ntwo three");
        buf.move_to(1, 4);
        buf.move_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 9));
        buf.move_home();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let buf = EditorBuffer::from_text("a\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1).as_deref(), Some(""));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_set_text_resets_cursor() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.move_to_end();
        buf.set_text("xyz\n123");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert_eq!(buf.text(), "xyz\n123");
    }
}
