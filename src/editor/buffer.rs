use ropey::Rope;

/// A position in the buffer.
///
/// `col` counts Unicode scalar values, never bytes. Ordering is by line, then
/// column, which is the document order selections are normalized by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (char offset within the line).
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
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

/// Everything needed to put a buffer back exactly as it was.
///
/// Cloning is cheap: the rope shares its nodes until one side is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferState {
    pub text: Rope,
    pub cursor: Position,
    pub anchor: Option<Position>,
}

/// A multi-line text buffer backed by a rope.
///
/// Invariants:
/// - there is always at least one (possibly empty) line
/// - the cursor is always inside the document (`col` may equal the line length)
/// - an anchor equal to the cursor is not a selection
pub struct Buffer {
    rope: Rope,
    cursor: Position,
    anchor: Option<Position>,
    /// Column remembered across vertical moves.
    goal_col: Option<usize>,
}

impl Buffer {
    /// Create a buffer from text split on `\n`.
    ///
    /// A trailing `\n` leaves an empty last line.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Position::default(),
            anchor: None,
            goal_col: None,
        }
    }

    /// Create an empty buffer (one empty line).
    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    pub const fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// Total number of lines in the buffer. Never zero.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without the line break).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.line_count() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Length of a line in chars (without the line break).
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.line_count() {
            return 0;
        }
        let len = self.rope.line(idx).len_chars();
        if idx + 1 < self.line_count() {
            len - 1
        } else {
            len
        }
    }

    /// All lines, without line breaks.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|idx| self.line(idx).unwrap_or_default())
            .collect()
    }

    /// The full text: lines joined with `\n`.
    pub fn full_text(&self) -> String {
        self.rope.to_string()
    }

    /// Snapshot of text, cursor and anchor.
    pub fn state(&self) -> BufferState {
        BufferState {
            text: self.rope.clone(),
            cursor: self.cursor,
            anchor: self.anchor,
        }
    }

    /// Restore a snapshot taken with [`Buffer::state`].
    pub fn restore(&mut self, state: BufferState) {
        self.rope = state.text;
        self.cursor = state.cursor;
        self.anchor = state.anchor;
        self.goal_col = None;
        self.clamp_cursor();
    }

    /// Reset the buffer from `content`; cursor to origin, selection cleared.
    pub fn replace_all(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        self.cursor = Position::default();
        self.anchor = None;
        self.goal_col = None;
    }

    // --- Selection ---

    /// Start (or restart) a selection at the cursor.
    pub const fn set_anchor(&mut self) {
        self.anchor = Some(self.cursor);
    }

    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|anchor| anchor != self.cursor)
    }

    /// Normalized `(start, end)` of the selection, if any.
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor.filter(|a| *a != self.cursor)?;
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// Text covered by the selection, lines joined with `\n`.
    pub fn selected_text(&self) -> String {
        self.selection_range().map_or_else(String::new, |(start, end)| {
            self.rope
                .slice(self.char_idx(start)..self.char_idx(end))
                .to_string()
        })
    }

    // --- Mutation ---

    /// Insert a char at the cursor, replacing any selection.
    ///
    /// `'\n'` splits the line and moves the cursor to the start of the new one.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let idx = self.char_idx(self.cursor);
        self.rope.insert_char(idx, ch);
        if ch == '\n' {
            self.cursor = Position::new(self.cursor.line + 1, 0);
        } else {
            self.cursor.col += 1;
        }
        self.goal_col = None;
    }

    /// Insert a string at the cursor, replacing any selection.
    ///
    /// The cursor ends up after the inserted text.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        if s.is_empty() {
            return;
        }
        let idx = self.char_idx(self.cursor);
        self.rope.insert(idx, s);
        self.cursor = self.pos_of(idx + s.chars().count());
        self.goal_col = None;
    }

    /// Insert one level of indentation: spaces up to the next multiple of
    /// `tab_size`, or a literal tab.
    pub fn indent(&mut self, tab_size: usize, use_spaces: bool) {
        if use_spaces {
            let tab_size = tab_size.max(1);
            let col = self
                .selection_range()
                .map_or(self.cursor.col, |(start, _)| start.col);
            self.insert_str(&" ".repeat(tab_size - col % tab_size));
        } else {
            self.insert_char('\t');
        }
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Whether [`Buffer::delete_backward`] would change anything.
    pub fn can_delete_backward(&self) -> bool {
        self.has_selection() || self.cursor != Position::default()
    }

    /// Whether [`Buffer::delete_forward`] would change anything.
    pub fn can_delete_forward(&self) -> bool {
        self.has_selection() || self.char_idx(self.cursor) < self.rope.len_chars()
    }

    /// Delete the selection, or the char before the cursor (Backspace).
    ///
    /// At column 0 the line is merged into the previous one and `"\n"` is
    /// returned. Returns the removed text, empty when nothing changed.
    pub fn delete_backward(&mut self) -> String {
        if self.has_selection() {
            return self.delete_selection();
        }
        self.anchor = None;
        self.goal_col = None;
        let idx = self.char_idx(self.cursor);
        if idx == 0 {
            return String::new();
        }
        let removed = self.rope.char(idx - 1);
        self.rope.remove(idx - 1..idx);
        self.cursor = self.pos_of(idx - 1);
        removed.to_string()
    }

    /// Delete the selection, or the char under the cursor (Delete).
    ///
    /// At the end of a line the next line is merged in and `"\n"` is returned.
    pub fn delete_forward(&mut self) -> String {
        if self.has_selection() {
            return self.delete_selection();
        }
        self.anchor = None;
        self.goal_col = None;
        let idx = self.char_idx(self.cursor);
        if idx >= self.rope.len_chars() {
            return String::new();
        }
        let removed = self.rope.char(idx);
        self.rope.remove(idx..=idx);
        removed.to_string()
    }

    /// Remove the selected range and return it.
    ///
    /// The cursor lands at the start of the range and the anchor is cleared.
    /// Without a selection this only clears the anchor.
    pub fn delete_selection(&mut self) -> String {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return String::new();
        };
        let (from, to) = (self.char_idx(start), self.char_idx(end));
        let removed = self.rope.slice(from..to).to_string();
        self.rope.remove(from..to);
        self.cursor = start;
        self.anchor = None;
        self.goal_col = None;
        removed
    }

    /// Remove line `idx` entirely and return its text.
    ///
    /// The last remaining line is emptied instead of removed.
    pub fn delete_line(&mut self, idx: usize) -> String {
        if idx >= self.line_count() {
            return String::new();
        }
        let text = self.line(idx).unwrap_or_default();
        let start = self.rope.line_to_char(idx);
        let count = self.line_count();
        if count == 1 {
            self.rope.remove(0..self.rope.len_chars());
        } else if idx + 1 < count {
            let end = self.rope.line_to_char(idx + 1);
            self.rope.remove(start..end);
        } else {
            // Last line: take the preceding line break with it.
            self.rope.remove(start - 1..self.rope.len_chars());
        }
        self.anchor = None;
        self.goal_col = None;
        let line = idx.min(self.line_count() - 1);
        self.cursor = Position::new(line, self.cursor.col.min(self.line_len(line)));
        text
    }

    /// Insert `text` as a new line after line `idx`; cursor to its start.
    pub fn insert_line_below(&mut self, idx: usize, text: &str) {
        let idx = idx.min(self.line_count() - 1);
        let at = self.rope.line_to_char(idx) + self.line_len(idx);
        self.rope.insert(at, &format!("\n{text}"));
        self.cursor = Position::new(idx + 1, 0);
        self.anchor = None;
        self.goal_col = None;
    }

    // --- Movement ---

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.col = 0;
        self.goal_col = None;
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.line);
        self.goal_col = None;
    }

    /// Move cursor one word to the left.
    pub fn move_word_left(&mut self) {
        self.goal_col = None;
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.col = self.line_len(self.cursor.line);
            }
            return;
        }
        let chars = self.line_chars(self.cursor.line);
        let mut col = self.cursor.col.min(chars.len());
        while col > 0 && !is_word_char(chars[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(chars[col - 1]) {
            col -= 1;
        }
        self.cursor.col = col;
    }

    /// Move cursor to the start of the next word.
    pub fn move_word_right(&mut self) {
        self.goal_col = None;
        let chars = self.line_chars(self.cursor.line);
        if self.cursor.col >= chars.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor = Position::new(self.cursor.line + 1, 0);
            }
            return;
        }
        let mut col = self.cursor.col;
        while col < chars.len() && is_word_char(chars[col]) {
            col += 1;
        }
        while col < chars.len() && !is_word_char(chars[col]) {
            col += 1;
        }
        self.cursor.col = col;
    }

    /// Move cursor to a specific line and column, clamped to the document.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count() - 1);
        self.cursor = Position::new(line, col.min(self.line_len(line)));
        self.goal_col = None;
    }

    /// Move cursor to the start of the buffer.
    pub const fn move_to_start(&mut self) {
        self.cursor = Position::new(0, 0);
        self.goal_col = None;
    }

    /// Move cursor to the end of the last line.
    pub fn move_to_end(&mut self) {
        let last = self.line_count() - 1;
        self.cursor = Position::new(last, self.line_len(last));
        self.goal_col = None;
    }

    /// Move up `n` lines, keeping the column where possible.
    pub fn page_up(&mut self, n: usize) {
        let target = self.cursor.line.saturating_sub(n);
        self.move_vertically(target);
    }

    /// Move down `n` lines, keeping the column where possible.
    pub fn page_down(&mut self, n: usize) {
        let target = (self.cursor.line + n).min(self.line_count() - 1);
        self.move_vertically(target);
    }

    // --- Private helpers ---

    fn char_idx(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        self.rope.line_to_char(line) + pos.col.min(self.line_len(line))
    }

    fn pos_of(&self, char_idx: usize) -> Position {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        Position::new(line, char_idx - self.rope.line_to_char(line))
    }

    fn line_chars(&self, idx: usize) -> Vec<char> {
        self.line(idx).unwrap_or_default().chars().collect()
    }

    fn clamp_cursor(&mut self) {
        let line = self.cursor.line.min(self.line_count() - 1);
        self.cursor = Position::new(line, self.cursor.col.min(self.line_len(line)));
        if let Some(anchor) = self.anchor {
            let line = anchor.line.min(self.line_count() - 1);
            self.anchor = Some(Position::new(line, anchor.col.min(self.line_len(line))));
        }
    }

    fn move_vertically(&mut self, target: usize) {
        let goal = *self.goal_col.get_or_insert(self.cursor.col);
        self.cursor = Position::new(target, goal.min(self.line_len(target)));
    }

    fn move_left(&mut self) {
        self.goal_col = None;
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
        }
    }

    fn move_right(&mut self) {
        self.goal_col = None;
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor = Position::new(self.cursor.line + 1, 0);
        }
    }

    fn move_up(&mut self) {
        self.move_vertically(self.cursor.line.saturating_sub(1));
    }

    fn move_down(&mut self) {
        self.move_vertically((self.cursor.line + 1).min(self.line_count() - 1));
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines_of(buf: &Buffer) -> Vec<String> {
        buf.lines()
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = Buffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(lines_of(&buf), vec!["hello", "world"]);
    }

    #[test]
    fn test_from_text_trailing_newline_adds_empty_line() {
        let buf = Buffer::from_text("hello\n");
        assert_eq!(lines_of(&buf), vec!["hello", ""]);
    }

    #[test]
    fn test_line_out_of_bounds_returns_none() {
        let buf = Buffer::from_text("hello");
        assert_eq!(buf.line(1), None);
        assert_eq!(buf.line_len(1), 0);
    }

    #[test]
    fn test_line_len_counts_chars_not_bytes() {
        let buf = Buffer::from_text("héllo\nhi");
        assert_eq!(buf.line_len(0), 5);
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buf = Buffer::from_text("a\rb");
        assert_eq!(buf.line_count(), 1);
    }

    // --- replace_all round trip ---

    #[test]
    fn test_replace_all_without_trailing_newline() {
        let mut buf = Buffer::from_text("old");
        buf.replace_all("a\nb");
        assert_eq!(lines_of(&buf), vec!["a", "b"]);
        assert_eq!(buf.full_text(), "a\nb");
    }

    #[test]
    fn test_replace_all_with_trailing_newline() {
        let mut buf = Buffer::from_text("old");
        buf.replace_all("a\nb\n");
        assert_eq!(lines_of(&buf), vec!["a", "b", ""]);
        assert_eq!(buf.full_text(), "a\nb\n");
    }

    #[test]
    fn test_replace_all_resets_cursor_and_anchor() {
        let mut buf = Buffer::from_text("one\ntwo");
        buf.move_to(1, 2);
        buf.set_anchor();
        buf.replace_all("x");
        assert_eq!(buf.cursor(), Position::new(0, 0));
        assert_eq!(buf.anchor(), None);
    }

    // --- Character insertion ---

    #[test]
    fn test_indent_with_spaces_aligns_to_tab_stop() {
        let mut buf = Buffer::from_text("ab");
        buf.move_end();
        buf.indent(4, true);
        assert_eq!(buf.line(0).as_deref(), Some("ab  "));
        assert_eq!(buf.cursor(), Position::new(0, 4));
        buf.indent(4, true);
        assert_eq!(buf.line_len(0), 8);
    }

    #[test]
    fn test_indent_with_tabs_inserts_tab() {
        let mut buf = Buffer::from_text("x");
        buf.indent(4, false);
        assert_eq!(buf.line(0).as_deref(), Some("\tx"));
    }

    #[test]
    fn test_insert_char_at_start() {
        let mut buf = Buffer::from_text("hello");
        buf.insert_char('H');
        assert_eq!(buf.line(0).as_deref(), Some("Hhello"));
        assert_eq!(buf.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = Buffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.line(0).as_deref(), Some("hello"));
        assert_eq!(buf.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char_advances_one_column() {
        let mut buf = Buffer::from_text("hello");
        buf.move_end();
        buf.insert_char('é');
        assert_eq!(buf.line(0).as_deref(), Some("helloé"));
        assert_eq!(buf.cursor(), Position::new(0, 6));
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(0, 2);
        buf.insert_char('\n');
        assert_eq!(lines_of(&buf), vec!["he", "llo"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_split_line_at_end_adds_empty_line() {
        let mut buf = Buffer::from_text("hello");
        buf.move_end();
        buf.split_line();
        assert_eq!(lines_of(&buf), vec!["hello", ""]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = Buffer::from_text("hello world");
        buf.set_anchor();
        buf.move_to(0, 5);
        buf.insert_char('X');
        assert_eq!(buf.line(0).as_deref(), Some("X world"));
        assert!(!buf.has_selection());
    }

    // --- String insertion ---

    #[test]
    fn test_insert_str_single_line() {
        let mut buf = Buffer::from_text("hd");
        buf.move_cursor(Direction::Right);
        buf.insert_str("ello worl");
        assert_eq!(buf.line(0).as_deref(), Some("hello world"));
        assert_eq!(buf.cursor(), Position::new(0, 10));
    }

    #[test]
    fn test_insert_str_multi_line_moves_cursor_to_end() {
        let mut buf = Buffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("1\n22\n333");
        assert_eq!(lines_of(&buf), vec!["a1", "22", "333b"]);
        assert_eq!(buf.cursor(), Position::new(2, 3));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = Buffer::from_text("hello");
        buf.insert_str("");
        assert_eq!(buf.full_text(), "hello");
        assert_eq!(buf.cursor(), Position::new(0, 0));
    }

    // --- Backspace ---

    #[test]
    fn test_delete_backward_removes_previous_char() {
        let mut buf = Buffer::from_text("hello");
        buf.move_end();
        assert_eq!(buf.delete_backward(), "o");
        assert_eq!(buf.line(0).as_deref(), Some("hell"));
        assert_eq!(buf.cursor(), Position::new(0, 4));
    }

    #[test]
    fn test_delete_backward_at_line_start_merges_lines() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert_eq!(buf.delete_backward(), "\n");
        assert_eq!(lines_of(&buf), vec!["helloworld"]);
        assert_eq!(buf.cursor(), Position::new(0, 5));
    }

    #[test]
    fn test_delete_backward_at_buffer_start_is_noop() {
        let mut buf = Buffer::from_text("hello");
        assert!(!buf.can_delete_backward());
        assert_eq!(buf.delete_backward(), "");
        assert_eq!(buf.full_text(), "hello");
    }

    // --- Delete ---

    #[test]
    fn test_delete_forward_removes_char_under_cursor() {
        let mut buf = Buffer::from_text("hello");
        assert_eq!(buf.delete_forward(), "h");
        assert_eq!(buf.line(0).as_deref(), Some("ello"));
        assert_eq!(buf.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_delete_forward_at_line_end_merges_next_line() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_end();
        assert_eq!(buf.delete_forward(), "\n");
        assert_eq!(lines_of(&buf), vec!["helloworld"]);
        assert_eq!(buf.cursor(), Position::new(0, 5));
    }

    #[test]
    fn test_delete_forward_at_buffer_end_is_noop() {
        let mut buf = Buffer::from_text("hi");
        buf.move_to_end();
        assert!(!buf.can_delete_forward());
        assert_eq!(buf.delete_forward(), "");
    }

    // --- Selection ---

    #[test]
    fn test_anchor_equal_to_cursor_is_not_a_selection() {
        let mut buf = Buffer::from_text("hello");
        buf.set_anchor();
        assert!(!buf.has_selection());
        assert_eq!(buf.selection_range(), None);
        assert_eq!(buf.selected_text(), "");
    }

    #[test]
    fn test_selection_range_is_normalized() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(1, 3);
        buf.set_anchor();
        buf.move_to(0, 2);
        assert_eq!(
            buf.selection_range(),
            Some((Position::new(0, 2), Position::new(1, 3)))
        );
    }

    #[test]
    fn test_delete_selection_across_lines() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(0, 2);
        buf.set_anchor();
        buf.move_to(1, 3);
        assert_eq!(buf.selected_text(), "llo\nwor");
        assert_eq!(buf.delete_selection(), "llo\nwor");
        assert_eq!(lines_of(&buf), vec!["held"]);
        assert_eq!(buf.cursor(), Position::new(0, 2));
        assert_eq!(buf.anchor(), None);
    }

    #[test]
    fn test_delete_selection_removes_whole_middle_lines() {
        let mut buf = Buffer::from_text("aa\nbb\ncc\ndd");
        buf.move_to(0, 1);
        buf.set_anchor();
        buf.move_to(3, 1);
        assert_eq!(buf.delete_selection(), "a\nbb\ncc\nd");
        assert_eq!(lines_of(&buf), vec!["ad"]);
    }

    #[test]
    fn test_backspace_with_selection_deletes_selection() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(0, 1);
        buf.set_anchor();
        buf.move_to(0, 4);
        assert_eq!(buf.delete_backward(), "ell");
        assert_eq!(buf.full_text(), "ho");
    }

    // --- Whole-line operations ---

    #[test]
    fn test_delete_line_middle() {
        let mut buf = Buffer::from_text("a\nb\nc");
        buf.move_to(1, 0);
        assert_eq!(buf.delete_line(1), "b");
        assert_eq!(lines_of(&buf), vec!["a", "c"]);
        assert_eq!(buf.cursor().line, 1);
    }

    #[test]
    fn test_delete_last_line_moves_cursor_up() {
        let mut buf = Buffer::from_text("a\nb");
        buf.move_to(1, 1);
        assert_eq!(buf.delete_line(1), "b");
        assert_eq!(lines_of(&buf), vec!["a"]);
        assert_eq!(buf.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_delete_only_line_leaves_empty_line() {
        let mut buf = Buffer::from_text("solo");
        assert_eq!(buf.delete_line(0), "solo");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.full_text(), "");
    }

    #[test]
    fn test_insert_line_below_places_cursor_on_new_line() {
        let mut buf = Buffer::from_text("a\nc");
        buf.insert_line_below(0, "b");
        assert_eq!(lines_of(&buf), vec!["a", "b", "c"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_at_line_start_wraps_to_previous_line_end() {
        let mut buf = Buffer::from_text("abc\nde");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_move_right_at_line_end_wraps_to_next_line() {
        let mut buf = Buffer::from_text("abc\nde");
        buf.move_end();
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_move_left_and_right_clamp_at_buffer_edges() {
        let mut buf = Buffer::from_text("ab");
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Position::new(0, 0));
        buf.move_to_end();
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_move_down_clamps_column_to_shorter_line() {
        let mut buf = Buffer::from_text("hello\nhi");
        buf.move_end();
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_vertical_moves_remember_goal_column() {
        let mut buf = Buffer::from_text("hello\nhi\nworld");
        buf.move_end();
        buf.move_cursor(Direction::Down);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Position::new(2, 5));
    }

    #[test]
    fn test_move_up_on_first_line_stays_put() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(0, 3);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_move_word_right_and_left() {
        let mut buf = Buffer::from_text("let foo = bar");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 4);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 10);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_move_to_clamps_out_of_range() {
        let mut buf = Buffer::from_text("ab\ncd");
        buf.move_to(10, 10);
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_page_down_and_up() {
        let mut buf = Buffer::from_text("a\nb\nc\nd\ne");
        buf.page_down(3);
        assert_eq!(buf.cursor().line, 3);
        buf.page_down(3);
        assert_eq!(buf.cursor().line, 4);
        buf.page_up(10);
        assert_eq!(buf.cursor().line, 0);
    }

    // --- State snapshots ---

    #[test]
    fn test_restore_puts_back_text_cursor_and_anchor() {
        let mut buf = Buffer::from_text("one\ntwo");
        buf.move_to(1, 1);
        buf.set_anchor();
        buf.move_to(1, 3);
        let saved = buf.state();
        buf.delete_selection();
        buf.insert_str("zzz");
        buf.restore(saved.clone());
        assert_eq!(buf.state(), saved);
    }

    // --- Invariants ---

    #[derive(Debug, Clone)]
    enum Op {
        Insert(char),
        Backspace,
        Delete,
        Move(Direction),
        Anchor,
        DeleteSelection,
        DeleteLine,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::sample::select(vec!['a', 'b', ' ', '\n', 'é', '_']).prop_map(Op::Insert),
            Just(Op::Backspace),
            Just(Op::Delete),
            prop::sample::select(vec![
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ])
            .prop_map(Op::Move),
            Just(Op::Anchor),
            Just(Op::DeleteSelection),
            Just(Op::DeleteLine),
        ]
    }

    fn apply(buf: &mut Buffer, op: &Op) {
        match op {
            Op::Insert(c) => buf.insert_char(*c),
            Op::Backspace => {
                buf.delete_backward();
            }
            Op::Delete => {
                buf.delete_forward();
            }
            Op::Move(d) => buf.move_cursor(*d),
            Op::Anchor => buf.set_anchor(),
            Op::DeleteSelection => {
                buf.delete_selection();
            }
            Op::DeleteLine => {
                buf.delete_line(buf.cursor().line);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_line_count_and_cursor_stay_valid(
            text in "[a-c\n ]{0,40}",
            ops in prop::collection::vec(op_strategy(), 0..60),
        ) {
            let mut buf = Buffer::from_text(&text);
            for op in &ops {
                apply(&mut buf, op);
                prop_assert!(buf.line_count() >= 1);
                let cursor = buf.cursor();
                prop_assert!(cursor.line < buf.line_count());
                prop_assert!(cursor.col <= buf.line_len(cursor.line));
                prop_assert_eq!(buf.full_text(), buf.lines().join("\n"));
            }
        }

        #[test]
        fn prop_insert_then_backspace_is_identity(
            text in "[a-c\n ]{0,40}",
            line in 0usize..8,
            col in 0usize..8,
            ch in prop::sample::select(vec!['x', '\n', 'ß']),
        ) {
            let mut buf = Buffer::from_text(&text);
            buf.move_to(line, col);
            let before_lines = buf.lines();
            let before_cursor = buf.cursor();
            buf.insert_char(ch);
            let removed = buf.delete_backward();
            prop_assert_eq!(removed, ch.to_string());
            prop_assert_eq!(buf.lines(), before_lines);
            prop_assert_eq!(buf.cursor(), before_cursor);
        }
    }
}
