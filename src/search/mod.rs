//! In-buffer search.
//!
//! Matches are plain, case-sensitive substrings found line by line. Columns
//! are char offsets so they line up with buffer positions.

use crate::editor::Position;

/// One occurrence of the query: `line`, columns `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl SearchMatch {
    pub const fn start_pos(&self) -> Position {
        Position::new(self.line, self.start)
    }

    pub const fn end_pos(&self) -> Position {
        Position::new(self.line, self.end)
    }
}

/// Find non-overlapping occurrences of `query` in each line, in document order.
pub fn find_matches<S: AsRef<str>>(lines: &[S], query: &str) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let query_chars = query.chars().count();
    let mut matches = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let mut byte_offset = 0;
        let mut char_offset = 0;
        while let Some(found) = line[byte_offset..].find(query) {
            let start = char_offset + line[byte_offset..byte_offset + found].chars().count();
            matches.push(SearchMatch {
                line: line_idx,
                start,
                end: start + query_chars,
            });
            byte_offset += found + query.len();
            char_offset = start + query_chars;
        }
    }
    matches
}

/// Live search for one session.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    matches: Vec<SearchMatch>,
    index: Option<usize>,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Start a new search and compute its matches.
    pub fn set_query<S: AsRef<str>>(&mut self, query: &str, lines: &[S]) {
        query.clone_into(&mut self.query);
        self.index = None;
        self.recompute(lines);
    }

    /// Recompute matches after the text changed.
    pub fn recompute<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.matches = find_matches(lines, &self.query);
        if self.index.is_some_and(|i| i >= self.matches.len()) {
            self.index = None;
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.index = None;
    }

    /// Select the next (or previous) match relative to `cursor`, wrapping.
    pub fn step(&mut self, cursor: Position, forward: bool) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            self.index = None;
            return None;
        }
        let idx = if forward {
            self.matches
                .iter()
                .position(|m| m.start_pos() >= cursor)
                .unwrap_or(0)
        } else {
            self.matches
                .iter()
                .rposition(|m| m.start_pos() < cursor)
                .unwrap_or(self.matches.len() - 1)
        };
        self.index = Some(idx);
        Some(self.matches[idx])
    }

    /// 1-based index of the current match and the total count.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.index.map(|i| (i + 1, self.matches.len()))
    }

    /// Whether `(line, col)` falls inside any match.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        self.matches
            .iter()
            .any(|m| m.line == line && (m.start..m.end).contains(&col))
    }
}
