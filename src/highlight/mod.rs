//! Syntax highlighting for source lines.
//!
//! The lexer classifies one line at a time and hands a [`LexState`] to the
//! next line, so block comments (and unterminated strings) carry over line
//! breaks. [`DocumentHighlighter`] keeps the result for a whole buffer and
//! re-lexes only what an edit can have changed.

mod lexer;

pub use lexer::highlight_line;

use crate::editor::Buffer;

/// Lexical category of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plain,
    Keyword,
    BuiltinType,
    TypeName,
    String,
    Number,
    Comment,
    Directive,
    Attribute,
    Operator,
}

/// A run of same-kind text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: TokenKind,
    pub text: String,
}

impl Segment {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A line split into classified segments.
///
/// The segments cover the line exactly once and adjacent segments never share
/// a kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedLine {
    segments: Vec<Segment>,
    len: usize,
}

impl HighlightedLine {
    /// A line that is a single plain segment.
    pub fn plain(text: &str) -> Self {
        let mut line = Self::default();
        line.push(TokenKind::Plain, text);
        line
    }

    /// Append text, merging it into the last segment when the kind matches.
    pub fn push(&mut self, kind: TokenKind, text: &str) {
        if text.is_empty() {
            return;
        }
        self.len += text.chars().count();
        match self.segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => self.segments.push(Segment::new(kind, text)),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Length in chars.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The line text with classification dropped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Lexical state at a line boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    pub block_comment_depth: u32,
    pub in_unterminated_string: bool,
}

/// Highlight every line in one pass, threading state from line to line.
pub fn highlight_document<S: AsRef<str>>(lines: &[S]) -> Vec<HighlightedLine> {
    let mut state = LexState::default();
    lines
        .iter()
        .map(|line| {
            let (hl, next) = highlight_line(line.as_ref(), state);
            state = next;
            hl
        })
        .collect()
}

/// Read access to the lines being highlighted.
pub trait LineSource {
    fn line_count(&self) -> usize;
    fn line_text(&self, idx: usize) -> String;
}

impl LineSource for Buffer {
    fn line_count(&self) -> usize {
        Self::line_count(self)
    }

    fn line_text(&self, idx: usize) -> String {
        self.line(idx).unwrap_or_default()
    }
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, idx: usize) -> String {
        self.get(idx).map(|s| s.as_ref().to_owned()).unwrap_or_default()
    }
}

/// Which lines an edit replaced: `removed` old lines starting at `start`
/// became `inserted` new lines. Lines outside that range are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEdit {
    pub start: usize,
    pub removed: usize,
    pub inserted: usize,
}

/// Highlight cache for one document.
#[derive(Debug, Clone)]
pub struct DocumentHighlighter {
    enabled: bool,
    lines: Vec<HighlightedLine>,
    /// State on entry to each line.
    entry: Vec<LexState>,
    /// State after the last line.
    exit: LexState,
}

impl DocumentHighlighter {
    /// With `enabled == false` every line is plain text.
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
            entry: Vec::new(),
            exit: LexState {
                block_comment_depth: 0,
                in_unterminated_string: false,
            },
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn lines(&self) -> &[HighlightedLine] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&HighlightedLine> {
        self.lines.get(idx)
    }

    /// Re-highlight everything.
    pub fn rebuild<L: LineSource + ?Sized>(&mut self, source: &L) {
        let _scope = crate::perf::scope("highlight.rebuild");
        let count = source.line_count();
        self.lines.clear();
        self.entry.clear();
        let mut state = LexState::default();
        for idx in 0..count {
            self.entry.push(state);
            let (hl, next) = self.lex(&source.line_text(idx), state);
            self.lines.push(hl);
            state = next;
        }
        self.exit = state;
    }

    /// Update after `edit`, re-lexing the replaced lines and then following
    /// lines until the carried state matches what was recorded before.
    ///
    /// Falls back to a full rebuild when `edit` does not fit the cache.
    pub fn refresh<L: LineSource + ?Sized>(&mut self, source: &L, edit: LineEdit) {
        let new_count = source.line_count();
        let LineEdit {
            start,
            removed,
            inserted,
        } = edit;
        if self.lines.is_empty()
            || start + removed > self.lines.len()
            || self.lines.len() - removed + inserted != new_count
        {
            self.rebuild(source);
            return;
        }

        let mut state = self.entry.get(start).copied().unwrap_or(self.exit);
        let mut fresh_lines = Vec::with_capacity(inserted);
        let mut fresh_entry = Vec::with_capacity(inserted);
        for idx in start..start + inserted {
            fresh_entry.push(state);
            let (hl, next) = self.lex(&source.line_text(idx), state);
            fresh_lines.push(hl);
            state = next;
        }
        self.lines.splice(start..start + removed, fresh_lines);
        self.entry.splice(start..start + removed, fresh_entry);

        let mut idx = start + inserted;
        while idx < new_count && self.entry[idx] != state {
            self.entry[idx] = state;
            let (hl, next) = self.lex(&source.line_text(idx), state);
            self.lines[idx] = hl;
            state = next;
            idx += 1;
        }
        if idx == new_count {
            self.exit = state;
        }
        tracing::trace!(
            target: "highlight",
            start,
            removed,
            inserted,
            relexed = idx - start,
            "refresh"
        );
    }

    fn lex(&self, text: &str, state: LexState) -> (HighlightedLine, LexState) {
        if self.enabled {
            highlight_line(text, state)
        } else {
            (HighlightedLine::plain(text), state)
        }
    }
}
