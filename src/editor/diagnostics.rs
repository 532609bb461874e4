//! Diagnostics attached to a session by an external checker.
//!
//! The engine does not interpret them; it only marks lines in the gutter and
//! navigates between them.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One reported problem. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            end_line: line,
            end_column: column,
            message: message.into(),
            severity,
        }
    }

    /// Zero-based line index.
    pub const fn line_index(&self) -> usize {
        self.line.saturating_sub(1)
    }
}

/// Diagnostics grouped by zero-based line.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSet {
    by_line: BTreeMap<usize, Vec<Diagnostic>>,
}

impl DiagnosticSet {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let mut by_line: BTreeMap<usize, Vec<Diagnostic>> = BTreeMap::new();
        for diagnostic in diagnostics {
            by_line
                .entry(diagnostic.line_index())
                .or_default()
                .push(diagnostic);
        }
        for entries in by_line.values_mut() {
            entries.sort_by_key(|d| (d.column, std::cmp::Reverse(d.severity)));
        }
        Self { by_line }
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.values().map(Vec::len).sum()
    }

    /// Worst severity reported on a line.
    pub fn severity_at(&self, line: usize) -> Option<Severity> {
        self.by_line
            .get(&line)
            .and_then(|entries| entries.iter().map(|d| d.severity).max())
    }

    /// First diagnostic on the nearest diagnosed line after (or before)
    /// `line`, wrapping around the document.
    pub fn next_from(&self, line: usize, forward: bool) -> Option<&Diagnostic> {
        let entries = if forward {
            self.by_line
                .range(line + 1..)
                .next()
                .or_else(|| self.by_line.iter().next())
        } else {
            self.by_line
                .range(..line)
                .next_back()
                .or_else(|| self.by_line.iter().next_back())
        };
        entries.and_then(|(_, list)| list.first())
    }
}
