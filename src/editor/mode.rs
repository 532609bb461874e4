/// Modal editing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Motions and commands; text keys do not insert.
    #[default]
    Normal,
    /// Typing inserts text at the cursor.
    Insert,
    /// One-line prompt at the bottom (`:` commands or `/` search).
    Command,
}

impl Mode {
    /// Label for the status bar.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }
}

/// What the command-line prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// `:` ex-style command.
    Command,
    /// `/` search query.
    Search,
}

impl PromptKind {
    pub const fn prefix(self) -> char {
        match self {
            Self::Command => ':',
            Self::Search => '/',
        }
    }
}

/// First half of a two-key Normal-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// `g`, completed by `g` (go to top).
    Goto,
    /// `y`, completed by `y` (yank line).
    Yank,
    /// `d`, completed by `d` (cut line).
    Delete,
}

impl Pending {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'g' => Some(Self::Goto),
            'y' => Some(Self::Yank),
            'd' => Some(Self::Delete),
            _ => None,
        }
    }

    /// Key that completes this command.
    pub const fn key(self) -> char {
        match self {
            Self::Goto => 'g',
            Self::Yank => 'y',
            Self::Delete => 'd',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::default().as_str(), "NORMAL");
        assert_eq!(Mode::Insert.as_str(), "INSERT");
        assert_eq!(Mode::Command.as_str(), "COMMAND");
    }

    #[test]
    fn test_pending_round_trips_through_its_key() {
        for c in ['g', 'y', 'd'] {
            assert_eq!(Pending::from_char(c).map(Pending::key), Some(c));
        }
        assert_eq!(Pending::from_char('x'), None);
    }
}
