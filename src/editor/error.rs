use std::path::PathBuf;

/// Errors surfaced by editing operations.
///
/// None of these abort a session; they end up as status text.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown command: {0}")]
    InvalidCommand(String),

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("No matches")]
    NoMatches,

    #[error("No diagnostics")]
    NoDiagnostics,

    #[error("Invalid location {line}:{col}")]
    InvalidLocation { line: usize, col: usize },
}

impl EditorError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_names_action_and_path() {
        let err = EditorError::io(
            "Failed to read",
            "/tmp/missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "Failed to read /tmp/missing.txt: not found");
    }

    #[test]
    fn test_invalid_command_echoes_text() {
        let err = EditorError::InvalidCommand("frobnicate".to_string());
        assert_eq!(err.to_string(), "Unknown command: frobnicate");
    }
}
