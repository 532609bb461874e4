//! File loading, saving and autosave sidecars.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::error::EditorError;

/// Permission bits used when a file has none recorded yet.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Text and identity of a file read from disk.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Content with `\r\n` normalized to `\n`.
    pub text: String,
    pub mode: u32,
    pub modified: Option<SystemTime>,
}

/// Read a UTF-8 text file.
///
/// # Errors
///
/// Returns [`EditorError::Io`] when the file cannot be read or is not UTF-8.
pub fn load_file(path: &Path) -> Result<LoadedFile, EditorError> {
    let bytes = fs::read(path).map_err(|err| EditorError::io("Failed to read", path, err))?;
    let text = String::from_utf8(bytes).map_err(|err| {
        EditorError::io(
            "Failed to decode",
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, err.utf8_error()),
        )
    })?;
    let metadata = fs::metadata(path).map_err(|err| EditorError::io("Failed to stat", path, err))?;
    Ok(LoadedFile {
        text: normalize_line_endings(text),
        mode: permission_bits(&metadata),
        modified: metadata.modified().ok(),
    })
}

fn normalize_line_endings(text: String) -> String {
    if text.contains("\r\n") {
        text.replace("\r\n", "\n")
    } else {
        text
    }
}

/// Last modification time on disk, if the file exists.
pub fn file_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Everything a background save needs; owns its data so it can cross threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub path: PathBuf,
    pub text: String,
    pub mode: u32,
    /// Session revision the text was taken at.
    pub revision: u64,
}

/// Write a save request to disk.
///
/// # Errors
///
/// Returns [`EditorError::Io`] when writing or applying permissions fails.
pub fn save_file(request: &SaveRequest) -> Result<Option<SystemTime>, EditorError> {
    let path = request.path.as_path();
    fs::write(path, request.text.as_bytes())
        .map_err(|err| EditorError::io("Failed to write", path, err))?;
    apply_mode(path, request.mode).map_err(|err| EditorError::io("Failed to chmod", path, err))?;
    Ok(file_modified(path))
}

/// Sidecar path for autosaves: `.<basename>.autosave` next to the file.
pub fn autosave_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "untitled".to_string(), |n| n.to_string_lossy().into_owned());
    let sidecar = format!(".{name}.autosave");
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(sidecar),
        _ => PathBuf::from(sidecar),
    }
}

/// Write `text` to the autosave sidecar of `path`.
///
/// # Errors
///
/// Returns [`EditorError::Io`] when the sidecar cannot be written.
pub fn write_autosave(path: &Path, text: &str) -> Result<PathBuf, EditorError> {
    let sidecar = autosave_path(path);
    fs::write(&sidecar, text.as_bytes())
        .map_err(|err| EditorError::io("Failed to autosave", &sidecar, err))?;
    apply_mode(&sidecar, DEFAULT_FILE_MODE)
        .map_err(|err| EditorError::io("Failed to chmod", &sidecar, err))?;
    Ok(sidecar)
}

/// Remove the autosave sidecar of `path` if there is one.
///
/// # Errors
///
/// Returns [`EditorError::Io`] for failures other than the sidecar missing.
pub fn remove_autosave(path: &Path) -> Result<(), EditorError> {
    let sidecar = autosave_path(path);
    match fs::remove_file(&sidecar) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(EditorError::io("Failed to remove", sidecar, err)),
    }
}

/// A file argument with an optional 1-based position: `path`, `path:line`
/// or `path:line:col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub col: Option<usize>,
}

/// Split a `path[:line[:col]]` argument. Suffixes that are not numbers stay
/// part of the path.
///
/// # Errors
///
/// Returns [`EditorError::InvalidLocation`] when a line or column is zero.
pub fn parse_location(arg: &str) -> Result<Location, EditorError> {
    let mut path = arg;
    let mut numbers = Vec::new();
    while numbers.len() < 2 {
        let Some((head, tail)) = path.rsplit_once(':') else {
            break;
        };
        let Ok(n) = tail.parse::<usize>() else {
            break;
        };
        if head.is_empty() {
            break;
        }
        numbers.insert(0, n);
        path = head;
    }
    let (line, col) = match numbers.as_slice() {
        [line, col] => (Some(*line), Some(*col)),
        [line] => (Some(*line), None),
        _ => (None, None),
    };
    if line == Some(0) || col == Some(0) {
        return Err(EditorError::InvalidLocation {
            line: line.unwrap_or(1),
            col: col.unwrap_or(1),
        });
    }
    Ok(Location {
        path: PathBuf::from(path),
        line,
        col,
    })
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> u32 {
    DEFAULT_FILE_MODE
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_normalizes_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.text, "one\ntwo\n");
        assert!(loaded.modified.is_some());
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn test_autosave_path_is_hidden_sibling() {
        assert_eq!(
            autosave_path(Path::new("/src/main.lang")),
            PathBuf::from("/src/.main.lang.autosave")
        );
        assert_eq!(
            autosave_path(Path::new("main.lang")),
            PathBuf::from(".main.lang.autosave")
        );
    }

    #[test]
    fn test_save_writes_text_and_returns_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let request = SaveRequest {
            path: path.clone(),
            text: "hello\n".to_string(),
            mode: DEFAULT_FILE_MODE,
            revision: 1,
        };
        let modified = save_file(&request).unwrap();
        assert!(modified.is_some());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_applies_recorded_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let path = dir.path().join("script.sh");
        let request = SaveRequest {
            path: path.clone(),
            text: "echo hi\n".to_string(),
            mode: 0o755,
            revision: 1,
        };
        save_file(&request).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn test_write_and_remove_autosave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let sidecar = write_autosave(&path, "draft").unwrap();
        assert_eq!(fs::read_to_string(&sidecar).unwrap(), "draft");
        remove_autosave(&path).unwrap();
        assert!(!sidecar.exists());
        // Removing again is fine.
        remove_autosave(&path).unwrap();
    }

    #[test]
    fn test_parse_location_variants() {
        assert_eq!(
            parse_location("src/main.lang").unwrap(),
            Location {
                path: PathBuf::from("src/main.lang"),
                line: None,
                col: None,
            }
        );
        let loc = parse_location("main.lang:12").unwrap();
        assert_eq!((loc.line, loc.col), (Some(12), None));
        let loc = parse_location("main.lang:12:7").unwrap();
        assert_eq!(loc.path, PathBuf::from("main.lang"));
        assert_eq!((loc.line, loc.col), (Some(12), Some(7)));
    }

    #[test]
    fn test_parse_location_keeps_non_numeric_suffix() {
        let loc = parse_location("notes:draft").unwrap();
        assert_eq!(loc.path, PathBuf::from("notes:draft"));
        assert_eq!(loc.line, None);
    }

    #[test]
    fn test_parse_location_rejects_zero() {
        assert!(matches!(
            parse_location("main.lang:0"),
            Err(EditorError::InvalidLocation { line: 0, col: 1 })
        ));
    }
}
