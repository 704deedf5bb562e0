use std::path::Path;

use crate::error::{Error, Result};

/// Maximum accepted log file size (2 GiB, matching the original tooling).
const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "log", "logcat"];

/// Read a log file into non-empty, whitespace-trimmed lines.
///
/// Validates that the path exists, carries a supported extension, and stays
/// under the size cap. Files that are not valid UTF-8 are decoded as
/// Latin-1, so a stray byte never fails the whole read.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::InvalidInput(format!(
            "unsupported file extension: {:?} (expected one of {:?})",
            extension, SUPPORTED_EXTENSIONS
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(Error::InvalidInput(format!(
            "file size {} exceeds the {} byte limit",
            size, MAX_FILE_SIZE
        )));
    }

    let bytes = std::fs::read(path)?;
    let content = decode(bytes);

    Ok(content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// UTF-8 with Latin-1 fallback. Latin-1 maps every byte to the code point
/// of the same value, so the fallback cannot fail.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.as_bytes().iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn reads_lines_and_skips_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.log");
        std::fs::write(
            &path,
            "09-17 10:30:15.123 I CameraService: started\n\n  \n09-17 10:30:15.456 D CameraHAL: init\n",
        )
        .unwrap();

        let lines = read_log_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("09-17 10:30:15.123"));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_log_lines(&dir.path().join("absent.log")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, "{}").unwrap();

        let err = read_log_lines(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn latin1_fallback_recovers_non_utf8_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.log");
        let mut file = std::fs::File::create(&path).unwrap();
        // 0xE9 is 'é' in Latin-1 and invalid as a standalone UTF-8 byte.
        file.write_all(b"09-17 10:30:15.123 I Tag: caf\xE9\n").unwrap();
        drop(file);

        let lines = read_log_lines(&path).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("café"));
    }
}
