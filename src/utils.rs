//! Utility functions for string truncation and file system checks.
//!
//! - Truncation of long strings for logs and table cells (UTF-8 safe, the
//!   press we read is French)
//! - File system validation for output directories

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Name of the throwaway file used to test a directory for writes.
const WRITE_CHECK_FILE: &str = ".press_watch_write_check";

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters and appends `"…(+N bytes)"` with the
/// number of bytes dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Shorten a table cell to `width` characters, marking the cut with `…`.
pub fn truncate_cell(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes an empty
/// marker file in it.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The marker file cannot be created (permission denied, read-only
///   filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let marker = Path::new(path).join(WRITE_CHECK_FILE);
    fs::File::create(&marker).await?;
    if let Err(e) = fs::remove_file(&marker).await {
        debug!(marker = %marker.display(), error = %e, "Could not remove write-check marker");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        let result = truncate_for_log("éééé", 2);
        assert_eq!(result, "éé…(+4 bytes)");
    }

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell("Festival", 20), "Festival");
        assert_eq!(truncate_cell("Harcèlement", 6), "Harcè…");
        assert_eq!(truncate_cell("abc", 0), "");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let dir = std::env::temp_dir().join(format!("press_watch_writable_{}", std::process::id()));
        let path = dir.join("nested");
        let path_str = path.to_str().unwrap();

        ensure_writable_dir(path_str).await.unwrap();
        assert!(path.is_dir());
        assert!(!path.join(WRITE_CHECK_FILE).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
