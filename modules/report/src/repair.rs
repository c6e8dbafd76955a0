//! Re-encoding of scanner JSON output.
//!
//! The scanner writes JSON with non-ASCII text escaped (`\uXXXX`), which is
//! unreadable when the report is in Japanese. Rewriting each file through
//! `serde_json` produces literal UTF-8 without changing any value.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use webscan_core::fsutil::write_atomic;

/// Repair every `*.json` file directly under the run directory.
///
/// Per-file failures are logged and skipped so one corrupt file never
/// blocks the rest of the batch. A missing or empty directory is fine.
/// Returns the number of files rewritten.
pub fn repair_run_dir(run_dir: &Path) -> usize {
    let entries = match fs::read_dir(run_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %run_dir.display(), %err, "cannot read run directory");
            return 0;
        }
    };

    let mut repaired = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match repair_file(&path) {
            Ok(()) => {
                debug!(file = %path.display(), "re-encoded report file");
                repaired += 1;
            }
            Err(err) => warn!(file = %path.display(), %err, "report repair skipped"),
        }
    }
    repaired
}

fn repair_file(path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let pretty = serde_json::to_string_pretty(&value)?;
    write_atomic(path, pretty.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webscan_core::fsutil::tmp_sibling;

    #[test]
    fn rewrites_escaped_text_as_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan-report.json");
        fs::write(&path, "{\"alert\": \"\\u30c6\\u30b9\\u30c8\"}").unwrap();

        assert_eq!(repair_run_dir(dir.path()), 1);

        let repaired = fs::read_to_string(&path).unwrap();
        assert!(repaired.contains("テスト"));
        assert!(!repaired.contains("\\u30c6"));
        // Value is unchanged by the re-encode.
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["alert"], "テスト");
        assert!(!tmp_sibling(&path).exists());
    }

    #[test]
    fn corrupt_file_is_skipped_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("good.json"), r#"{"ok": true}"#).unwrap();

        assert_eq!(repair_run_dir(dir.path()), 1);
        // Broken file is left untouched.
        assert_eq!(
            fs::read_to_string(dir.path().join("broken.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn non_json_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scan-report.html"), "<html>").unwrap();
        assert_eq!(repair_run_dir(dir.path()), 0);
    }

    #[test]
    fn missing_directory_tolerated() {
        assert_eq!(repair_run_dir(Path::new("/nonexistent/run-dir")), 0);
    }
}
