//! Locating log files on disk.

use crate::constants::LOG_EXTENSIONS;
use crate::error::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Collect log files from files and directories.
///
/// Directories are searched recursively in name order. Explicit file
/// arguments are kept whatever their extension; missing paths are skipped
/// with a warning.
pub fn collect_log_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_log_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_log_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_log_files_recursive(&path, files)?;
        } else if is_log_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported log extension.
pub fn is_log_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        LOG_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}

/// Default log name for a file: its stem, lossily decoded.
pub fn default_log_name(path: &Path) -> String {
    path.file_stem()
        .map_or(Cow::Borrowed("log"), |s| s.to_string_lossy())
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_log_file() {
        assert!(is_log_file(Path::new("site.csv")));
        assert!(is_log_file(Path::new("SITE.CSV")));
        assert!(is_log_file(Path::new("mittaus_ääni.csv")));
        assert!(!is_log_file(Path::new("notes.txt")));
        assert!(!is_log_file(Path::new("csv")));
    }

    #[test]
    fn test_default_log_name() {
        assert_eq!(default_log_name(Path::new("/data/north.csv")), "north");
        assert_eq!(default_log_name(Path::new("/")), "log");
    }

    #[test]
    fn test_collect_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("week2");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.csv"), "").unwrap();
        std::fs::write(dir.path().join("a.csv"), "").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "").unwrap();
        std::fs::write(nested.join("c.csv"), "").unwrap();

        let files = collect_log_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files.iter().map(|p| default_log_name(p)).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_collect_skips_missing_and_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("export.txt");
        std::fs::write(&explicit, "").unwrap();

        let files =
            collect_log_files(&[dir.path().join("missing.csv"), explicit.clone()]).unwrap();
        assert_eq!(files, vec![explicit]);
    }
}
