//! Directory enumeration.
//!
//! A single non-recursive scan of the shared directory producing one
//! [`FileEntry`] per regular file.

use std::fs;
use std::io;
use std::path::Path;

use uuid::Uuid;

use super::storage::TEMP_PREFIX;
use crate::Result;

/// Files whose name contains this (case-insensitively) are never listed.
///
/// Keeps the server's own binary and scripts out of the listing when it
/// runs from inside the shared directory.
pub const EXCLUDED_SUBSTRING: &str = "server";

/// A listed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, unique within the directory.
    pub name: String,
    /// Size in bytes at enumeration time.
    pub size: u64,
    /// Human-readable size, e.g. `"0.50 KB"`.
    pub size_label: String,
}

impl FileEntry {
    /// Create an entry, deriving the size label.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            size_label: format_size_kb(size),
        }
    }
}

/// Format a byte count as kilobytes with two decimals.
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Whether a directory entry name may appear in a listing.
pub fn is_listed_name(name: &str) -> bool {
    !name.to_lowercase().contains(EXCLUDED_SUBSTRING) && !is_temp_upload(name)
}

/// Whether `name` is an in-flight upload: the temp prefix followed by a UUID.
fn is_temp_upload(name: &str) -> bool {
    name.strip_prefix(TEMP_PREFIX)
        .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
}

/// List the regular files directly inside `dir`.
///
/// Order is whatever the filesystem yields. Entries that vanish or turn out
/// to be dangling symlinks mid-scan are skipped.
pub fn list_dir(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        // Names that are not UTF-8 cannot be requested back through a URL.
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };

        if !is_listed_name(&name) {
            continue;
        }

        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        if metadata.is_file() {
            entries.push(FileEntry::new(name, metadata.len()));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size_kb(0), "0.00 KB");
        assert_eq!(format_size_kb(512), "0.50 KB");
        assert_eq!(format_size_kb(1024), "1.00 KB");
        assert_eq!(format_size_kb(1536), "1.50 KB");
        assert_eq!(format_size_kb(1000), "0.98 KB");
        assert_eq!(format_size_kb(10 * 1024 * 1024), "10240.00 KB");
    }

    #[test]
    fn test_is_listed_name() {
        assert!(is_listed_name("a.txt"));
        assert!(!is_listed_name("server.py"));
        assert!(!is_listed_name("MyServer.exe"));
        assert!(!is_listed_name("lanshare-SERVER"));
        assert!(is_listed_name(".hidden"));
    }

    #[test]
    fn test_temp_uploads_are_hidden() {
        let temp_name = format!("{TEMP_PREFIX}{}", Uuid::new_v4());
        assert!(!is_listed_name(&temp_name));

        assert!(is_listed_name(".lanshare-upload-1234"));
        assert!(is_listed_name(".lanshare-upload-notes.txt"));
        assert!(is_listed_name(TEMP_PREFIX));
    }

    #[test]
    fn test_list_shows_lookalike_of_temp_upload() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".lanshare-upload-notes.txt"), b"mine").unwrap();
        fs::write(
            temp_dir.path().join(format!("{TEMP_PREFIX}{}", Uuid::new_v4())),
            b"in flight",
        )
        .unwrap();

        let entries = list_dir(temp_dir.path()).unwrap();

        assert_eq!(names(&entries), vec![".lanshare-upload-notes.txt"]);
    }

    #[test]
    fn test_list_excludes_server_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![b'a'; 512]).unwrap();
        fs::write(temp_dir.path().join("server.py"), vec![b's'; 2048]).unwrap();

        let entries = list_dir(temp_dir.path()).unwrap();

        assert_eq!(entries, vec![FileEntry::new("a.txt", 512)]);
        assert_eq!(entries[0].size_label, "0.50 KB");
    }

    #[test]
    fn test_list_excludes_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("inner.txt"), b"x").unwrap();
        fs::write(temp_dir.path().join("top.txt"), b"xy").unwrap();

        let entries = list_dir(temp_dir.path()).unwrap();

        assert_eq!(names(&entries), vec!["top.txt"]);
    }

    #[test]
    fn test_list_one_entry_per_file() {
        let temp_dir = TempDir::new().unwrap();
        for (name, size) in [("one.bin", 1usize), ("two.bin", 2048), ("three.bin", 3000)] {
            fs::write(temp_dir.path().join(name), vec![0u8; size]).unwrap();
        }

        let entries = list_dir(temp_dir.path()).unwrap();

        assert_eq!(names(&entries), vec!["one.bin", "three.bin", "two.bin"]);
        for entry in &entries {
            assert_eq!(entry.size_label, format_size_kb(entry.size));
        }
        let three = entries.iter().find(|e| e.name == "three.bin").unwrap();
        assert_eq!(three.size_label, "2.93 KB");
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        assert!(list_dir(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = list_dir(&temp_dir.path().join("gone"));

        assert!(matches!(result, Err(crate::LanshareError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_skips_dangling_symlink() {
        let temp_dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("nowhere"),
            temp_dir.path().join("broken.txt"),
        )
        .unwrap();
        fs::write(temp_dir.path().join("real.txt"), b"x").unwrap();

        let entries = list_dir(temp_dir.path()).unwrap();

        assert_eq!(names(&entries), vec!["real.txt"]);
    }
}
