//! Upload persistence.
//!
//! Uploads are streamed into a uniquely named temp file inside the shared
//! directory and renamed over the target once complete, so readers never
//! observe a truncated file and a failed upload leaves nothing behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::resolver::validate_name;
use crate::Result;

/// Name prefix of in-flight upload temp files.
pub const TEMP_PREFIX: &str = ".lanshare-upload-";

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReceipt {
    /// Name the file was stored under.
    pub name: String,
    /// Final path of the stored file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
}

impl StoreReceipt {
    /// Confirmation shown to the uploader.
    pub fn message(&self) -> String {
        format!("The file {} is uploaded", self.name)
    }
}

/// Temp file that removes itself unless persisted.
struct TempUpload {
    path: PathBuf,
    file: Option<File>,
}

impl TempUpload {
    fn create(dir: &Path) -> io::Result<Self> {
        let path = dir.join(format!("{TEMP_PREFIX}{}", Uuid::new_v4()));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn write_from<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "temp file already closed"))?;

        let written = io::copy(reader, file)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn persist(mut self, target: &Path) -> io::Result<()> {
        // Close before renaming; required on Windows.
        drop(self.file.take());
        fs::rename(&self.path, target)?;
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.path.as_os_str().is_empty() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temp upload");
            }
        }
    }
}

/// Persist `reader` as `dir/name`, replacing any existing file.
pub fn store<R: Read>(dir: &Path, name: &str, mut reader: R) -> Result<StoreReceipt> {
    validate_name(name)?;

    let target = dir.join(name);
    let mut temp = TempUpload::create(dir)?;
    let bytes = temp.write_from(&mut reader)?;
    temp.persist(&target)?;

    Ok(StoreReceipt {
        name: name.to_string(),
        path: target,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LanshareError;
    use tempfile::TempDir;

    /// Reader that yields some bytes, then fails.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"));
            }
            self.sent = true;
            let data = b"partial";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_store_writes_content() {
        let temp_dir = TempDir::new().unwrap();

        let receipt = store(temp_dir.path(), "report.pdf", &b"XYZ"[..]).unwrap();

        assert_eq!(receipt.name, "report.pdf");
        assert_eq!(receipt.bytes, 3);
        assert_eq!(receipt.path, temp_dir.path().join("report.pdf"));
        assert_eq!(fs::read(&receipt.path).unwrap(), b"XYZ");
        assert_eq!(dir_names(temp_dir.path()), vec!["report.pdf"]);
    }

    #[test]
    fn test_store_message() {
        let temp_dir = TempDir::new().unwrap();

        let receipt = store(temp_dir.path(), "report.pdf", &b""[..]).unwrap();

        assert_eq!(receipt.message(), "The file report.pdf is uploaded");
    }

    #[test]
    fn test_store_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"old and longer content").unwrap();

        store(temp_dir.path(), "notes.txt", &b"new"[..]).unwrap();

        assert_eq!(fs::read(temp_dir.path().join("notes.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_store_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..=255).cycle().take(3 * 65536 + 17).collect();

        let receipt = store(temp_dir.path(), "blob.bin", content.as_slice()).unwrap();

        assert_eq!(receipt.bytes, content.len() as u64);
        assert_eq!(fs::read(receipt.path).unwrap(), content);
    }

    #[test]
    fn test_store_rejects_invalid_name() {
        let temp_dir = TempDir::new().unwrap();
        let inner = temp_dir.path().join("inner");
        fs::create_dir(&inner).unwrap();

        let result = store(&inner, "../escape.txt", &b"x"[..]);

        assert!(matches!(result, Err(LanshareError::InvalidName(_))));
        assert!(!temp_dir.path().join("escape.txt").exists());
        assert!(dir_names(&inner).is_empty());
    }

    #[test]
    fn test_failed_read_leaves_no_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.txt"), b"original").unwrap();

        let result = store(temp_dir.path(), "keep.txt", FailingReader { sent: false });

        assert!(matches!(result, Err(LanshareError::Io(_))));
        assert_eq!(fs::read(temp_dir.path().join("keep.txt")).unwrap(), b"original");
        assert_eq!(dir_names(temp_dir.path()), vec!["keep.txt"]);
    }

    #[test]
    fn test_store_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = store(&temp_dir.path().join("gone"), "a.txt", &b"x"[..]);

        assert!(matches!(result, Err(LanshareError::Io(_))));
    }
}
