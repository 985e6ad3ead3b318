//! Filename validation and path resolution.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{LanshareError, Result};

/// Outcome of resolving a requested filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Path inside the shared directory.
    pub path: PathBuf,
    /// Whether a regular file exists at `path`.
    pub exists: bool,
}

/// Check that `name` names a file directly inside the shared directory.
///
/// Rejects empty names, `.` and `..`, path separators of any platform,
/// control characters, and anything that is not exactly one normal path
/// component (drive prefixes, roots).
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = || LanshareError::InvalidName(name.to_string());

    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid());
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if component == OsStr::new(name) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Resolve `name` against `base` and probe for a regular file.
///
/// A missing file is reported through `exists`, not as an error.
pub fn resolve(base: &Path, name: &str) -> Result<Resolved> {
    validate_name(name)?;

    let path = base.join(name);
    let exists = match fs::metadata(&path) {
        Ok(metadata) => metadata.is_file(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    Ok(Resolved { path, exists })
}
