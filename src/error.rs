//! Error types for LANSHARE.

use thiserror::Error;

/// Common error type for LANSHARE.
#[derive(Error, Debug)]
pub enum LanshareError {
    /// I/O error.
    ///
    /// Any filesystem failure while listing, probing or writing the shared
    /// directory ends up here.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requested or uploaded filename that cannot name a file directly
    /// inside the shared directory.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for LANSHARE operations.
pub type Result<T> = std::result::Result<T, LanshareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_display() {
        let err = LanshareError::InvalidName("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "invalid file name: \"../etc/passwd\"");
    }

    #[test]
    fn test_config_error_display() {
        let err = LanshareError::Config("root is not a directory".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: root is not a directory"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LanshareError = io_err.into();
        assert!(matches!(err, LanshareError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(LanshareError::InvalidName(String::new()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
