/// Error types for threadgrep.
///
/// Errors fall into two groups. Configuration and pool errors are returned
/// from the entry points before any file is scanned. Per-file errors
/// (`FileNotFound`, `PermissionDenied`, `IoError`) are produced while scanning
/// and never escape a batch: the scanner turns them into advisory messages
/// and moves on to the next file.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Self::WorkerPool(msg.into())
    }

    /// Classifies an I/O error raised while opening or reading `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("test.txt");
        let err = SearchError::file_not_found(path);
        assert!(matches!(err, SearchError::FileNotFound(_)));

        let err = SearchError::permission_denied(path);
        assert!(matches!(err, SearchError::PermissionDenied(_)));

        let err = SearchError::invalid_pattern("empty query");
        assert!(matches!(err, SearchError::InvalidPattern(_)));

        let err = SearchError::worker_pool("could not spawn thread");
        assert!(matches!(err, SearchError::WorkerPool(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_pattern("query must not be empty");
        assert_eq!(err.to_string(), "Invalid pattern: query must not be empty");

        let err = SearchError::config_error("root is not a directory");
        assert_eq!(
            err.to_string(),
            "Configuration error: root is not a directory"
        );

        let err = SearchError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");
    }

    #[test]
    fn test_from_io_classification() {
        let path = Path::new("gone.txt");

        let err = SearchError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SearchError::FileNotFound(p) if p == path));

        let err = SearchError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, SearchError::PermissionDenied(p) if p == path));

        let err = SearchError::from_io(path, io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert!(matches!(err, SearchError::IoError(_)));
    }
}
