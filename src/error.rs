//! Error types for loading, writing, and integrating phase data.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, PhaseError>;

#[derive(Debug, Error)]
pub enum PhaseError {
    /// The input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Any other failure while opening, reading, or writing a file.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that does not hold exactly two numeric tokens.
    #[error("could not parse line {line} ({content:?}): {reason}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The adaptive step shrank below the allowed minimum.
    #[error("step size underflow at t = {t}: h = {h:e}")]
    StepUnderflow { t: f64, h: f64 },

    #[error("exceeded {0} accepted steps")]
    TooManySteps(usize),

    #[error("solution is not finite at t = {t}")]
    NonFinite { t: f64 },
}

impl PhaseError {
    /// Map an io error on `path`, keeping NotFound as its own variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn parse(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_file_not_found() {
        let e = PhaseError::from_io(
            "results.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(e, PhaseError::FileNotFound { .. }));
        assert_eq!(e.to_string(), "file not found: results.txt");
    }

    #[test]
    fn other_io_kinds_stay_io() {
        let e = PhaseError::from_io(
            "results.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(e, PhaseError::Io { .. }));
    }

    #[test]
    fn parse_error_reports_line_and_content() {
        let e = PhaseError::parse(3, "abc 2.0", "invalid float literal");
        assert_eq!(
            e.to_string(),
            "could not parse line 3 (\"abc 2.0\"): invalid float literal"
        );
    }
}
