//! Error types for sparse matrix and graph file I/O
//!
//! Every failure is terminal for the operation that raised it. Errors carry
//! the file name and, where it makes sense, the 1-based line number or the
//! found/expected counts so callers can report precisely.

use std::path::Path;
use thiserror::Error;

/// Errors raised while reading or writing matrix and graph files
#[derive(Error, Debug)]
pub enum FormatError {
    /// A header or line is structurally invalid
    #[error("bad file '{file}' at line {line}: {msg}")]
    BadFile {
        file: String,
        line: usize,
        msg: String,
    },

    /// The file ended before the declared number of rows or entries was found
    #[error("unexpected end of '{file}': only found {found}/{expected} {what}")]
    Eof {
        file: String,
        found: usize,
        expected: usize,
        what: &'static str,
    },

    /// The caller passed an argument the format cannot honor
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// Operations were called in an invalid order
    #[error("bad file state for '{file}': {msg}")]
    BadFileState { file: String, msg: String },

    /// No format is registered for the file's extension
    #[error("unknown file extension: '{0}'")]
    UnknownExtension(String),

    /// Rows were requested before the header information was negotiated
    #[error("info not set: {0}")]
    UnsetInfo(String),

    /// The operating system refused an open, read, seek or write
    #[error("i/o error on '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn bad_file(file: &Path, line: usize, msg: impl Into<String>) -> Self {
        FormatError::BadFile {
            file: file.display().to_string(),
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn eof(file: &Path, found: usize, expected: usize, what: &'static str) -> Self {
        FormatError::Eof {
            file: file.display().to_string(),
            found,
            expected,
            what,
        }
    }

    pub(crate) fn bad_state(file: &Path, msg: impl Into<String>) -> Self {
        FormatError::BadFileState {
            file: file.display().to_string(),
            msg: msg.into(),
        }
    }

    pub(crate) fn io(file: &Path, source: std::io::Error) -> Self {
        FormatError::Io {
            file: file.display().to_string(),
            source,
        }
    }

    /// The 1-based line number this error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::BadFile { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for file I/O operations
pub type Result<T> = std::result::Result<T, FormatError>;
