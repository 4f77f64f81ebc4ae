use std::path::PathBuf;
use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("{}:{}: {}", .path.display(), .line, .message)]
    Scan {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    #[error("Invalid platform vocabulary: {0}")]
    InvalidVocabulary(String),
}

impl GenError {
    /// Create a scan error pointing at a line of a source file
    pub fn scan(path: impl Into<PathBuf>, line: usize, message: impl ToString) -> Self {
        Self::Scan {
            path: path.into(),
            line,
            message: message.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
