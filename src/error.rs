use std::error::Error as StdError;

use thiserror::Error;

/// Timewipe's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Timewipe's crate-wide error type.
///
/// The timestamp transform itself never fails; these errors come from the layers around it
/// (reading input, rejecting files, encoding output).
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported transcript file '{name}' (expected .txt, .srt, .vtt, or .sbv)")]
    UnsupportedFile { name: String },

    #[error("unknown input format '{0}' (expected 'text', 'srt', 'vtt', or 'sbv')")]
    UnknownFormat(String),

    #[error("input is not valid UTF-8 text")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
