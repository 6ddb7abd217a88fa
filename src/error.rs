// Error kinds surfaced by the scanner client.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure a client operation can report. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The service could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The service answered with something we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A parameter or device index was rejected before talking to the service.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The service reported that the scan itself failed.
    #[error("scan failed: {0}")]
    Scan(String),

    /// No answer within the configured HTTP timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The requested file does not exist on the server.
    #[error("file not found on server: {0}")]
    NotFound(String),

    /// Writing a downloaded file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_decode() {
            Error::Protocol(err.to_string())
        } else {
            Error::Connection(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
