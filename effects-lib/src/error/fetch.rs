//! Data loading error types

/// Errors that can occur while loading the record list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status text or response body.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Reading a local data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not a valid record list.
    #[error("Payload parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
}

impl FetchError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
