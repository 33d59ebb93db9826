use thiserror::Error;

/// Errors that can occur when talking to the cBioPortal API
#[derive(Error, Debug)]
pub enum PortalError {
    /// Network, timeout, or protocol failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("cBioPortal API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid URL error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PortalError {
    /// Create a new configuration error
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status reported by the upstream, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Type alias for Results using PortalError
pub type Result<T> = std::result::Result<T, PortalError>;
