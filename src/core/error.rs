use thiserror::Error;

/// Failure kinds surfaced by a balance lookup. All of them are recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Unsupported address type: {0}")]
    UnsupportedType(String),

    #[error("Request for {target} timed out.")]
    Timeout { target: String },

    #[error("API responded with status {status}. Message: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network or API error: {0}.")]
    Network(String),
}

impl LookupError {
    pub(crate) fn upstream(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            "No additional message.".to_string()
        } else {
            body
        };
        LookupError::Upstream { status, message }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            LookupError::Timeout { .. } => ErrorKind::Timeout,
            LookupError::Upstream { .. } => ErrorKind::Upstream,
            LookupError::Network(_) => ErrorKind::Network,
        }
    }
}

/// Payload-free discriminant of [`LookupError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedType,
    Timeout,
    Upstream,
    Network,
    /// The request itself could not be understood.
    InvalidRequest,
}

pub type Result<T> = std::result::Result<T, LookupError>;
