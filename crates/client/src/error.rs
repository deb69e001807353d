use thiserror::Error;

/// Failure taxonomy for every client operation.
///
/// `AuthExpired` is special: by the time the caller sees it, the request
/// pipeline has already torn down the local session and notified the
/// auth-expired hook. The error still propagates so the caller's own
/// error reporting fires as well.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected our token (HTTP 401). Session already cleared.
    #[error("{message}")]
    AuthExpired { message: String },

    /// Any other non-2xx response, carrying the server-supplied message
    /// when one was present.
    #[error("{}", message.as_deref().unwrap_or("API error"))]
    Api { status: u16, message: Option<String> },

    /// Client-side validation failure. No request was issued.
    #[error("{0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The local session store could not be read or written.
    #[error("session store error: {0}")]
    Store(String),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// True when the failure means the user has to log in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired { .. })
    }
}
