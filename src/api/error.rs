use thiserror::Error;

/// Client-side error taxonomy for every backend call.
///
/// `Auth` is the only variant that may tear down the session; transport
/// problems (`Network`, `Timeout`) are kept separate so callers can decide
/// not to clear stored tokens on a transient failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unable to reach the server: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("authentication required ({status})")]
    Auth { status: u16 },
    #[error("request rejected ({status}): {message}")]
    Validation { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// True for failures where the request may never have reached the
    /// backend, the only class retried for idempotent GETs.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_covers_network_and_timeout() {
        assert!(ApiError::Timeout.is_transport());
        assert!(ApiError::Network("refused".to_string()).is_transport());
        assert!(!ApiError::Auth { status: 401 }.is_transport());
        assert!(!ApiError::Server {
            status: 500,
            message: String::new()
        }
        .is_transport());
    }

    #[test]
    fn auth_is_only_401_class() {
        assert!(ApiError::Auth { status: 403 }.is_auth());
        assert!(!ApiError::Validation {
            status: 400,
            message: String::new()
        }
        .is_auth());
    }
}
