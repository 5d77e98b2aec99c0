use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// The result type of the API layers (client, service and source).
pub type ApiResult<T> = Result<T, ApiError>;

/// A failure while talking to the remote API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection, timeout, TLS or request building failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside of the success range
    #[error("HTTP status error: {status} {}", .reason.as_deref().unwrap_or("<unknown reason>"))]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase of the status, if any.
        reason: Option<String>,
    },

    /// The response body does not have the expected shape
    #[error("Decoding error: {0}")]
    Decode(String),
}

/// API error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network error
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Anything that could not be classified as a network error
    #[error("Unknown error")]
    Unknown,
}

impl ApiError {
    /// Returns the underlying cause description, if any.
    pub fn cause(&self) -> Option<String> {
        match self {
            ApiError::Network(NetworkError::Transport(cause))
            | ApiError::Network(NetworkError::Decode(cause)) => Some(cause.to_owned()),
            ApiError::Network(NetworkError::HttpStatus { reason, .. }) => reason.to_owned(),
            ApiError::Unknown => None,
        }
    }

    /// Returns a human readable description suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(NetworkError::Transport(cause)) => {
                format!("Unable to reach the server: {cause}")
            }
            ApiError::Network(NetworkError::HttpStatus { status: 404, .. }) => {
                "Not found: the requested user or repositories do not exist (HTTP 404)".to_string()
            }
            ApiError::Network(NetworkError::HttpStatus { status: 403, .. }) => {
                "Access forbidden by the server (HTTP 403)".to_string()
            }
            ApiError::Network(NetworkError::HttpStatus { status, .. }) if *status >= 500 => {
                format!("The server failed to answer the request (HTTP {status})")
            }
            ApiError::Network(NetworkError::HttpStatus { status, reason }) => match reason {
                Some(reason) => format!("Request failed: {reason} (HTTP {status})"),
                None => format!("Request failed (HTTP {status})"),
            },
            ApiError::Network(NetworkError::Decode(cause)) => {
                format!("Unable to read the server response: {cause}")
            }
            ApiError::Unknown => "Unknown error".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return NetworkError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().map(|reason| reason.to_string()),
            }
            .into();
        }
        if error.is_decode() {
            return NetworkError::Decode(error.to_string()).into();
        }
        if error.is_timeout()
            || error.is_connect()
            || error.is_request()
            || error.is_body()
            || error.is_builder()
            || error.is_redirect()
        {
            return NetworkError::Transport(error.to_string()).into();
        }

        ApiError::Unknown
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        NetworkError::Decode(error.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_is_descriptive() {
        let error: ApiError = NetworkError::HttpStatus {
            status: 404,
            reason: Some("Not Found".to_string()),
        }
        .into();

        assert!(error.user_message().starts_with("Not found"));
        assert_eq!(Some("Not Found".to_string()), error.cause());
    }

    #[test]
    fn server_error_message_mentions_status() {
        let error: ApiError = NetworkError::HttpStatus {
            status: 503,
            reason: None,
        }
        .into();

        assert_eq!(
            "The server failed to answer the request (HTTP 503)",
            error.user_message()
        );
    }

    #[test]
    fn other_status_message_uses_reason_when_known() {
        let error: ApiError = NetworkError::HttpStatus {
            status: 422,
            reason: Some("Unprocessable Entity".to_string()),
        }
        .into();

        assert_eq!(
            "Request failed: Unprocessable Entity (HTTP 422)",
            error.user_message()
        );
    }

    #[test]
    fn json_errors_are_classified_as_decode_errors() {
        let json_error = serde_json::from_str::<Vec<u64>>("{").unwrap_err();

        let error: ApiError = json_error.into();

        assert!(matches!(error, ApiError::Network(NetworkError::Decode(_))));
    }

    #[test]
    fn unknown_error_has_no_cause() {
        assert_eq!(None, ApiError::Unknown.cause());
        assert_eq!("Unknown error", ApiError::Unknown.user_message());
    }
}
