use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API url {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Maps a non-success response. `message` is the server's `message` field
    /// when the body had one.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::Validation(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound(message),
            status if status.is_server_error() => Self::Server {
                status: status.as_u16(),
                message,
            },
            status => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Validation(_) => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Server { status, .. } | Self::Status { status, .. } => {
                StatusCode::from_u16(*status).ok()
            }
            Self::Transport(e) => e.status(),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let message = || "Rating must be between 1 and 5".to_string();

        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, message()),
            ClientError::Validation(m) if m == message()
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, message()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, message()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, message()),
            ClientError::Server { status: 502, .. }
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::CONFLICT, message()),
            ClientError::Status { status: 409, .. }
        ));
    }

    #[test]
    fn test_status_round_trip() {
        let error = ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, String::new());

        assert_eq!(error.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(ClientError::Unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_validation_displays_server_message() {
        let error = ClientError::Validation("Comment is required".into());

        assert_eq!(error.to_string(), "Comment is required");
    }
}
