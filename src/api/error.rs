use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Structured error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Bad local input, caught before any network call is issued.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The backend answered with a non-2xx status. `message` carries the
    /// backend's structured error text when one was provided.
    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },
    /// The request never produced a usable response (connect, timeout,
    /// body decode).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Status 401 on an authenticated call means the session token is no
    /// longer accepted and the client must return to login.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ApiError::Remote {
                status: 401,
                ..
            }
        )
    }

    /// Builds the `Remote` variant from a non-2xx response body, falling
    /// back to the HTTP reason phrase when the body is not the structured
    /// `{"error": ...}` shape.
    pub(crate) fn remote(status: StatusCode, body: &[u8]) -> ApiError {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        ApiError::Remote {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_extracts_backend_message() {
        let err = ApiError::remote(
            StatusCode::UNAUTHORIZED,
            br#"{"error": "unauthorized", "reason": "missing_or_invalid_token"}"#,
        );
        assert_eq!(
            err,
            ApiError::Remote {
                status: 401,
                message: "unauthorized".to_string()
            }
        );
        assert!(err.is_session_expired());
    }

    #[test]
    fn remote_error_falls_back_to_reason_phrase() {
        let err = ApiError::remote(StatusCode::BAD_GATEWAY, b"<html>upstream died</html>");
        assert_eq!(
            err,
            ApiError::Remote {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
        assert!(!err.is_session_expired());
    }

    #[test]
    fn only_remote_401_counts_as_expiry() {
        assert!(!ApiError::Validation("empty password".into()).is_session_expired());
        assert!(!ApiError::Transport("connection refused".into()).is_session_expired());
        let forbidden = ApiError::Remote {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(!forbidden.is_session_expired());
    }
}
