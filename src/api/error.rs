use serde::Deserialize;
use thiserror::Error;

/// Fallback shown when neither the server nor the transport says anything useful
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Errors returned by the reviews API client.
///
/// Kept `Clone` (messages only) so results can travel inside UI messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response, with the server's `msg` when it sent one
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Transport(message) | ApiError::Decode(message) => message.trim(),
            ApiError::Status { message, .. } => message.trim(),
        };

        if message.is_empty() {
            GENERIC_MESSAGE.to_string()
        } else {
            message.to_string()
        }
    }

    /// Build a status error from a raw response body
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ServerMessage {
            msg: String,
        }

        let message = serde_json::from_str::<ServerMessage>(body)
            .map(|m| m.msg)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        ApiError::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
