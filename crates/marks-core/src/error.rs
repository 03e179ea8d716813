//! API error taxonomy
//!
//! Every call through the API client ends in `Ok(payload)` or one of three
//! failure kinds. Stores collapse all of them into a single message string.

use thiserror::Error;

/// Failure of a single API round-trip
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}{}", message_suffix(.message))]
    Server {
        status: u16,
        /// The `error` field of the response body, when there was one
        message: Option<String>,
    },

    /// The server answered successfully but the body did not decode
    #[error("Unexpected response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Text the server itself reported, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Message to show a user: the server's text, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;
