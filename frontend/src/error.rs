//! Failures of the prediction round trip and how they are shown to the user.

use thiserror::Error;

/// Shown when neither the server nor the transport supplied a message.
pub const FALLBACK_ERROR: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum PredictionError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("prediction service returned {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// A success response whose body is not a JSON object of numbers.
    #[error("unexpected prediction response: {0}")]
    Decode(String),
}

impl PredictionError {
    pub fn status(status: u16, message: Option<String>) -> Self {
        Self::Status { status, message }
    }

    /// Text for the error region of the page.
    pub fn display_message(&self) -> String {
        match self {
            PredictionError::Status { message, .. } => resolve_error_message(message.as_deref(), None),
            other => resolve_error_message(None, Some(other.to_string().as_str())),
        }
    }
}

/// Server-supplied `error` field first, then the transport message, then the fallback.
pub fn resolve_error_message(server_message: Option<&str>, transport_message: Option<&str>) -> String {
    server_message
        .filter(|m| !m.is_empty())
        .or(transport_message.filter(|m| !m.is_empty()))
        .unwrap_or(FALLBACK_ERROR)
        .to_string()
}
