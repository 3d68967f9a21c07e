//! Client-side error taxonomy.
//!
//! Every variant ends up as a user-visible `Failed(message)` state or notice; none of
//! them are fatal to the process.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Blank submission. Handled locally, never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response. `message` is the server's `detail` when it sent one.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// Connection failure, timeout, or a body that did not parse.
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Request { .. } => "request",
            Self::Transport(_) => "transport",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Transport(format!("Request timed out: {e}"));
        }
        if e.is_decode() {
            return Self::Transport(format!("Malformed response body: {e}"));
        }
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport(format!("Malformed response body: {e}"))
    }
}
