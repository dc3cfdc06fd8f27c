//! Adapter error types

use thiserror::Error;

use crate::protocol::ErrorCode;

/// Failures that end the session
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A rejected input line; answered with an `error` message and the session goes on
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    InvalidJson(String),
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("no {0} game in progress")]
    NoGame(&'static str),
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::InvalidJson(_) => ErrorCode::InvalidJson,
            ProtocolError::InvalidCommand(_) => ErrorCode::InvalidCommand,
            ProtocolError::NoGame(_) => ErrorCode::NoGame,
            ProtocolError::LineTooLong { .. } => ErrorCode::LineTooLong,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_syntax() || e.is_eof() {
            ProtocolError::InvalidJson(e.to_string())
        } else {
            ProtocolError::InvalidCommand(e.to_string())
        }
    }
}
