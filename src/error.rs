//! Error types for the room state store.

use thiserror::Error;

/// Main error type for room state operations.
///
/// Only caller contract violations surface here. Malformed payloads from
/// remote peers are tolerated and reported through outcome values instead.
#[derive(Debug, Error)]
pub enum RoomStateError {
    #[error("Invalid argument: expected event type {expected}, got {got}")]
    InvalidArgument { expected: String, got: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for RoomStateError {
    fn from(e: serde_json::Error) -> Self {
        RoomStateError::Deserialization(e.to_string())
    }
}

/// Result type for room state operations.
pub type Result<T> = std::result::Result<T, RoomStateError>;
