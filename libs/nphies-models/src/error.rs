//! Error types for NPHIES models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
