//! Errors from reading and writing data files

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON encode error: {0}")]
    RonEncode(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vault version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
