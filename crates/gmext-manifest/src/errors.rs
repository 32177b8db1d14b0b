use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing model files
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(serde_json::Error),
}
