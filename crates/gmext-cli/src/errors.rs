//! Error type for the gmextpack binary
//!
//! Library errors are wrapped as-is; archive and workspace failures carry
//! the path they concern.

use gmext_config::ConfigError;
use gmext_convert::ConvertError;
use gmext_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk package directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> CliError {
        let path = path.into();
        move |source| CliError::Io { path, source }
    }
}
