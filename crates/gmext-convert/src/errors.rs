use gmext_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a whole conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Cannot convert extension file '{filename}' to package: only .gml sources are supported")]
    UnsupportedSourceKind { filename: String },

    #[error("Invalid function name '{name}' in '{filename}'")]
    InvalidUnitName { name: String, filename: String },

    #[error("Function '{name}' in '{filename}' uses a name reserved for package init/macros scripts")]
    ReservedNameCollision { name: String, filename: String },

    #[error("Extension file '{filename}' would write package script '{name}' a second time")]
    DuplicatePseudoUnit { name: String, filename: String },

    #[error("Package manifest not found: {}", path.display())]
    MissingPackageManifest { path: PathBuf },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> ConvertError {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}
