//! GameMaker extension models
//!
//! This crate holds the typed on-disk models that gmextpack converts between:
//! the flat extension descriptor (`extension` module) and the exploded asset
//! package (`asset_package` module), plus the `VariableType` registry both
//! of them use for function signatures.
//!
//! Models are stored as pretty-printed JSON `.yy` files; missing fields read
//! back as defaults.

pub mod asset_package;
pub mod errors;
pub mod extension;
pub mod manifest_writer;
pub mod types;

pub use asset_package::{AssetPackageModel, Resource, ScriptModel};
pub use extension::{
    ExtensionConstantModel, ExtensionFileModel, ExtensionFunctionModel, ExtensionKind,
    ExtensionModel, FrameworkEntryModel, ProxyFileModel,
};
pub use types::{ModelHeader, VariableType};

pub use errors::ManifestError;

pub use manifest_writer::{read_from_path, write_to_path};
