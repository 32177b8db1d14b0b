//! JSON codec for model files
//!
//! Every engine model file (`.yy`) is pretty-printed JSON. These helpers are
//! the only place the crate touches the filesystem.

use crate::errors::ManifestError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Write a model to `output_path` as pretty JSON, creating parent directories
pub fn write_to_path<T: Serialize>(model: &T, output_path: &Path) -> Result<(), ManifestError> {
    debug!("Writing model file: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(model).map_err(ManifestError::Serialize)?;
    {
        let file = fs::File::create(output_path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }

    info!("Model written to: {:?}", output_path);
    Ok(())
}

/// Read a model from `manifest_path`
pub fn read_from_path<T: DeserializeOwned>(manifest_path: &Path) -> Result<T, ManifestError> {
    debug!("Reading model file: {:?}", manifest_path);

    let content = fs::read_to_string(manifest_path)?;
    // Files saved by the IDE on Windows may carry a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let model = serde_json::from_str(content)?;

    Ok(model)
}
