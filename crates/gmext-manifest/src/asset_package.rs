//! Asset package models
//!
//! An asset package is a directory (shipped as a zip archive) holding one
//! script pair per function plus an `assetpackage.yy` manifest enumerating
//! them as typed resources.

use crate::types::ModelHeader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the package manifest at the package root
pub const MANIFEST_FILE_NAME: &str = "assetpackage.yy";

/// Directory holding the script pairs, relative to the package root
pub const SCRIPTS_DIR: &str = "scripts";

/// Resource type tag for scripts
pub const SCRIPT_RESOURCE_TYPE: &str = "GMScript";

/// Package manifest (`assetpackage.yy`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPackageModel {
    pub description: String,
    pub helpfile: String,
    pub license: String,
    pub name: String,
    #[serde(rename = "packageID")]
    pub package_id: String,
    #[serde(rename = "packageType")]
    pub package_type: String,
    #[serde(rename = "projectType")]
    pub project_type: String,
    #[serde(rename = "publisherName")]
    pub publisher_name: String,
    pub resources: Vec<Resource>,
    pub version: String,
}

impl Default for AssetPackageModel {
    fn default() -> Self {
        AssetPackageModel {
            description: String::new(),
            helpfile: String::new(),
            license: String::new(),
            name: String::new(),
            package_id: String::new(),
            package_type: String::new(),
            project_type: String::new(),
            publisher_name: String::new(),
            resources: Vec::new(),
            version: "1.0.0".to_string(),
        }
    }
}

/// One typed resource entry of a package manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub id: Uuid,
    #[serde(rename = "resourcePath")]
    pub resource_path: String,
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "viewPath")]
    pub view_path: String,
}

impl Default for Resource {
    fn default() -> Self {
        Resource {
            id: Uuid::new_v4(),
            resource_path: String::new(),
            resource_type: String::new(),
            view_path: String::new(),
        }
    }
}

impl Resource {
    /// Script resource `name`, grouped under the view of package `view`
    pub fn new_script(name: &str, view: &str) -> Self {
        Resource {
            resource_path: format!("{SCRIPTS_DIR}\\{name}\\{name}.yy"),
            resource_type: SCRIPT_RESOURCE_TYPE.to_string(),
            view_path: format!("{SCRIPTS_DIR}\\{view}"),
            ..Default::default()
        }
    }

    /// Resource path split into components, accepting `\` and `/`
    fn path_components(&self) -> impl Iterator<Item = &str> {
        self.resource_path
            .split(['\\', '/'])
            .filter(|part| !part.is_empty())
    }

    /// Path of the resource's metadata file below `root`
    ///
    /// `None` when the resource path is absolute or climbs out of `root`.
    pub fn resolve(&self, root: &Path) -> Option<PathBuf> {
        if self.resource_path.starts_with(['\\', '/']) {
            return None;
        }
        let mut path = root.to_path_buf();
        for part in self.path_components() {
            if part == ".." || part.contains(':') {
                return None;
            }
            path.push(part);
        }
        Some(path)
    }

    /// Path of the script body file backing this resource
    pub fn body_path(&self, root: &Path) -> Option<PathBuf> {
        self.resolve(root)
            .map(|path| path.with_extension(crate::extension::GML_EXTENSION))
    }

    /// Unit name encoded in the resource path
    pub fn script_name(&self) -> Option<&str> {
        let file_name = self.path_components().last()?;
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _ext)| stem);
        (!stem.is_empty()).then_some(stem)
    }
}

/// Script metadata stub (`scripts/<name>/<name>.yy`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub name: String,
    #[serde(rename = "IsCompatibility")]
    pub is_compatibility: bool,
    #[serde(rename = "IsDnD")]
    pub is_dnd: bool,
}

impl ScriptModel {
    pub fn new(name: &str) -> Self {
        ScriptModel {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ScriptModel {
    fn default() -> Self {
        ScriptModel {
            header: ModelHeader::new("GMScript", "1.0"),
            name: String::new(),
            is_compatibility: false,
            is_dnd: false,
        }
    }
}
