//! Extension descriptor models
//!
//! A descriptor is one `.yy` manifest that owns a list of source file entries.
//! Each GML file entry lists the functions defined in its source file, the
//! constants it exports and optional init/final hooks.

use crate::types::{ModelHeader, VariableType};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::Path;
use uuid::Uuid;

/// `copyToTargets` mask meaning "every platform"
pub const ALL_PLATFORMS: i64 = i64::MAX;

/// File extension of GML source files
pub const GML_EXTENSION: &str = "gml";

/// Kind of an extension file or function
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum ExtensionKind {
    Dll = 1,
    #[default]
    Gml = 2,
    ActionLib = 3,
    Generic = 4,
}

impl From<u8> for ExtensionKind {
    fn from(code: u8) -> Self {
        match code {
            1 => ExtensionKind::Dll,
            3 => ExtensionKind::ActionLib,
            4 => ExtensionKind::Generic,
            _ => ExtensionKind::Gml,
        }
    }
}

impl From<ExtensionKind> for u8 {
    fn from(value: ExtensionKind) -> Self {
        value as u8
    }
}

// =============================================================================
// EXTENSION - Top-level descriptor
// =============================================================================

/// Top-level extension descriptor (`<name>.yy`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub name: String,
    pub extension_name: String,
    pub version: String,
    #[serde(rename = "packageID")]
    pub package_id: String,
    #[serde(rename = "productID")]
    pub product_id: String,
    pub author: String,
    pub date: String,
    pub license: String,
    pub description: String,
    pub helpfile: String,
    pub ios_props: bool,
    pub android_props: bool,
    pub installdir: String,
    pub files: Vec<ExtensionFileModel>,
    pub classname: String,
    pub androidclassname: String,
    pub sourcedir: String,
    pub macsourcedir: String,
    pub maccompilerflags: String,
    pub maclinkerflags: String,
    pub iosplistinject: String,
    pub androidinject: String,
    pub androidmanifestinject: String,
    pub androidactivityinject: String,
    pub gradleinject: String,
    pub ios_system_framework_entries: Vec<FrameworkEntryModel>,
    pub ios_third_party_framework_entries: Vec<FrameworkEntryModel>,
    #[serde(rename = "IncludedResources")]
    pub included_resources: Vec<String>,
    pub android_permissions: Vec<String>,
    pub copy_to_targets: i64,
}

impl Default for ExtensionModel {
    fn default() -> Self {
        ExtensionModel {
            header: ModelHeader::new("GMExtension", "1.2"),
            name: String::new(),
            extension_name: String::new(),
            version: String::new(),
            package_id: String::new(),
            product_id: String::new(),
            author: String::new(),
            date: String::new(),
            license: String::new(),
            description: String::new(),
            helpfile: String::new(),
            ios_props: false,
            android_props: false,
            installdir: String::new(),
            files: Vec::new(),
            classname: String::new(),
            androidclassname: String::new(),
            sourcedir: String::new(),
            macsourcedir: String::new(),
            maccompilerflags: String::new(),
            maclinkerflags: String::new(),
            iosplistinject: String::new(),
            androidinject: String::new(),
            androidmanifestinject: String::new(),
            androidactivityinject: String::new(),
            gradleinject: String::new(),
            ios_system_framework_entries: Vec::new(),
            ios_third_party_framework_entries: Vec::new(),
            included_resources: Vec::new(),
            android_permissions: Vec::new(),
            copy_to_targets: ALL_PLATFORMS,
        }
    }
}

// =============================================================================
// EXTENSION FILE - One source file and the functions it defines
// =============================================================================

/// One file entry of a descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionFileModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub filename: String,
    pub origname: String,
    pub init: String,
    #[serde(rename = "final")]
    pub finalizer: String,
    pub kind: ExtensionKind,
    pub uncompress: bool,
    pub functions: Vec<ExtensionFunctionModel>,
    pub constants: Vec<ExtensionConstantModel>,
    #[serde(rename = "ProxyFiles")]
    pub proxy_files: Vec<ProxyFileModel>,
    pub copy_to_targets: i64,
    /// Function ids in declaration order, derived from `functions`
    pub order: Vec<Uuid>,
}

impl Default for ExtensionFileModel {
    fn default() -> Self {
        ExtensionFileModel {
            header: ModelHeader::new("GMExtensionFile", "1.0"),
            filename: String::new(),
            origname: String::new(),
            init: String::new(),
            finalizer: String::new(),
            kind: ExtensionKind::Gml,
            uncompress: false,
            functions: Vec::new(),
            constants: Vec::new(),
            proxy_files: Vec::new(),
            copy_to_targets: ALL_PLATFORMS,
            order: Vec::new(),
        }
    }
}

impl ExtensionFileModel {
    /// Whether this entry points at a GML source file
    pub fn is_gml_source(&self) -> bool {
        Path::new(&self.filename)
            .extension()
            .is_some_and(|ext| ext == GML_EXTENSION)
    }

    /// File name without directory or extension
    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }

    /// Init hook identifier, if one is declared
    pub fn init_hook(&self) -> Option<&str> {
        let init = self.init.trim();
        (!init.is_empty()).then_some(init)
    }

    /// Finalizer identifier, if one is declared
    pub fn final_hook(&self) -> Option<&str> {
        let finalizer = self.finalizer.trim();
        (!finalizer.is_empty()).then_some(finalizer)
    }

    /// Recompute `order` from the current function list
    pub fn rebuild_order(&mut self) {
        self.order = self.functions.iter().map(|f| f.header.id).collect();
    }
}

// =============================================================================
// FUNCTION / CONSTANT / PROXY / FRAMEWORK - Leaf entries
// =============================================================================

/// Function signature record of a file entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionFunctionModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub arg_count: usize,
    pub args: SmallVec<[VariableType; 4]>,
    pub external_name: String,
    pub help: String,
    pub hidden: bool,
    pub kind: ExtensionKind,
    pub name: String,
    pub return_type: VariableType,
}

impl Default for ExtensionFunctionModel {
    fn default() -> Self {
        ExtensionFunctionModel {
            header: ModelHeader::new("GMExtensionFunction", "1.0"),
            arg_count: 0,
            args: SmallVec::new(),
            external_name: String::new(),
            help: String::new(),
            hidden: false,
            kind: ExtensionKind::Gml,
            name: String::new(),
            return_type: VariableType::Unspecified,
        }
    }
}

/// Constant (macro) exported by a file entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionConstantModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub constant_name: String,
    pub hidden: bool,
    /// Literal text of the value, never type-checked
    pub value: String,
}

impl ExtensionConstantModel {
    pub fn new(name: &str, value: &str) -> Self {
        ExtensionConstantModel {
            constant_name: name.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ExtensionConstantModel {
    fn default() -> Self {
        ExtensionConstantModel {
            header: ModelHeader::new("GMExtensionConstant", "1.0"),
            constant_name: String::new(),
            hidden: false,
            value: String::new(),
        }
    }
}

/// Platform proxy file of a file entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyFileModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    #[serde(rename = "TargetMask")]
    pub target_mask: i64,
    #[serde(rename = "proxyName")]
    pub proxy_name: String,
}

impl Default for ProxyFileModel {
    fn default() -> Self {
        ProxyFileModel {
            header: ModelHeader::new("GMProxyFile", "1.0"),
            target_mask: 0,
            proxy_name: String::new(),
        }
    }
}

/// iOS framework reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameworkEntryModel {
    #[serde(flatten)]
    pub header: ModelHeader,
    pub framework_name: String,
    pub weak_reference: bool,
}

impl Default for FrameworkEntryModel {
    fn default() -> Self {
        FrameworkEntryModel {
            header: ModelHeader::new("GMExtensionFrameworkEntry", "1.0"),
            framework_name: String::new(),
            weak_reference: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::extension::*;

    #[test]
    fn test_missing_fields_read_as_defaults() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": "6f1e9a1c-58ab-4c55-9d55-3a1f3f2b8b00",
            "modelName": "GMExtension",
            "mvc": "1.2",
            "name": "ext_health",
            "author": "someone",
            "files": [
                {
                    "filename": "ext_health.gml",
                    "kind": 2,
                    "init": "health_init",
                    "constants": [{ "constantName": "MAXHP", "value": "100" }]
                }
            ]
        }"#;

        let extension: ExtensionModel = serde_json::from_str(json)?;
        assert_eq!(extension.name, "ext_health");
        assert_eq!(extension.header.model_name, "GMExtension");
        assert!(extension.license.is_empty());
        assert_eq!(extension.files.len(), 1);

        let file = &extension.files[0];
        assert!(file.is_gml_source());
        assert_eq!(file.stem(), "ext_health");
        assert_eq!(file.init_hook(), Some("health_init"));
        assert_eq!(file.final_hook(), None);
        assert_eq!(file.constants[0].constant_name, "MAXHP");
        assert!(!file.constants[0].hidden);
        Ok(())
    }

    #[test]
    fn test_engine_field_names() -> Result<(), serde_json::Error> {
        let mut file = ExtensionFileModel {
            filename: "ext.gml".to_string(),
            finalizer: "ext_final".to_string(),
            ..Default::default()
        };
        file.functions.push(ExtensionFunctionModel {
            name: "heal".to_string(),
            return_type: VariableType::Real,
            ..Default::default()
        });
        file.rebuild_order();

        let value = serde_json::to_value(&file)?;
        assert_eq!(value["final"], "ext_final");
        assert_eq!(value["modelName"], "GMExtensionFile");
        assert!(value.get("ProxyFiles").is_some());
        assert_eq!(value["kind"], 2);
        assert_eq!(value["functions"][0]["returnType"], 2);
        assert_eq!(value["functions"][0]["externalName"], "");
        assert_eq!(
            value["order"][0],
            serde_json::Value::String(file.functions[0].header.id.to_string())
        );
        Ok(())
    }

    #[test]
    fn test_non_gml_file_is_detected() {
        let file = ExtensionFileModel {
            filename: "native.dll".to_string(),
            ..Default::default()
        };
        assert!(!file.is_gml_source());
    }
}
