//! Value types shared by the extension descriptor and asset package models
//!
//! This module provides:
//! - `VariableType`, the closed set of engine value types with name lookup
//! - `ModelHeader`, the `{id, modelName, mvc}` triple every engine model carries

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// VARIABLE TYPE - Closed registry with case-insensitive lookup
// =============================================================================

/// Engine value type used for function arguments and return values
///
/// Serialized as the engine's integer code. Codes the registry does not know
/// read back as `Unspecified`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum VariableType {
    #[default]
    Unspecified = 0,
    String = 1,
    Real = 2,
    Bool = 3,
    Array = 4,
    Struct = 5,
    Pointer = 6,
}

impl VariableType {
    /// Type substituted when a function does not declare its return type
    pub const DEFAULT_RETURN: VariableType = VariableType::Real;

    /// Look up a type by name, case-insensitively
    ///
    /// Unknown and empty names yield `Unspecified`; this is the documented
    /// default, not an error.
    ///
    /// - `real`, `double`, `number` -> Real
    /// - `string`, `str` -> String
    /// - `bool`, `boolean` -> Bool
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "real" | "double" | "number" => VariableType::Real,
            "string" | "str" => VariableType::String,
            "bool" | "boolean" => VariableType::Bool,
            "array" => VariableType::Array,
            "struct" => VariableType::Struct,
            "pointer" | "ptr" => VariableType::Pointer,
            _ => VariableType::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariableType::Unspecified => "unspecified",
            VariableType::String => "string",
            VariableType::Real => "real",
            VariableType::Bool => "bool",
            VariableType::Array => "array",
            VariableType::Struct => "struct",
            VariableType::Pointer => "pointer",
        }
    }

    pub fn is_unspecified(self) -> bool {
        self == VariableType::Unspecified
    }
}

impl From<u8> for VariableType {
    fn from(code: u8) -> Self {
        match code {
            1 => VariableType::String,
            2 => VariableType::Real,
            3 => VariableType::Bool,
            4 => VariableType::Array,
            5 => VariableType::Struct,
            6 => VariableType::Pointer,
            _ => VariableType::Unspecified,
        }
    }
}

impl From<VariableType> for u8 {
    fn from(value: VariableType) -> Self {
        value as u8
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MODEL HEADER - Identity carried by every engine model
// =============================================================================

/// Identity triple written at the top of every engine model file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelHeader {
    pub id: Uuid,
    #[serde(rename = "modelName")]
    pub model_name: String,
    pub mvc: String,
}

impl ModelHeader {
    /// Create a header with a fresh identifier
    pub fn new(model_name: &str, mvc: &str) -> Self {
        ModelHeader {
            id: Uuid::new_v4(),
            model_name: model_name.to_string(),
            mvc: mvc.to_string(),
        }
    }
}

impl Default for ModelHeader {
    fn default() -> Self {
        ModelHeader {
            id: Uuid::new_v4(),
            model_name: String::new(),
            mvc: String::new(),
        }
    }
}
