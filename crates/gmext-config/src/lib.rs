//! Persistent configuration for gmextpack
//!
//! The config is a small TOML file. Its location is, in order:
//! - `$GMEXT_CONFIG` when set and non-empty
//! - the path stored in the `.gmextpack_config_path` pointer file next to the default
//! - `~/.config/gmextpack/gmextpack.toml` (platform config dir on Windows)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "GMEXT_CONFIG";

/// Pointer file name, stored next to the default config
pub const POINTER_FILE: &str = ".gmextpack_config_path";

/// Keys accepted by `get`/`set`
pub const KNOWN_KEYS: &[&str] = &["default-target", "publisher"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {0}. Currently supported keys: default-target, publisher")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Package format version a conversion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetVersion {
    /// GameMaker Studio 2.2 (`.yymp`)
    V22,
    /// GameMaker Studio 2.3 (`.yymps`)
    V23,
}

impl TargetVersion {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "v22" | "22" | "2.2" => Some(TargetVersion::V22),
            "v23" | "23" | "2.3" => Some(TargetVersion::V23),
            _ => None,
        }
    }

    /// Archive extension of packages for this version
    pub fn package_extension(self) -> &'static str {
        match self {
            TargetVersion::V22 => "yymp",
            TargetVersion::V23 => "yymps",
        }
    }

    /// Version implied by a package archive's extension
    pub fn from_package_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yymp" => Some(TargetVersion::V22),
            "yymps" => Some(TargetVersion::V23),
            _ => None,
        }
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetVersion::V22 => f.write_str("v22"),
            TargetVersion::V23 => f.write_str("v23"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target: Option<TargetVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl Config {
    pub fn path() -> PathBuf {
        // Honor explicit override for tests / isolated runs
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        let default = Self::default_path();
        if let Some(contents) = Self::pointer_path()
            .and_then(|pointer| fs::read_to_string(pointer).ok())
        {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        default
    }

    /// Platform-default config location, ignoring overrides
    pub fn default_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        let path = dirs::home_dir().map_or_else(
            || PathBuf::from(".config/gmextpack/gmextpack.toml"),
            |h| h.join(".config").join("gmextpack").join("gmextpack.toml"),
        );

        #[cfg(target_os = "windows")]
        let path = dirs::config_dir().map_or_else(
            || PathBuf::from("gmextpack\\gmextpack.toml"),
            |c| c.join("gmextpack").join("gmextpack.toml"),
        );

        path
    }

    /// Pointer file redirecting the config location
    pub fn pointer_path() -> Option<PathBuf> {
        Self::default_path().parent().map(|p| p.join(POINTER_FILE))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path())
    }

    /// Load from `path`, returning the default config if it does not exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-target" => self.default_target.map(|t| t.to_string()),
            "publisher" => self.publisher.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "default-target" => {
                let target = TargetVersion::parse(&value).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.clone(),
                    }
                })?;
                self.default_target = Some(target);
            }
            "publisher" => self.publisher = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.default_target.is_none() && self.publisher.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        KNOWN_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}
