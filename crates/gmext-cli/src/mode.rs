//! Conversion mode and path resolution
//!
//! Turns the user's `<input> [output] [--v22|--v23]` into a fully resolved
//! `RunConfig`. Nothing here touches the filesystem.

use crate::errors::CliError;
use gmext_config::TargetVersion;
use std::path::{Path, PathBuf};

/// Extension of descriptor manifests
pub const DESCRIPTOR_EXTENSION: &str = "yy";

const USAGE: &str = "Expected one of:
  gmextpack convert <extension.yy> [package.yymp|package.yymps] [--v22|--v23]
  gmextpack convert <package.yymp|package.yymps> [extension.yy]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Descriptor to package
    Explode,
    /// Package to descriptor
    Collapse,
}

/// Resolved parameters for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub target: TargetVersion,
}

impl RunConfig {
    /// Name given to the produced artifact: the package id when exploding,
    /// the descriptor name when collapsing
    pub fn output_name(&self) -> Result<String, CliError> {
        self.output
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Usage(format!(
                    "Cannot derive a name from output path '{}'",
                    self.output.display()
                ))
            })
    }

    /// Where a collapse writes the consolidated source named `file_name`
    pub fn source_output_path(&self, file_name: &str) -> PathBuf {
        self.output.with_file_name(file_name)
    }
}

fn detect_mode(input: &Path) -> Option<Mode> {
    match input.extension()?.to_str()? {
        DESCRIPTOR_EXTENSION => Some(Mode::Explode),
        _ if TargetVersion::from_package_path(input).is_some() => Some(Mode::Collapse),
        _ => None,
    }
}

/// Resolve mode, target and output path
///
/// `forced` comes from the `explode`/`collapse` subcommands; `flag` from
/// `--v22`/`--v23`; `default_target` from the user config.
pub fn resolve(
    input: &Path,
    output: Option<&Path>,
    flag: Option<TargetVersion>,
    forced: Option<Mode>,
    default_target: Option<TargetVersion>,
) -> Result<RunConfig, CliError> {
    if input.as_os_str().is_empty() {
        return Err(CliError::Usage(format!("No input file given.\n{USAGE}")));
    }

    let target = flag
        .or_else(|| TargetVersion::from_package_path(input))
        .or(default_target)
        .ok_or_else(|| {
            CliError::Usage(format!(
                "No target version for '{}'. Pass --v22 or --v23, or set one with `gmextpack config set default-target v23`.\n{USAGE}",
                input.display()
            ))
        })?;

    let mode = forced.or_else(|| detect_mode(input)).ok_or_else(|| {
        CliError::Usage(format!(
            "Cannot tell what to do with '{}'.\n{USAGE}",
            input.display()
        ))
    })?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => match mode {
            Mode::Explode => input.with_extension(target.package_extension()),
            Mode::Collapse => input.with_extension(DESCRIPTOR_EXTENSION),
        },
    };

    if output == input {
        return Err(CliError::Usage(format!(
            "Output would overwrite the input '{}'",
            input.display()
        )));
    }

    Ok(RunConfig {
        mode,
        input: input.to_path_buf(),
        output,
        target,
    })
}
