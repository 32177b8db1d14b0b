//! Descriptor -> package conversion
//!
//! Every `#define` unit of every GML file entry becomes one script resource.
//! Constants and the init hook of a file entry travel as reserved
//! pseudo-units; a finalizer has no package equivalent and is dropped with a
//! warning.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::ConvertError;
use crate::source_text::read_gml;
use gmext_manifest::asset_package::{MANIFEST_FILE_NAME, SCRIPTS_DIR};
use gmext_manifest::{
    write_to_path, AssetPackageModel, ExtensionFileModel, ExtensionModel, Resource, ScriptModel,
    VariableType,
};
use gmext_script::pseudo_units::{self, init_unit_name, macros_unit_name};
use gmext_script::{split_units, FunctionUnit};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of exploding a descriptor
#[derive(Debug, Clone)]
pub struct ExplodedPackage {
    /// Manifest as written to `assetpackage.yy`
    pub manifest: AssetPackageModel,
    /// Function units in resource order, signatures parsed
    pub units: Vec<FunctionUnit>,
}

/// Writes script pairs below a package root and records their resources
struct PackageBuilder {
    scripts_dir: PathBuf,
    package_id: String,
    resources: Vec<Resource>,
    names: HashSet<String>,
}

impl PackageBuilder {
    fn new(package_root: &Path, package_id: &str) -> Self {
        PackageBuilder {
            scripts_dir: package_root.join(SCRIPTS_DIR),
            package_id: package_id.to_string(),
            resources: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Write `scripts/<name>/<name>.{yy,gml}` and register the resource
    fn add_script(&mut self, name: &str, body: &str) -> Result<(), ConvertError> {
        let directory = self.scripts_dir.join(name);
        fs::create_dir_all(&directory).map_err(ConvertError::io(&directory))?;

        write_to_path(&ScriptModel::new(name), &directory.join(format!("{name}.yy")))?;

        let body_path = directory.join(format!("{name}.gml"));
        fs::write(&body_path, body).map_err(ConvertError::io(&body_path))?;

        debug!("Wrote script '{}' ({} bytes)", name, body.len());
        self.names.insert(name.to_string());
        self.resources.push(Resource::new_script(name, &self.package_id));
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Write a pseudo-unit, refusing to replace a script already in the package
    fn add_pseudo_unit(
        &mut self,
        name: &str,
        body: &str,
        file: &ExtensionFileModel,
    ) -> Result<(), ConvertError> {
        if self.contains(name) {
            return Err(ConvertError::DuplicatePseudoUnit {
                name: name.to_string(),
                filename: file.filename.clone(),
            });
        }
        self.add_script(name, body)
    }
}

/// Explode `descriptor` into a package below `package_root`
///
/// Source files named by the descriptor are read relative to `source_root`.
/// The package manifest is written last, after every script pair.
pub fn explode(
    descriptor: &ExtensionModel,
    source_root: &Path,
    package_root: &Path,
    package_id: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<ExplodedPackage, ConvertError> {
    if let Some(file) = descriptor.files.iter().find(|f| !f.is_gml_source()) {
        return Err(ConvertError::UnsupportedSourceKind {
            filename: file.filename.clone(),
        });
    }

    // Init/macros names of every file entry, not only the one being split
    let reserved: HashSet<String> = descriptor
        .files
        .iter()
        .flat_map(|f| pseudo_units::reserved_names(f.stem()))
        .collect();

    let mut builder = PackageBuilder::new(package_root, package_id);
    let mut units = Vec::new();

    for file in &descriptor.files {
        info!("Exploding extension file '{}'", file.filename);
        convert_gml_file(file, source_root, &reserved, &mut builder, &mut units, sink)?;
        convert_constants(file, &mut builder)?;
        convert_init(file, &mut builder)?;
        convert_final(file, sink);
    }

    let manifest = AssetPackageModel {
        name: package_id.to_string(),
        package_id: package_id.to_string(),
        publisher_name: descriptor.author.clone(),
        version: if descriptor.version.trim().is_empty() {
            AssetPackageModel::default().version
        } else {
            descriptor.version.clone()
        },
        resources: builder.resources,
        ..Default::default()
    };
    write_to_path(&manifest, &package_root.join(MANIFEST_FILE_NAME))?;

    info!(
        "Package '{}' written with {} resources",
        package_id,
        manifest.resources.len()
    );
    Ok(ExplodedPackage { manifest, units })
}

fn convert_gml_file(
    file: &ExtensionFileModel,
    source_root: &Path,
    reserved: &HashSet<String>,
    builder: &mut PackageBuilder,
    units: &mut Vec<FunctionUnit>,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), ConvertError> {
    let source_path = source_root.join(&file.filename);
    let source = read_gml(&source_path, &file.filename, sink)?;

    for mut unit in split_units(&source) {
        if !is_identifier(&unit.name) {
            return Err(ConvertError::InvalidUnitName {
                name: unit.name,
                filename: file.filename.clone(),
            });
        }
        if reserved.contains(&unit.name) {
            return Err(ConvertError::ReservedNameCollision {
                name: unit.name,
                filename: file.filename.clone(),
            });
        }
        if builder.contains(&unit.name) {
            sink.emit(Diagnostic::warning(
                Some(&unit.name),
                "Function is defined more than once; keeping the first definition",
            ));
            continue;
        }

        let signature = unit.parse_signature();
        if signature.return_type.is_unspecified() {
            signature.return_type = VariableType::DEFAULT_RETURN;
            sink.emit(Diagnostic::warning(
                Some(&unit.name),
                format!(
                    "Script did not specify a return type. Defaulting to '{}'",
                    VariableType::DEFAULT_RETURN
                ),
            ));
        }

        builder.add_script(&unit.name, &unit.body)?;
        units.push(unit);
    }

    Ok(())
}

fn convert_constants(
    file: &ExtensionFileModel,
    builder: &mut PackageBuilder,
) -> Result<(), ConvertError> {
    if file.constants.is_empty() {
        return Ok(());
    }

    let body = pseudo_units::render_macros(
        file.constants
            .iter()
            .map(|c| (c.constant_name.as_str(), c.value.as_str())),
    );
    builder.add_pseudo_unit(&macros_unit_name(file.stem()), &body, file)
}

fn convert_init(file: &ExtensionFileModel, builder: &mut PackageBuilder) -> Result<(), ConvertError> {
    let Some(hook) = file.init_hook() else {
        return Ok(());
    };

    builder.add_pseudo_unit(
        &init_unit_name(file.stem()),
        &pseudo_units::render_init_body(hook),
        file,
    )
}

fn convert_final(file: &ExtensionFileModel, sink: &mut dyn DiagnosticSink) {
    if let Some(finalizer) = file.final_hook() {
        sink.emit(Diagnostic::warning(
            Some(finalizer),
            "The finalizer will not run in the resulting package",
        ));
    }
}

/// GML identifier: letters, digits and underscores, not starting with a digit
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
