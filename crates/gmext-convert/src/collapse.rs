//! Package -> descriptor conversion
//!
//! Script resources are folded back into a single `#define`-delimited source
//! file. Function signatures are re-read from each script's doc comment, and
//! the reserved init/macros scripts are turned back into the file entry's
//! init hook and constants. Descriptor fields a package cannot carry
//! (license, help file, platform injections) are left empty.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::ConvertError;
use crate::source_text::read_gml;
use gmext_manifest::asset_package::MANIFEST_FILE_NAME;
use gmext_manifest::extension::GML_EXTENSION;
use gmext_manifest::{
    read_from_path, AssetPackageModel, ExtensionConstantModel, ExtensionFileModel,
    ExtensionFunctionModel, ExtensionKind, ExtensionModel, VariableType,
};
use gmext_script::pseudo_units::{
    self, init_unit_name, macros_unit_name, InitBodyError, MacroLine,
};
use gmext_script::{DocCommentParser, ScriptJoiner};
use std::path::Path;
use tracing::{debug, info};

/// Result of collapsing a package
#[derive(Debug, Clone)]
pub struct CollapsedExtension {
    pub descriptor: ExtensionModel,
    /// Consolidated GML source for the descriptor's single file entry
    pub source: String,
}

impl CollapsedExtension {
    /// File name the consolidated source must be written under
    pub fn source_file_name(&self) -> &str {
        self.descriptor
            .files
            .first()
            .map_or("", |file| file.filename.as_str())
    }
}

/// Collapse the package rooted at `package_root` into a descriptor named `name`
pub fn collapse(
    package_root: &Path,
    name: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<CollapsedExtension, ConvertError> {
    let manifest_path = package_root.join(MANIFEST_FILE_NAME);
    if !manifest_path.is_file() {
        return Err(ConvertError::MissingPackageManifest {
            path: manifest_path,
        });
    }
    let package: AssetPackageModel = read_from_path(&manifest_path)?;
    info!(
        "Collapsing package '{}' ({} resources)",
        package.package_id,
        package.resources.len()
    );

    let init_name = init_unit_name(&package.package_id);
    let macros_name = macros_unit_name(&package.package_id);

    let mut file = ExtensionFileModel {
        filename: format!("{name}.{GML_EXTENSION}"),
        kind: ExtensionKind::Gml,
        ..Default::default()
    };
    let mut joiner = ScriptJoiner::new();

    for resource in &package.resources {
        let Some(script_name) = resource.script_name() else {
            debug!("Skipping resource without a name: {:?}", resource.resource_path);
            continue;
        };

        let Some(body_path) = resource.body_path(package_root) else {
            sink.emit(Diagnostic::warning(
                Some(script_name),
                format!(
                    "Resource path '{}' leaves the package; resource skipped",
                    resource.resource_path
                ),
            ));
            continue;
        };
        if !body_path.is_file() {
            debug!("Skipping resource without a script body: {}", script_name);
            sink.emit(Diagnostic::info(
                Some(script_name),
                "No script body in package; resource skipped",
            ));
            continue;
        }
        let body = read_gml(&body_path, script_name, sink)?;

        if script_name == init_name {
            match pseudo_units::extract_init_hook(&body) {
                Ok(hook) => file.init = hook.to_string(),
                Err(InitBodyError::MissingPreamble) => sink.emit(Diagnostic::warning(
                    Some(script_name),
                    "Extension init script does not start with gml_pragma global; init hook dropped",
                )),
                Err(InitBodyError::MissingCall) => sink.emit(Diagnostic::warning(
                    Some(script_name),
                    "Extension init script does not call a function; init hook dropped",
                )),
            }
        } else if script_name == macros_name {
            collect_constants(script_name, &body, &mut file.constants, sink);
        } else {
            file.functions
                .push(function_record(script_name, &body, sink));
            joiner.push(script_name, &body);
        }
    }

    file.rebuild_order();
    info!(
        "Collapsed {} functions, {} constants",
        file.functions.len(),
        file.constants.len()
    );

    let descriptor = ExtensionModel {
        name: name.to_string(),
        version: package.version.clone(),
        author: package.publisher_name.clone(),
        date: chrono::Utc::now().to_rfc3339(),
        files: vec![file],
        ..Default::default()
    };

    Ok(CollapsedExtension {
        descriptor,
        source: joiner.finish(),
    })
}

/// Descriptor function entry for one script, defaulting a missing return type
fn function_record(
    name: &str,
    body: &str,
    sink: &mut dyn DiagnosticSink,
) -> ExtensionFunctionModel {
    let mut signature = DocCommentParser::parse(body);
    if signature.return_type.is_unspecified() {
        signature.return_type = VariableType::DEFAULT_RETURN;
        sink.emit(Diagnostic::warning(
            Some(name),
            format!(
                "Script did not specify a return type. Defaulting to '{}'",
                VariableType::DEFAULT_RETURN
            ),
        ));
    }

    ExtensionFunctionModel {
        arg_count: signature.argument_count(),
        args: signature.argument_types(),
        external_name: name.to_string(),
        help: signature.help_string(),
        hidden: signature.hidden,
        kind: ExtensionKind::Gml,
        name: name.to_string(),
        return_type: signature.return_type,
        ..Default::default()
    }
}

fn collect_constants(
    script_name: &str,
    body: &str,
    constants: &mut Vec<ExtensionConstantModel>,
    sink: &mut dyn DiagnosticSink,
) {
    for line in body.lines() {
        match pseudo_units::parse_macro_line(line) {
            MacroLine::Macro { name, value } => {
                constants.push(ExtensionConstantModel::new(name, value));
            }
            MacroLine::Malformed => sink.emit(Diagnostic::warning(
                Some(script_name),
                format!("Skipping malformed macro line: {line}"),
            )),
            MacroLine::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::collapse::*;
    use gmext_manifest::{write_to_path, Resource, ScriptModel};
    use std::fs;
    use tempfile::TempDir;

    /// Lay out a package by hand: `(name, body)` pairs become script resources
    fn write_package(root: &Path, package_id: &str, scripts: &[(&str, Option<&str>)]) -> Result<(), ConvertError> {
        let mut package = AssetPackageModel {
            name: package_id.to_string(),
            package_id: package_id.to_string(),
            publisher_name: "someone".to_string(),
            ..Default::default()
        };

        for (name, body) in scripts {
            let directory = root.join("scripts").join(name);
            write_to_path(&ScriptModel::new(name), &directory.join(format!("{name}.yy")))?;
            if let Some(body) = body {
                let body_path = directory.join(format!("{name}.gml"));
                fs::write(&body_path, body).map_err(ConvertError::io(&body_path))?;
            }
            package.resources.push(Resource::new_script(name, package_id));
        }

        write_to_path(&package, &root.join(MANIFEST_FILE_NAME))?;
        Ok(())
    }

    #[test]
    fn test_heal_scenario() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext_health",
            &[(
                "heal",
                Some("/// @param {Real} amount hp to restore\n/// @returns {Real}\nhp += argument0;\n"),
            )],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext_health", &mut sink)?;
        assert!(sink.is_empty());

        let file = &collapsed.descriptor.files[0];
        assert_eq!(collapsed.source_file_name(), "ext_health.gml");
        assert_eq!(file.functions.len(), 1);

        let heal = &file.functions[0];
        assert_eq!(heal.name, "heal");
        assert_eq!(heal.external_name, "heal");
        assert_eq!(heal.help, "amount");
        assert_eq!(heal.return_type, VariableType::Real);
        assert_eq!(heal.arg_count, 1);
        assert_eq!(heal.args.as_slice(), &[VariableType::Real]);
        assert_eq!(file.order, vec![heal.header.id]);

        assert_eq!(
            collapsed.source,
            "#define heal\n/// @param {Real} amount hp to restore\n/// @returns {Real}\nhp += argument0;\n"
        );
        assert_eq!(collapsed.descriptor.author, "someone");
        assert_eq!(collapsed.descriptor.version, "1.0.0");
        Ok(())
    }

    #[test]
    fn test_init_scenario() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[("ext_ext_init", Some("gml_pragma(\"global\", \"setup();\");"))],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let file = &collapsed.descriptor.files[0];
        assert_eq!(file.init, "setup");
        assert!(file.functions.is_empty());
        assert!(collapsed.source.is_empty());
        Ok(())
    }

    #[test]
    fn test_init_without_preamble_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[
                ("ext_ext_init", Some("setup();\n")),
                ("keep", Some("/// @returns {Real}\n")),
            ],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let file = &collapsed.descriptor.files[0];
        assert!(file.init.is_empty());
        assert_eq!(file.functions.len(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].unit.as_deref(), Some("ext_ext_init"));
        Ok(())
    }

    #[test]
    fn test_macros_in_order_with_malformed_lines_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[(
                "ext_ext_macros",
                Some("#macro PI 3.14159\n#macro BROKEN\n\n#macro MAXHP 100\n"),
            )],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let constants: Vec<(&str, &str)> = collapsed.descriptor.files[0]
            .constants
            .iter()
            .map(|c| (c.constant_name.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(constants, vec![("PI", "3.14159"), ("MAXHP", "100")]);
        assert_eq!(sink.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_body_is_skipped_without_warning() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[("ghost", None), ("real_one", Some("/// @returns {String}\n"))],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let file = &collapsed.descriptor.files[0];
        assert!(!sink.iter().any(Diagnostic::is_warning));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].unit.as_deref(), Some("ghost"));
        assert_eq!(file.functions.len(), 1);
        assert_eq!(file.functions[0].name, "real_one");
        assert_eq!(file.functions[0].return_type, VariableType::String);
        Ok(())
    }

    #[test]
    fn test_missing_return_type_warns() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(dir.path(), "ext", &[("plain", Some("return 1;\n"))])?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].unit.as_deref(), Some("plain"));
        assert_eq!(
            collapsed.descriptor.files[0].functions[0].return_type,
            VariableType::DEFAULT_RETURN
        );
        Ok(())
    }

    #[test]
    fn test_missing_manifest_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let mut sink: Vec<Diagnostic> = Vec::new();
        let result = collapse(dir.path(), "ext", &mut sink);
        assert!(matches!(result, Err(ConvertError::MissingPackageManifest { .. })));
        Ok(())
    }

    #[test]
    fn test_unreadable_manifest_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(MANIFEST_FILE_NAME), "not json")?;
        let mut sink: Vec<Diagnostic> = Vec::new();
        let result = collapse(dir.path(), "ext", &mut sink);
        assert!(matches!(result, Err(ConvertError::Manifest(_))));
        Ok(())
    }

    #[test]
    fn test_non_utf8_body_is_decoded_lossily() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[
                ("a", Some("/// @returns {Real}\nreturn 1;\n")),
                ("b", Some("/// @returns {Real}\nreturn 2;\n")),
            ],
        )?;
        fs::write(
            dir.path().join("scripts").join("b").join("b.gml"),
            b"/// @returns {Real}\n// caf\xe9\nreturn 2;\n",
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let names: Vec<&str> = collapsed.descriptor.files[0]
            .functions
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].unit.as_deref(), Some("b"));
        assert!(collapsed.source.contains("// caf\u{fffd}\nreturn 2;"));
        Ok(())
    }

    #[test]
    fn test_resource_outside_package_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let outer = TempDir::new()?;
        let root = outer.path().join("package");
        write_package(&root, "ext", &[("a", Some("/// @returns {Real}\nreturn 1;\n"))])?;
        fs::write(outer.path().join("secret.gml"), "leaked\n")?;

        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let mut package: AssetPackageModel = read_from_path(&manifest_path)?;
        package.resources.push(Resource {
            resource_path: "..\\secret.yy".to_string(),
            ..Resource::new_script("secret", "ext")
        });
        write_to_path(&package, &manifest_path)?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(&root, "ext", &mut sink)?;

        assert_eq!(collapsed.descriptor.files[0].functions.len(), 1);
        assert!(!collapsed.source.contains("leaked"));
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_warning());
        assert_eq!(sink[0].unit.as_deref(), Some("secret"));
        Ok(())
    }

    #[test]
    fn test_empty_macro_value_is_kept() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_package(
            dir.path(),
            "ext",
            &[("ext_ext_macros", Some("#macro EMPTY \n#macro MAXHP 100\n"))],
        )?;

        let mut sink: Vec<Diagnostic> = Vec::new();
        let collapsed = collapse(dir.path(), "ext", &mut sink)?;

        let constants: Vec<(&str, &str)> = collapsed.descriptor.files[0]
            .constants
            .iter()
            .map(|c| (c.constant_name.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(constants, vec![("EMPTY", ""), ("MAXHP", "100")]);
        assert!(sink.is_empty());
        Ok(())
    }
}
