use crate::archive;
use crate::errors::CliError;
use crate::mode::{self, Mode, RunConfig};
use crate::sink::LoggerSink;
use clap::Args;
use gmext_config::{Config, TargetVersion};
use gmext_convert::{collapse, explode};
use gmext_logger as logger;
use gmext_manifest::{read_from_path, write_to_path, ExtensionModel};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Extension descriptor (.yy) or package archive (.yymp / .yymps)
    pub input: PathBuf,

    /// Output path (derived from the input when omitted)
    pub output: Option<PathBuf>,

    /// Target GameMaker Studio 2.2 (.yymp)
    #[arg(long = "v22", conflicts_with = "v23")]
    pub v22: bool,

    /// Target GameMaker Studio 2.3 (.yymps)
    #[arg(long = "v23")]
    pub v23: bool,
}

impl ConvertArgs {
    pub fn target_flag(&self) -> Option<TargetVersion> {
        if self.v22 {
            Some(TargetVersion::V22)
        } else if self.v23 {
            Some(TargetVersion::V23)
        } else {
            None
        }
    }
}

/// Outcome of one conversion run
#[derive(Debug)]
pub struct ConvertSummary {
    pub written: Vec<PathBuf>,
    pub scripts: usize,
    pub warnings: usize,
}

pub fn handle_convert(args: &ConvertArgs, forced: Option<Mode>) -> Result<ConvertSummary, CliError> {
    let config = Config::load().unwrap_or_else(|e| {
        logger::warn(&format!("Ignoring unreadable config: {}", e));
        Config::default()
    });

    let run = mode::resolve(
        &args.input,
        args.output.as_deref(),
        args.target_flag(),
        forced,
        config.default_target,
    )?;
    logger::debug(&format!(
        "{:?} {} -> {} ({})",
        run.mode,
        run.input.display(),
        run.output.display(),
        run.target
    ));

    let mut sink = LoggerSink::new();
    logger::spinner_start(&format!("Converting {}", run.input.display()));
    let result = match run.mode {
        Mode::Explode => run_explode(&run, &config, &mut sink),
        Mode::Collapse => run_collapse(&run, &mut sink),
    };
    logger::spinner_stop();
    sink.flush();

    let (written, scripts) = result?;
    let summary = ConvertSummary {
        written,
        scripts,
        warnings: sink.warnings(),
    };
    for path in &summary.written {
        logger::step(&format!("Wrote {}", path.display()));
    }
    logger::success(&format!(
        "{} {} -> {} ({} scripts, {} warnings)",
        match run.mode {
            Mode::Explode => "Exploded",
            Mode::Collapse => "Collapsed",
        },
        run.input.display(),
        run.output.display(),
        summary.scripts,
        summary.warnings
    ));
    Ok(summary)
}

fn run_explode(
    run: &RunConfig,
    config: &Config,
    sink: &mut LoggerSink,
) -> Result<(Vec<PathBuf>, usize), CliError> {
    let mut descriptor: ExtensionModel = read_from_path(&run.input)?;
    if descriptor.author.trim().is_empty() {
        if let Some(publisher) = &config.publisher {
            logger::debug(&format!("Using configured publisher '{}'", publisher));
            descriptor.author.clone_from(publisher);
        }
    }

    let package_id = run.output_name()?;
    let source_root = run.input.parent().unwrap_or_else(|| Path::new("."));

    let staging = TempDir::new().map_err(CliError::io(std::env::temp_dir()))?;
    let exploded = explode(&descriptor, source_root, staging.path(), &package_id, sink)?;
    archive::create(staging.path(), &run.output)?;

    Ok((vec![run.output.clone()], exploded.units.len()))
}

fn run_collapse(run: &RunConfig, sink: &mut LoggerSink) -> Result<(Vec<PathBuf>, usize), CliError> {
    let name = run.output_name()?;

    let staging = TempDir::new().map_err(CliError::io(std::env::temp_dir()))?;
    archive::extract(&run.input, staging.path())?;
    let collapsed = collapse(staging.path(), &name, sink)?;

    write_to_path(&collapsed.descriptor, &run.output)?;
    let source_path = run.source_output_path(collapsed.source_file_name());
    fs::write(&source_path, &collapsed.source).map_err(CliError::io(&source_path))?;

    let scripts = collapsed
        .descriptor
        .files
        .first()
        .map_or(0, |file| file.functions.len());
    Ok((vec![run.output.clone(), source_path], scripts))
}
