//! Package archives
//!
//! `.yymp`/`.yymps` files are plain zip archives of the package directory.

use crate::errors::CliError;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Extract `archive` into `destination`, returning the number of entries
pub fn extract(archive: &Path, destination: &Path) -> Result<usize, CliError> {
    let file = File::open(archive).map_err(CliError::io(archive))?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let count = zip.len();
    zip.extract(destination)?;
    debug!(
        "Extracted {} entries from {} into {}",
        count,
        archive.display(),
        destination.display()
    );
    Ok(count)
}

/// Zip the contents of `source_dir` into `archive`, returning the number of files
///
/// Entries are added in sorted order with `/`-separated relative names.
pub fn create(source_dir: &Path, archive: &Path) -> Result<usize, CliError> {
    if let Some(parent) = archive.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(CliError::io(parent))?;
    }

    let file = File::create(archive).map_err(CliError::io(archive))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            trace!("Adding {}", name);
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path()).map_err(CliError::io(entry.path()))?;
            io::copy(&mut source, &mut writer).map_err(CliError::io(entry.path()))?;
            files += 1;
        }
    }

    writer.finish()?;
    debug!("Wrote {} files to {}", files, archive.display());
    Ok(files)
}
