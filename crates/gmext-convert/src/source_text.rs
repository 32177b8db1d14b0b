//! Reading GML text from disk
//!
//! Scripts are not guaranteed to be UTF-8 (Latin-1 comments are common).
//! Invalid bytes are replaced and reported against the unit instead of
//! failing the run.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::ConvertError;
use std::fs;
use std::path::Path;

/// Read `path` as text, BOM stripped, decoding invalid UTF-8 lossily
pub(crate) fn read_gml(
    path: &Path,
    unit: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, ConvertError> {
    let bytes = fs::read(path).map_err(ConvertError::io(path))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            sink.emit(Diagnostic::warning(
                Some(unit),
                "Script is not valid UTF-8; invalid bytes were replaced",
            ));
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
