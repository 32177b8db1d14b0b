//! Reserved pseudo-units carrying package-wide data
//!
//! Packages have no place for an init hook or a constant table, so both
//! travel as scripts with reserved names:
//! - `<id>_ext_init` holds `gml_pragma("global", "<hook>();");`
//! - `<id>_ext_macros` holds one `#macro <name> <value>` line per constant
//!
//! A real function using one of these names is indistinguishable from the
//! pseudo-unit once packaged.

use crate::units::LINE_ENDING;

pub const INIT_SUFFIX: &str = "_ext_init";
pub const MACROS_SUFFIX: &str = "_ext_macros";

/// Start of every init pseudo-unit body
pub const GLOBAL_PRAGMA_PREAMBLE: &str = "gml_pragma(\"global\"";

/// Start of every constant line
pub const MACRO_PREFIX: &str = "#macro ";

pub fn init_unit_name(stem: &str) -> String {
    format!("{stem}{INIT_SUFFIX}")
}

pub fn macros_unit_name(stem: &str) -> String {
    format!("{stem}{MACROS_SUFFIX}")
}

/// Both pseudo-unit names derived from `stem`
pub fn reserved_names(stem: &str) -> [String; 2] {
    [init_unit_name(stem), macros_unit_name(stem)]
}

/// Body of the init pseudo-unit calling `hook` at global scope
pub fn render_init_body(hook: &str) -> String {
    format!("{GLOBAL_PRAGMA_PREAMBLE}, \"{hook}();\");{LINE_ENDING}")
}

/// Why an init pseudo-unit body could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitBodyError {
    /// Body does not start with the global pragma
    MissingPreamble,
    /// Pragma present but no `"<hook>(` call inside it
    MissingCall,
}

/// Recover the hook identifier from an init pseudo-unit body
///
/// The identifier is the text between the first `"` after the preamble and
/// the following `(`.
pub fn extract_init_hook(body: &str) -> Result<&str, InitBodyError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let rest = body
        .strip_prefix(GLOBAL_PRAGMA_PREAMBLE)
        .ok_or(InitBodyError::MissingPreamble)?;

    let start = rest.find('"').ok_or(InitBodyError::MissingCall)? + 1;
    let len = rest[start..].find('(').ok_or(InitBodyError::MissingCall)?;
    let hook = rest[start..start + len].trim();

    if hook.is_empty() {
        return Err(InitBodyError::MissingCall);
    }
    Ok(hook)
}

/// Body of the macros pseudo-unit, one line per `(name, value)` in order
pub fn render_macros<'a>(constants: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    constants
        .into_iter()
        .map(|(name, value)| format!("{MACRO_PREFIX}{name} {value}{LINE_ENDING}"))
        .collect()
}

/// Classification of one line of a macros pseudo-unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroLine<'a> {
    Macro { name: &'a str, value: &'a str },
    /// Starts with `#macro ` but has no separator after the name
    Malformed,
    /// Anything else, including blank lines
    Other,
}

/// Split a `#macro <name> <value>` line on its first two whitespace runs
///
/// `#macro NAME ` reads back as an empty value; `#macro NAME` with no
/// separator after the name is malformed.
pub fn parse_macro_line(line: &str) -> MacroLine<'_> {
    let Some(rest) = line.strip_prefix(MACRO_PREFIX) else {
        return MacroLine::Other;
    };

    match rest.trim_start().split_once(char::is_whitespace) {
        Some((name, value)) => MacroLine::Macro {
            name,
            value: value.trim_start(),
        },
        None => MacroLine::Malformed,
    }
}
