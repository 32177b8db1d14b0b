//! Splitting multi-function GML source into units and joining them back
//!
//! A line starting with `#define` opens a new unit named by the line's second
//! whitespace-delimited token. Everything up to the next marker (or end of
//! input) is the unit body. Text before the first marker is dropped.

use crate::doc_comment::{DocCommentParser, Signature};

/// Marker opening a unit in extension source files
pub const DEFINE_MARKER: &str = "#define";

/// Line terminator used when writing unit bodies
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// One named span of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionUnit {
    pub name: String,
    /// Verbatim body, marker line excluded
    pub body: String,
    /// Absent until `parse_signature` runs
    pub signature: Option<Signature>,
}

impl FunctionUnit {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        FunctionUnit {
            name: name.into(),
            body: body.into(),
            signature: None,
        }
    }

    /// Parse the doc comment of this unit once and cache the result
    pub fn parse_signature(&mut self) -> &mut Signature {
        self.signature
            .get_or_insert_with(|| DocCommentParser::parse(&self.body))
    }
}

/// Name carried by a marker line, or `None` for ordinary lines
///
/// A marker without a name yields an empty name.
pub fn marker_name(line: &str) -> Option<&str> {
    if !line.starts_with(DEFINE_MARKER) {
        return None;
    }
    Some(line.split_whitespace().nth(1).unwrap_or(""))
}

/// Completed units plus the one still collecting lines
#[derive(Default)]
struct SplitState {
    completed: Vec<FunctionUnit>,
    current: Option<FunctionUnit>,
}

impl SplitState {
    fn push_line(mut self, line: &str) -> Self {
        if let Some(name) = marker_name(line) {
            self.completed.extend(self.current.take());
            self.current = Some(FunctionUnit::new(name, String::new()));
        } else if let Some(unit) = self.current.as_mut() {
            unit.body.push_str(line);
            unit.body.push_str(LINE_ENDING);
        }
        self
    }

    fn finish(mut self) -> Vec<FunctionUnit> {
        self.completed.extend(self.current.take());
        self.completed
    }
}

/// Partition `source` into one unit per `#define` marker, in source order
pub fn split_units(source: &str) -> Vec<FunctionUnit> {
    source
        .lines()
        .fold(SplitState::default(), SplitState::push_line)
        .finish()
}

/// Accumulates units into a single `#define`-delimited source blob
#[derive(Debug, Default)]
pub struct ScriptJoiner {
    output: String,
    count: usize,
}

impl ScriptJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one unit: its marker line followed by its body
    pub fn push(&mut self, name: &str, body: &str) {
        self.output.push_str(DEFINE_MARKER);
        self.output.push(' ');
        self.output.push_str(name);
        self.output.push_str(LINE_ENDING);
        self.output.push_str(body);
        if !body.is_empty() && !body.ends_with('\n') {
            self.output.push_str(LINE_ENDING);
        }
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Render `units` in order as one source blob
pub fn join_units<'a>(units: impl IntoIterator<Item = &'a FunctionUnit>) -> String {
    let mut joiner = ScriptJoiner::new();
    for unit in units {
        joiner.push(&unit.name, &unit.body);
    }
    joiner.finish()
}
