//! Structured diagnostics for recoverable conversion problems
//!
//! Transforms never print. Every recovered condition (defaulted return type,
//! dropped finalizer, unreadable init script, malformed macro line, non-UTF-8
//! text) becomes a warning written to the caller's `DiagnosticSink`. Resources
//! skipped for having no script body are reported at info level.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// One advisory record, tied to the unit it concerns when there is one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub unit: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(unit: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            unit: unit.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn info(unit: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Info,
            unit: unit.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{}: {}", unit, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Receiver for diagnostics emitted during a conversion run
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
