use gmext_convert::{Diagnostic, DiagnosticSink, Severity};
use gmext_logger as logger;

/// Diagnostic sink for the terminal
///
/// Diagnostics are held until `flush` so they are not drawn over the spinner.
#[derive(Debug, Default)]
pub struct LoggerSink {
    pending: Vec<Diagnostic>,
    warnings: usize,
}

impl LoggerSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings received so far
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Forward held diagnostics to the logger
    pub fn flush(&mut self) {
        for diagnostic in self.pending.drain(..) {
            match diagnostic.severity {
                Severity::Warning => logger::warn(&diagnostic.to_string()),
                Severity::Info => logger::info(&diagnostic.to_string()),
            }
        }
    }
}

impl DiagnosticSink for LoggerSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            self.warnings += 1;
        }
        self.pending.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_warnings_only() {
        let mut sink = LoggerSink::new();
        sink.emit(Diagnostic::warning(Some("heal"), "no return type"));
        sink.emit(Diagnostic::info(None, "3 scripts"));
        assert_eq!(sink.warnings(), 1);

        sink.flush();
        assert!(sink.pending.is_empty());
        assert_eq!(sink.warnings(), 1);
    }
}
