//! Extension descriptor <-> asset package conversion
//!
//! Two entry points, one per direction:
//! 1. `explode` turns a descriptor and its GML sources into a package directory
//! 2. `collapse` turns a package directory back into a descriptor plus one source blob
//!
//! Both are single-pass over units. Recoverable problems are reported to a
//! `DiagnosticSink`; fatal ones abort the run with a `ConvertError`. Archive
//! handling and temporary directories are left to the caller.

pub mod collapse;
pub mod diagnostics;
pub mod errors;
pub mod explode;
mod source_text;

pub use collapse::{collapse, CollapsedExtension};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use errors::ConvertError;
pub use explode::{explode, ExplodedPackage};
