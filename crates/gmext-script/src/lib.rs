//! GML script processing for gmextpack
//!
//! This crate is the text-only half of the converter:
//! 1. `units` splits a multi-function source file into `#define` units and joins them back
//! 2. `doc_comment` recovers typed signatures from JSDoc-style comments in a unit body
//! 3. `pseudo_units` renders and reads the reserved init/macros units
//!
//! Nothing here touches the filesystem.

pub mod doc_comment;
pub mod pseudo_units;
pub mod units;

pub use doc_comment::{DocCommentParser, Parameter, Signature};
pub use units::{join_units, split_units, FunctionUnit, ScriptJoiner, LINE_ENDING};
