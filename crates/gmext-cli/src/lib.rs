//! gmextpack library - expose modules for testing
//!
//! Argument resolution, archive handling and the command handlers live here;
//! the conversion itself is in `gmext-convert`.

pub mod archive;
pub mod commands;
pub mod common;
pub mod errors;
pub mod mode;
pub mod sink;

pub use common::GlobalOpts;
