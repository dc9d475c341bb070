//! Core utilities shared by the cemit emission engine.
//!
//! This crate provides the output buffer the emitters write into, the C
//! literal formatting helpers and the file-write collaborator used to put
//! a rendered translation unit on disk.

mod error;
mod file;
mod literal;
mod writer;

pub use error::Error;
// File operations
pub use file::{File, FileRules, Overwrite, WriteResult};
// Literal formatting
pub use literal::{continue_lines, escape_string, format_fixed, quote_char};
pub use writer::CodeWriter;
