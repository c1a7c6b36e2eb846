//! Source canonicalization layer.
//!
//! Turns raw submission text into the deterministic character stream the
//! fingerprinting stage works on. Renaming a variable or reformatting a file
//! should not change that stream.
//!
//! ## What we do
//!
//! - Strip line comments (everything after the marker, per line)
//! - Collapse whitespace, then remove it entirely
//! - Parse the file and drop every user-defined identifier: assignment
//!   targets, attribute names and function names
//! - Degrade to syntax-only normalization when the file does not parse
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. The same text and config
//! give the same canonical text on any machine.

mod config;
mod document;
mod error;
mod identifiers;
mod mask;
mod pipeline;
mod whitespace;

pub use crate::config::CanonicalizeConfig;
pub use crate::document::CanonicalSource;
pub use crate::error::{CanonicalError, ParseFailure};
pub use crate::identifiers::{
    extract_identifiers, parse_python, walk_identifiers, IdentifierSet, IdentifierVisitor,
};
pub use crate::mask::{mask_identifiers, remove_spaces};
pub use crate::pipeline::normalize;
pub use crate::whitespace::{collapse_whitespace, strip_comments};
