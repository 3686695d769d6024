//! Less theme-variable extraction for livetheme.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - A minimal top-level Less declaration parser (not a compiler)
//! - Async extraction of theme variant files into [`VariableMap`]s
//! - Same-file variable reference resolution

mod error;
mod parse;
mod vars;

pub use error::LessError;
pub use parse::{Declaration, parse_declarations};
pub use vars::{VariableMap, extract_variables, resolve_references};
