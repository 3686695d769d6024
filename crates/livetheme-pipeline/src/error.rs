//! Error types for pipeline rewriting and asset injection.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

use livetheme_less::LessError;

/// Errors surfaced to the build framework.
///
/// There is no partial-success mode: a failed variant extraction fails the
/// whole override-block synthesis, which fails that file's compile. A
/// broken theme file should break the build loudly rather than silently
/// ship an unthemed asset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Theme variant file could not be read or parsed
    #[error(transparent)]
    Theme(#[from] LessError),

    /// The configured entry asset is missing from the build outputs
    #[error("entry asset '{name}' not found among build outputs")]
    EntryNotFound { name: String },
}
