//! Error types for Less variable extraction.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting variables from a Less file
#[derive(Debug, Error)]
pub enum LessError {
    /// Theme variant file missing or unreadable
    #[error("failed to read Less file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid Less syntax
    #[error("invalid Less syntax at line {line}: {message}{}", .hint.as_ref().map(|h| format!(" in {}", h)).unwrap_or_default())]
    Parse {
        message: String,
        line: usize,
        hint: Option<String>,
    },
}

impl LessError {
    /// Attach a file hint to a parse error that doesn't carry one yet.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            LessError::Parse {
                message,
                line,
                hint: None,
            } => LessError::Parse {
                message,
                line,
                hint: Some(hint.into()),
            },
            other => other,
        }
    }
}
