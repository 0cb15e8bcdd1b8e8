//! Error types for report parsing.
//!
//! Structural problems in a report abort the whole parse; no partial
//! document is returned. Query-time failures come from the projector as
//! [`ProjectionError`] and are wrapped here only where the parser crate
//! itself projects (the activity timeline).

use scip_stats_core::ProjectionError;
use thiserror::Error;

/// Errors that can occur while reading or parsing a statistics report.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A non-blank line has no label/value delimiter.
    #[error("line {line}: missing delimiter in {text:?}")]
    MalformedLine { line: usize, text: String },

    /// A sub-entry line appears before any section header line.
    #[error("line {line}: sub-entry before any section header: {text:?}")]
    OrphanSubheader { line: usize, text: String },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Projection failure while building derived views.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
