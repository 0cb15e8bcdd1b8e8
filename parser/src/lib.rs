//! Parser for SCIP solver statistics reports.
//!
//! A statistics report is a text file of `Label : value` lines grouped into
//! sections: an unindented line opens a section, a line indented by the
//! indentation unit adds a sub-entry to it. This crate turns such a report
//! into a typed [`StatsDocument`] keyed `Section` / `Section.SubEntry`, and
//! builds comparison views on top of it.
//!
//! # Main entry points
//!
//! - [`parse_stats_text`]: parse report text already in memory.
//! - [`parse_stats_file`]: read and parse a report file.
//! - [`StatsParser`]: the two passes (raw assembly, typed extraction)
//!   exposed separately.
//! - [`ActivityTimeline`]: stack per-frame reports into per-element series.
//!
//! # Example
//!
//! ```
//! use scip_stats_parser::{parse_stats_text, ParserConfig, Value};
//!
//! let report = "\
//! Presolved Problem  :
//!   Variables        : 1234 (56 binary, 78 integer, 9 implicit integer, 1091 continuous)
//! B&B Tree           :
//!   Gap              :      23.40 %
//! ";
//!
//! let doc = parse_stats_text(report, &ParserConfig::default()).unwrap();
//! let vars = doc.get("Presolved_Problem.Variables").as_record().unwrap();
//! assert_eq!(vars.int("bins"), Some(56));
//! assert_eq!(doc.get("B&B_Tree.Gap"), &Value::Float(23.4));
//! assert!(doc.get("nonexistent_key").is_missing());
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod timeline;

use std::path::Path;

pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use parser::StatsParser;
pub use timeline::{ActivityTimeline, ElementSeries, FrameRow, frame_file_name};

pub use scip_stats_core::{
    CrossSection, INVALID_SECTIONS, PLACEHOLDER, ProjectionError, Record, Scalar, StatsDocument,
    Table, TableRow, Value, cross_section, is_invalid_section, project_section,
};

/// Parses report text with the given configuration.
///
/// # Errors
///
/// Returns [`ParseError::MalformedLine`] or [`ParseError::OrphanSubheader`]
/// on structural problems; see [`StatsParser::parse`].
pub fn parse_stats_text(text: &str, config: &ParserConfig) -> Result<StatsDocument> {
    StatsParser::new(config.clone()).parse(text)
}

/// Reads the whole report at `path` and parses it.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_stats_text`].
pub fn parse_stats_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<StatsDocument> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_stats_text(&text, config)
}
