//! Parser configuration.
//!
//! Defines the YAML-serializable settings that control how a statistics
//! report is read. Every field has a default, so a file only needs to name
//! the fields it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! delimiter: ":"
//! indent_unit: "  "
//! pad_extended_lp_rows: false
//! keep_estimation_internal: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::extract::ExtractOptions;

/// Settings for one [`StatsParser`](crate::StatsParser).
///
/// The value is handed to the parser explicitly; nothing is read from
/// process-wide state.
///
/// # Examples
///
/// ```
/// use scip_stats_parser::ParserConfig;
///
/// let config: ParserConfig = serde_yaml::from_str("pad_extended_lp_rows: true").unwrap();
/// assert!(config.pad_extended_lp_rows);
/// assert_eq!(config.delimiter, ':');
/// assert_eq!(config.indent_unit, "  ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Character separating a label from its value.
    pub delimiter: char,
    /// Leading whitespace that marks a sub-entry line.
    pub indent_unit: String,
    /// Keep the three `-` pads on the short LP rows (`lex dual LP`,
    /// `resolve instable`, ...). When off, those rows are stored unpadded.
    pub pad_extended_lp_rows: bool,
    /// Keep the `internal` node count of the estimation tree as
    /// `et_internal`.
    pub keep_estimation_internal: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ':',
            indent_unit: "  ".to_string(),
            pad_extended_lp_rows: false,
            keep_estimation_internal: false,
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ParseError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ParseError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ParseError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::ParseError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub(crate) fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            keep_estimation_internal: self.keep_estimation_internal,
        }
    }
}
