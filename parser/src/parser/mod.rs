//! Two-pass statistics report parser.
//!
//! The first pass walks the report line by line, classifies each line as a
//! section header or a sub-entry, builds its key and stores the cleaned raw
//! value text. The second pass runs every raw value through the typed
//! extractor chain. Both passes are synchronous and touch no shared state,
//! so independent reports can be parsed concurrently.
//!
//! The primary entry point is [`StatsParser::new`] followed by
//! [`StatsParser::parse`]; [`parse_stats_text`](crate::parse_stats_text)
//! wraps the two.

pub mod assemble;
pub mod classify;
pub mod extract;

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use classify::LineKind;
use scip_stats_core::{StatsDocument, Value};

/// Cleaned, untyped values keyed in file order. Output of the first pass.
pub type RawEntries = IndexMap<String, String>;

/// Parser for one statistics report.
#[derive(Debug, Clone, Default)]
pub struct StatsParser {
    config: ParserConfig,
}

impl StatsParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `text` into a typed [`StatsDocument`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] for a non-blank line without
    /// the delimiter and [`ParseError::OrphanSubheader`] for a sub-entry
    /// before the first header. No partial document is returned.
    pub fn parse(&self, text: &str) -> Result<StatsDocument> {
        let raw = self.assemble(text)?;
        let document = self.type_entries(&raw);
        info!(keys = document.len(), "Parsed statistics report");
        Ok(document)
    }

    /// First pass: keys and cleaned raw values in file order.
    ///
    /// A key seen twice keeps its first position and its last value.
    pub fn assemble(&self, text: &str) -> Result<RawEntries> {
        let mut entries = RawEntries::new();
        let mut current_section: Option<String> = None;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                trace!(line = line_no, "Skipping blank line");
                continue;
            }

            let Some((label, raw_value)) = classify::split_label_value(line, self.config.delimiter)
            else {
                return Err(ParseError::MalformedLine {
                    line: line_no,
                    text: line.to_string(),
                });
            };

            let kind = classify::classify_line(line, &self.config.indent_unit);
            let key = match kind {
                LineKind::Header => {
                    let key = classify::normalize_label(label);
                    current_section = Some(classify::section_of(&key).to_string());
                    key
                }
                LineKind::Subheader => {
                    let Some(section) = current_section.as_deref() else {
                        return Err(ParseError::OrphanSubheader {
                            line: line_no,
                            text: line.to_string(),
                        });
                    };
                    classify::dotted_key(section, &classify::normalize_label(label))
                }
            };

            let value = assemble::assemble_value(&key, kind, raw_value, &self.config);
            if let Some(previous) = entries.insert(key.clone(), value) {
                debug!(key, previous, line = line_no, "Key repeated; keeping last value");
            }
        }

        Ok(entries)
    }

    /// Second pass: runs every raw value through the extractor chain.
    pub fn type_entries(&self, raw: &RawEntries) -> StatsDocument {
        let options = self.config.extract_options();
        raw.iter()
            .map(|(key, value)| (key.clone(), extract::extract_value(value, &options)))
            .collect()
    }

    /// Renders a typed document back into raw values, one per key.
    ///
    /// Feeding the result to [`type_entries`](Self::type_entries) yields the
    /// same document.
    pub fn render_entries(document: &StatsDocument) -> RawEntries {
        document
            .iter()
            .map(|(key, value)| (key.to_string(), extract::render_raw(value)))
            .collect()
    }
}

/// Convenience lookup that never fails: unknown keys yield [`Value::Missing`].
pub fn get_value<'a>(document: &'a StatsDocument, key: &str) -> &'a Value {
    document.get(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scip_stats_core::{ProjectionError, Scalar};

    fn parse(text: &str) -> StatsDocument {
        StatsParser::default().parse(text).unwrap()
    }

    #[test]
    fn test_header_and_subheader_keys() {
        let doc = parse(
            "Total Time         :       1.52\n  solving          :       1.48\n  presolving       :       0.03 (included in solving)\n",
        );
        assert_eq!(
            doc.keys().collect::<Vec<_>>(),
            ["Total_Time", "Total_Time.solving", "Total_Time.presolving"]
        );
        assert_eq!(doc.get("Total_Time"), &Value::Float(1.52));
        assert_eq!(doc.get("Total_Time.presolving"), &Value::Float(0.03));
    }

    #[test]
    fn test_empty_header_body() {
        let doc = parse("Presolved Problem  :\n");
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["Presolved_Problem"]);
        assert_eq!(doc.get("Presolved_Problem"), &Value::RawString(String::new()));
    }

    #[test]
    fn test_subheaders_follow_nearest_header() {
        let doc = parse(
            "Original Problem   :\n  Variables        : 10 (4 binary, 2 integer, 0 implicit integer, 4 continuous)\nPresolved Problem  :\n  Variables        : 8 (4 binary, 2 integer, 0 implicit integer, 2 continuous)\n",
        );
        let original = doc.get("Original_Problem.Variables").as_record().unwrap();
        let presolved = doc.get("Presolved_Problem.Variables").as_record().unwrap();
        assert_eq!(original.int("conts"), Some(4));
        assert_eq!(presolved.int("conts"), Some(2));
    }

    #[test]
    fn test_dotted_header_labels_use_text_before_first_dot() {
        let raw = StatsParser::default()
            .assemble("Estim. Tree Size   :         25\n  extra            : 1\n")
            .unwrap();
        assert_eq!(raw.keys().collect::<Vec<_>>(), ["Estim._Tree_Size", "Estim.extra"]);
    }

    #[test]
    fn test_missing_delimiter_is_fatal() {
        let err = StatsParser::default()
            .parse("SCIP Status        : solved\nthis line has no delimiter\n")
            .unwrap_err();
        match err {
            ParseError::MalformedLine { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "this line has no delimiter");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_orphan_subheader_is_fatal() {
        let err = StatsParser::default()
            .parse("  solving          :       1.48\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::OrphanSubheader { line: 1, .. }));
    }

    #[test]
    fn test_malformed_reported_before_orphan() {
        let err = StatsParser::default().parse("  no delimiter\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let doc = parse("Total Time : 1.52\n\n   \n  solving : 1.48\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("Total_Time.solving"), &Value::Float(1.48));
    }

    #[test]
    fn test_repeated_key_keeps_position_and_last_value() {
        let doc = parse("A : 1\nB : 2\nA : 3\n");
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(doc.get("A"), &Value::Float(3.0));
    }

    #[test]
    fn test_unknown_key_is_missing() {
        let doc = parse("A : 1\n");
        assert!(get_value(&doc, "nonexistent_key").is_missing());
    }

    #[test]
    fn test_custom_delimiter_and_indent() {
        let config = ParserConfig {
            delimiter: '=',
            indent_unit: "\t".into(),
            ..ParserConfig::default()
        };
        let doc = StatsParser::new(config)
            .parse("Total Time = 1.52\n\tsolving = 1.48\n")
            .unwrap();
        assert_eq!(doc.get("Total_Time.solving"), &Value::Float(1.48));
    }

    #[test]
    fn test_project_propagators() {
        let doc = parse(
            "Propagators        : #Propagate   #ResProp    Cutoffs    DomReds\n  dualfix          :          1          0          0          0\n  redcost          :         12          0          0         45\n",
        );
        let table = doc.project("Propagators").unwrap();
        assert_eq!(table.columns, ["#Propagate", "#ResProp", "Cutoffs", "DomReds"]);
        assert_eq!(table.cell("redcost", "DomReds"), Some(45.0));
        assert_eq!(
            doc.get("Propagators.dualfix").as_tokens().unwrap()[0],
            Scalar::Int(1)
        );
    }

    #[test]
    fn test_project_invalid_section_fails() {
        let doc = parse("Total Time : 1.52\n  solving : 1.48\n");
        assert!(matches!(
            doc.project("Total_Time"),
            Err(ProjectionError::InvalidSection(_))
        ));
    }

    #[test]
    fn test_render_entries_retype_to_same_document() {
        let parser = StatsParser::default();
        let doc = parse(
            "Original Problem   :\n  Variables        : 10 (4 binary, 2 integer, 0 implicit integer, 4 continuous)\n  Constraints      : 812 initial, 812 maximal\nB&B Tree           :\n  nodes (total)    :         25 (12 internal, 13 leaves)\n  Gap              :      23.40 %\n",
        );
        let retyped = parser.type_entries(&StatsParser::render_entries(&doc));
        assert!(retyped.keys().eq(doc.keys()));
        assert_eq!(retyped, doc);
    }

    #[test]
    fn test_parser_applies_its_config() {
        let parser = StatsParser::new(ParserConfig {
            keep_estimation_internal: true,
            ..ParserConfig::default()
        });
        assert!(parser.config().keep_estimation_internal);

        let doc = parser
            .parse("Estimation Tree    : 25 nodes (25 visited, 12 internal, 13 leaves, 0 open), weight: 1.0000e+00\n")
            .unwrap();
        let tree = doc.get("Estimation_Tree").as_record().unwrap();
        assert_eq!(tree.int("et_internal"), Some(12));
    }
}
