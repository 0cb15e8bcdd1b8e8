//! Section projection: reshaping a section's sub-entries into a [`Table`].
//!
//! The columns of a section are the token list stored at its bare key (the
//! header row); each `Section.SubEntry` key becomes one row, aligned
//! positionally against those columns.
//!
//! # Examples
//!
//! ```
//! use scip_stats_core::*;
//!
//! let doc: StatsDocument = [
//!     ("LP".to_string(), Value::RawString("Time Calls Iterations".into())),
//!     (
//!         "LP.dual_LP".to_string(),
//!         Value::TokenList(vec![Scalar::text("0.05"), Scalar::Int(10), Scalar::Int(300)]),
//!     ),
//!     (
//!         "LP.lex_dual_LP".to_string(),
//!         Value::TokenList(vec![Scalar::text("0.00"), Scalar::text("-")]),
//!     ),
//! ]
//! .into_iter()
//! .collect();
//!
//! let table = project_section(&doc, "LP").unwrap();
//! assert_eq!(table.columns, ["Time", "Calls", "Iterations"]);
//! assert_eq!(table.cell("dual_LP", "Iterations"), Some(300.0));
//! // Placeholders and absent cells are zero.
//! assert_eq!(table.row("lex_dual_LP").unwrap().cells, [0.0, 0.0, 0.0]);
//!
//! assert!(matches!(
//!     project_section(&doc, "SCIP_Status"),
//!     Err(ProjectionError::InvalidSection(_))
//! ));
//! ```

use thiserror::Error;

use crate::table::Table;
use crate::types::{Scalar, StatsDocument, Value, is_invalid_section};

/// Query-time failures of the projector and table operations.
///
/// These never invalidate the document they were raised against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The section is inherently non-tabular.
    #[error(
        "section '{0}' cannot be read as a table (see StatsDocument::invalid_sections)"
    )]
    InvalidSection(String),
    /// No bare-key header row is stored for the section.
    #[error("section '{0}' has no header row")]
    MissingHeader(String),
    /// The header row holds a value that is not a column list.
    #[error("header row of section '{section}' is a {kind}, not a column list")]
    HeaderNotTabular { section: String, kind: &'static str },
    /// A row cell is neither numeric nor the `-` placeholder.
    #[error("section '{section}', row '{row}', column '{column}': non-numeric cell '{value}'")]
    NonNumericCell {
        section: String,
        row: String,
        column: String,
        value: String,
    },
    /// A row has more cells than the header has columns.
    #[error("section '{section}', row '{row}': {cells} cells for {columns} columns")]
    RowTooWide {
        section: String,
        row: String,
        cells: usize,
        columns: usize,
    },
    /// A table lacks a requested column.
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// Projects `section` of `doc` into a [`Table`].
///
/// Rows keep document order; callers sort as needed.
///
/// # Errors
///
/// - [`ProjectionError::InvalidSection`] if `section` is in
///   [`INVALID_SECTIONS`](crate::INVALID_SECTIONS).
/// - [`ProjectionError::MissingHeader`] if no bare key `section` is stored.
/// - [`ProjectionError::HeaderNotTabular`] if the header row is not a token
///   list or raw string.
/// - [`ProjectionError::NonNumericCell`] / [`ProjectionError::RowTooWide`] for
///   rows that cannot be placed in the grid.
pub fn project_section(doc: &StatsDocument, section: &str) -> Result<Table, ProjectionError> {
    if is_invalid_section(section) {
        return Err(ProjectionError::InvalidSection(section.to_string()));
    }

    let columns = header_columns(section, doc.get(section))?;
    let mut table = Table::new(section, columns);

    for (row, value) in doc.section_entries(section) {
        let cells = row_cells(section, row, value, &table.columns)?;
        table.push_row(row, cells);
    }

    Ok(table)
}

fn header_columns(section: &str, header: &Value) -> Result<Vec<String>, ProjectionError> {
    match header {
        Value::TokenList(tokens) => Ok(tokens.iter().map(ToString::to_string).collect()),
        Value::RawString(raw) => Ok(raw.split_whitespace().map(str::to_string).collect()),
        Value::Missing => Err(ProjectionError::MissingHeader(section.to_string())),
        other => Err(ProjectionError::HeaderNotTabular {
            section: section.to_string(),
            kind: other.kind(),
        }),
    }
}

fn row_cells(
    section: &str,
    row: &str,
    value: &Value,
    columns: &[String],
) -> Result<Vec<f64>, ProjectionError> {
    let scalars: Vec<Scalar> = match value {
        Value::TokenList(tokens) => tokens.clone(),
        Value::RawString(raw) => raw.split_whitespace().map(Scalar::text).collect(),
        Value::Record(record) => record.values().cloned().collect(),
        Value::Float(x) => vec![Scalar::Float(*x)],
        Value::Integer(n) => vec![Scalar::Int(*n)],
        Value::Missing => Vec::new(),
    };

    if scalars.len() > columns.len() {
        return Err(ProjectionError::RowTooWide {
            section: section.to_string(),
            row: row.to_string(),
            cells: scalars.len(),
            columns: columns.len(),
        });
    }

    let mut cells = Vec::with_capacity(columns.len());
    for (scalar, column) in scalars.iter().zip(columns) {
        cells.push(cell_value(section, row, column, scalar)?);
    }
    cells.resize(columns.len(), 0.0);
    Ok(cells)
}

fn cell_value(
    section: &str,
    row: &str,
    column: &str,
    scalar: &Scalar,
) -> Result<f64, ProjectionError> {
    if scalar.is_placeholder() {
        return Ok(0.0);
    }
    scalar
        .as_f64()
        .ok_or_else(|| ProjectionError::NonNumericCell {
            section: section.to_string(),
            row: row.to_string(),
            column: column.to_string(),
            value: scalar.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{INVALID_SECTIONS, Record};

    fn tokens(raw: &str) -> Value {
        Value::TokenList(
            raw.split_whitespace()
                .map(|token| match token.parse::<i64>() {
                    Ok(n) => Scalar::Int(n),
                    Err(_) => Scalar::text(token),
                })
                .collect(),
        )
    }

    fn doc(entries: &[(&str, Value)]) -> StatsDocument {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_invalid_sections_never_project() {
        let doc = doc(&[("SCIP_Status", Value::RawString("solved".into()))]);
        for section in INVALID_SECTIONS {
            assert_eq!(
                project_section(&doc, section),
                Err(ProjectionError::InvalidSection(section.to_string()))
            );
        }
    }

    #[test]
    fn test_missing_header() {
        let doc = doc(&[("LP.dual_LP", tokens("0.05 10"))]);
        assert_eq!(
            project_section(&doc, "LP"),
            Err(ProjectionError::MissingHeader("LP".into()))
        );
    }

    #[test]
    fn test_header_must_be_column_list() {
        let doc = doc(&[("Solving", Value::Float(1.0))]);
        assert!(matches!(
            project_section(&doc, "Solving"),
            Err(ProjectionError::HeaderNotTabular { kind: "float", .. })
        ));
    }

    #[test]
    fn test_rows_are_padded_to_header_width() {
        let doc = doc(&[
            ("LP", tokens("Time Calls Iterations Iter/call Iter/sec")),
            ("LP.dual_LP", tokens("0.05 10 300 30.00 6000.00")),
            ("LP.lex_dual_LP", tokens("0.00 0 -")),
            ("LP.resolve_instable", Value::Missing),
        ]);

        let table = project_section(&doc, "LP").unwrap();
        assert_eq!(table.width(), 5);
        for row in &table.rows {
            assert_eq!(row.cells.len(), 5);
        }
        assert_eq!(table.row("lex_dual_LP").unwrap().cells, [0.0; 5]);
        assert_eq!(table.cell("dual_LP", "Iter/sec"), Some(6000.0));
    }

    #[test]
    fn test_record_rows_align_positionally() {
        let record = Record::new()
            .with("repropagations", Scalar::Int(2))
            .with("domain_reductions", Scalar::Int(5))
            .with("cutoffs", Scalar::text("0"));
        let doc = doc(&[
            ("Tree", Value::RawString("A B C D".into())),
            ("Tree.repropagations", Value::Record(record)),
            ("Tree.runs", Value::Float(1.0)),
        ]);

        let table = project_section(&doc, "Tree").unwrap();
        assert_eq!(table.row("repropagations").unwrap().cells, [2.0, 5.0, 0.0, 0.0]);
        assert_eq!(table.row("runs").unwrap().cells, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_row_too_wide() {
        let doc = doc(&[("LP", tokens("Time Calls")), ("LP.dual_LP", tokens("0.05 10 300"))]);
        assert!(matches!(
            project_section(&doc, "LP"),
            Err(ProjectionError::RowTooWide {
                cells: 3,
                columns: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_cell() {
        let doc = doc(&[("LP", tokens("Time Calls")), ("LP.dual_LP", tokens("0.05 many"))]);
        let err = project_section(&doc, "LP").unwrap_err();
        assert_eq!(
            err,
            ProjectionError::NonNumericCell {
                section: "LP".into(),
                row: "dual_LP".into(),
                column: "Calls".into(),
                value: "many".into(),
            }
        );
    }

    #[test]
    fn test_sections_do_not_leak_into_each_other() {
        let doc = doc(&[
            ("Constraints", tokens("Number MaxNumber")),
            ("Constraints.linear", tokens("580 585")),
            ("Constraint_Timings", tokens("TotalTime SetupTime")),
            ("Constraint_Timings.linear", tokens("0.10 0.00")),
        ]);
        let table = project_section(&doc, "Constraints").unwrap();
        assert_eq!(table.row_labels(), ["linear"]);
        assert_eq!(table.cell("linear", "MaxNumber"), Some(585.0));
    }
}
