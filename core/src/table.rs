//! Rectangular numeric views over document sections.
//!
//! A [`Table`] is derived, never stored: the projector rebuilds it from a
//! [`StatsDocument`](crate::StatsDocument) on every call. Tables from
//! different reports can be compared ([`Table::difference`]) or sliced side by
//! side ([`cross_section`]).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::project::ProjectionError;

/// One labelled row of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<f64>,
}

/// Numeric grid with row labels (sub-entry names) and column labels (the
/// section's header row).
///
/// # Examples
///
/// ```
/// use scip_stats_core::Table;
///
/// let mut table = Table::new("LP", vec!["Time".into(), "Calls".into()]);
/// table.push_row("primal_LP", vec![0.0, 1.0]);
/// table.push_row("dual_LP", vec![0.05, 10.0]);
///
/// assert_eq!(table.cell("dual_LP", "Calls"), Some(10.0));
/// table.sort_rows();
/// assert_eq!(table.row_labels(), ["dual_LP", "primal_LP"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub section: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(section: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            section: section.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Cells are taken as given; the projector guarantees
    /// one cell per column.
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<f64>) {
        self.rows.push(TableRow {
            label: label.into(),
            cells,
        });
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(row)?.cells.get(idx).copied()
    }

    /// Returns `(row_label, value)` pairs for one column, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<(&str, f64)>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(|row| (row.label.as_str(), row.cells.get(idx).copied().unwrap_or(0.0)))
                .collect(),
        )
    }

    /// Sorts rows by label.
    pub fn sort_rows(&mut self) {
        self.rows.sort_by(|a, b| a.label.cmp(&b.label));
    }

    pub fn sorted(mut self) -> Self {
        self.sort_rows();
        self
    }

    /// Element-wise `self - other`.
    ///
    /// Rows and columns are aligned by label over the union of both tables;
    /// a cell absent on either side counts as zero. Rows come out sorted by
    /// label, columns keep `self`'s order followed by columns only `other` has.
    pub fn difference(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        for column in &other.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let mut labels: Vec<&str> = self.row_labels();
        for label in other.row_labels() {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels.sort_unstable();

        let mut diff = Table::new(self.section.clone(), columns.clone());
        for label in labels {
            let cells = columns
                .iter()
                .map(|column| {
                    let left = self.cell(label, column).unwrap_or(0.0);
                    let right = other.cell(label, column).unwrap_or(0.0);
                    left - right
                })
                .collect();
            diff.push_row(label, cells);
        }
        diff
    }
}

/// One column taken from several tables, side by side.
///
/// `labels` names the source of each cell position (e.g. one label per
/// report); each row holds one cell per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossSection {
    pub section: String,
    pub column: String,
    pub labels: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Slices `column` out of every table and joins the slices on row label.
///
/// Only rows present in every table are kept; rows are sorted by label.
///
/// # Errors
///
/// Returns [`ProjectionError::MissingColumn`] if any table lacks `column`.
pub fn cross_section(
    tables: &[(&str, &Table)],
    column: &str,
) -> Result<CrossSection, ProjectionError> {
    let section = tables
        .first()
        .map(|(_, table)| table.section.clone())
        .unwrap_or_default();

    let mut joined: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (position, (label, table)) in tables.iter().enumerate() {
        let values = table
            .column(column)
            .ok_or_else(|| ProjectionError::MissingColumn {
                table: (*label).to_string(),
                column: column.to_string(),
            })?;

        if position == 0 {
            for (row, value) in values {
                joined.insert(row, vec![value]);
            }
            continue;
        }

        let present: BTreeMap<&str, f64> = values.into_iter().collect();
        joined.retain(|row, cells| match present.get(row) {
            Some(value) => {
                cells.push(*value);
                true
            }
            None => false,
        });
    }

    Ok(CrossSection {
        section,
        column: column.to_string(),
        labels: tables.iter().map(|(label, _)| (*label).to_string()).collect(),
        rows: joined
            .into_iter()
            .map(|(label, cells)| TableRow {
                label: label.to_string(),
                cells,
            })
            .collect(),
    })
}
