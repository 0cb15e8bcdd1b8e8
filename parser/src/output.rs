//! Output formatting for documents, tables and activity series.

use scip_stats_core::{CrossSection, StatsDocument, Table, TableRow, Value};

use crate::timeline::ElementSeries;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a whole document in the requested output format.
pub fn format_document(document: &StatsDocument, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(document)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(document).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(entries_to_markdown(document.iter())),
        OutputFormat::Table => Ok(entries_to_table(document.iter())),
    }
}

/// Formats a single looked-up value.
pub fn format_value(key: &str, value: &Value, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(entries_to_markdown(std::iter::once((key, value)))),
        OutputFormat::Table => Ok(entries_to_table(std::iter::once((key, value)))),
    }
}

/// Formats a projected section table.
pub fn format_table(table: &Table, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(table)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(table).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(grid_to_markdown(
            &table.section,
            &table.columns,
            &labelled(&table.rows),
        )),
        OutputFormat::Table => Ok(grid_to_table(
            &table.section,
            &table.columns,
            &labelled(&table.rows),
        )),
    }
}

/// Formats one column sliced across several tables.
pub fn format_cross_section(
    cross_section: &CrossSection,
    format: OutputFormat,
) -> Result<String, String> {
    let title = format!("{} / {}", cross_section.section, cross_section.column);
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(cross_section)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(cross_section)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Markdown => Ok(grid_to_markdown(
            &title,
            &cross_section.labels,
            &labelled(&cross_section.rows),
        )),
        OutputFormat::Table => Ok(grid_to_table(
            &title,
            &cross_section.labels,
            &labelled(&cross_section.rows),
        )),
    }
}

/// Formats one element's activity over time, one row per frame.
pub fn format_series(series: &ElementSeries, format: OutputFormat) -> Result<String, String> {
    let title = format!("{}.{}", series.section, series.element);
    let rows: Vec<(String, Vec<String>)> = series
        .frames
        .iter()
        .map(|row| (row.frame.to_string(), render_cells(&row.cells)))
        .collect();
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(series)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(series).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(grid_to_markdown(&title, &series.columns, &rows)),
        OutputFormat::Table => Ok(grid_to_table(&title, &series.columns, &rows)),
    }
}

fn render_cells(cells: &[f64]) -> Vec<String> {
    cells.iter().map(ToString::to_string).collect()
}

fn labelled(rows: &[TableRow]) -> Vec<(String, Vec<String>)> {
    rows.iter()
        .map(|row| (row.label.clone(), render_cells(&row.cells)))
        .collect()
}

fn entries_to_markdown<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> String {
    let mut out = String::new();
    out.push_str("| Key | Kind | Value |\n");
    out.push_str("|-----|------|-------|\n");
    for (key, value) in entries {
        out.push_str(&format!("| `{key}` | {} | {value} |\n", value.kind()));
    }
    out
}

fn entries_to_table<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> String {
    let entries: Vec<(&str, &Value)> = entries.collect();
    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(&format!("{key:<width$}  {value}\n"));
    }
    out
}

fn grid_to_markdown(title: &str, columns: &[String], rows: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {title}\n\n"));
    out.push_str("| |");
    for column in columns {
        out.push_str(&format!(" {column} |"));
    }
    out.push('\n');
    out.push_str("|---|");
    for _ in columns {
        out.push_str("---|");
    }
    out.push('\n');
    for (label, cells) in rows {
        out.push_str(&format!("| `{label}` |"));
        for cell in cells {
            out.push_str(&format!(" {cell} |"));
        }
        out.push('\n');
    }
    out
}

fn grid_to_table(title: &str, columns: &[String], rows: &[(String, Vec<String>)]) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|(_, cells)| cells.get(index).map(String::len))
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!("{:<label_width$}", ""));
    for (column, width) in columns.iter().zip(&widths) {
        out.push_str(&format!("  {column:>width$}"));
    }
    out.push('\n');
    for (label, cells) in rows {
        out.push_str(&format!("{label:<label_width$}"));
        for (cell, width) in cells.iter().zip(&widths) {
            out.push_str(&format!("  {cell:>width$}"));
        }
        out.push('\n');
    }
    out
}
