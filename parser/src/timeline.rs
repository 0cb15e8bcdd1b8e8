//! Per-element activity over a sequence of report snapshots.
//!
//! A solver run interrupted at increasing time limits leaves one report per
//! time frame. Projecting the same sections out of every frame and stacking
//! each element's row gives that element's activity over time, e.g. how the
//! `dual_LP` call count of the `LP` section grows frame by frame.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use scip_stats_core::{StatsDocument, Table};

/// One element's row in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    pub frame: usize,
    pub cells: Vec<f64>,
}

/// The rows of one `section.element` across frames, sorted by frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSeries {
    pub section: String,
    pub element: String,
    /// Fixed by the first frame recorded for this element.
    pub columns: Vec<String>,
    pub frames: Vec<FrameRow>,
}

impl ElementSeries {
    /// Values of one column over time, as `(frame, value)` pairs.
    pub fn column(&self, column: &str) -> Option<Vec<(usize, f64)>> {
        let index = self.columns.iter().position(|name| name == column)?;
        Some(
            self.frames
                .iter()
                .map(|row| (row.frame, row.cells.get(index).copied().unwrap_or(0.0)))
                .collect(),
        )
    }
}

/// Accumulates element series from successive frames.
///
/// # Examples
///
/// ```
/// use scip_stats_parser::{ActivityTimeline, parse_stats_text, ParserConfig};
///
/// let config = ParserConfig::default();
/// let mut timeline = ActivityTimeline::new();
/// for (frame, calls) in [(1, 3), (0, 1)] {
///     let text = format!(
///         "Propagators : #Propagate #ResProp Cutoffs DomReds\n  dualfix : {calls} 0 0 0\n"
///     );
///     let doc = parse_stats_text(&text, &config).unwrap();
///     timeline.record_frame(frame, &doc, &["Propagators"]).unwrap();
/// }
///
/// let series = timeline.series("Propagators", "dualfix").unwrap();
/// assert_eq!(series.column("#Propagate").unwrap(), [(0, 1.0), (1, 3.0)]);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityTimeline {
    series: BTreeMap<String, ElementSeries>,
}

impl ActivityTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects each of `sections` out of `document` and appends every row
    /// to its element's series under `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Projection`](crate::ParseError::Projection) if a
    /// section cannot be projected.
    pub fn record_frame(
        &mut self,
        frame: usize,
        document: &StatsDocument,
        sections: &[&str],
    ) -> Result<()> {
        for section in sections {
            let table = document.project(section)?;
            self.record_table(frame, &table);
        }
        Ok(())
    }

    /// Appends every row of an already projected `table` under `frame`.
    pub fn record_table(&mut self, frame: usize, table: &Table) {
        debug!(frame, section = %table.section, rows = table.height(), "Recording frame");
        for row in &table.rows {
            let key = format!("{}.{}", table.section, row.label);
            let series = self.series.entry(key).or_insert_with(|| ElementSeries {
                section: table.section.clone(),
                element: row.label.clone(),
                columns: table.columns.clone(),
                frames: Vec::new(),
            });

            let mut cells = if series.columns == table.columns {
                row.cells.clone()
            } else {
                warn!(
                    frame,
                    section = %table.section,
                    element = %row.label,
                    "Frame columns differ from first frame; aligning by name"
                );
                align_cells(&series.columns, &table.columns, &row.cells)
            };

            // Short rows are zero-padded, as the projector does.
            if cells.len() < series.columns.len() {
                cells.resize(series.columns.len(), 0.0);
            }

            let at = series.frames.partition_point(|existing| existing.frame <= frame);
            series.frames.insert(at, FrameRow { frame, cells });
        }
    }

    /// The series for `section.element`, if any frame contained it.
    pub fn series(&self, section: &str, element: &str) -> Option<&ElementSeries> {
        self.series.get(&format!("{section}.{element}"))
    }

    /// `section.element` keys of every recorded series, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn align_cells(columns: &[String], source_columns: &[String], cells: &[f64]) -> Vec<f64> {
    columns
        .iter()
        .map(|column| {
            source_columns
                .iter()
                .position(|name| name == column)
                .and_then(|index| cells.get(index).copied())
                .unwrap_or(0.0)
        })
        .collect()
}

/// Report file name for a 0-based `frame`: `dir/stem.ext` becomes
/// `dir/stem_{frame + 1}.ext`.
pub fn frame_file_name(path: &Path, frame: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{}.{}", frame + 1, ext.to_string_lossy()),
        None => format!("{stem}_{}", frame + 1),
    };
    path.with_file_name(name)
}
