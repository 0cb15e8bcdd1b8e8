//! Core document and table types for SCIP statistics reports.
//!
//! This crate defines the data model produced by `scip-stats-parser` and
//! consumed by reporting tools:
//!
//! - [`StatsDocument`]: insertion-ordered mapping from dotted keys
//!   (`Section` or `Section.SubEntry`) to typed [`Value`]s.
//! - [`Value`]: float, integer, named-field [`Record`], token list of
//!   [`Scalar`]s, or the verbatim raw string.
//! - [`Table`]: rectangular numeric view over one section, built on demand
//!   by [`project_section`].
//! - [`cross_section`] / [`Table::difference`]: comparisons across reports.
//!
//! Sections listed in [`INVALID_SECTIONS`] are scalar-only and are rejected
//! by the projector with [`ProjectionError::InvalidSection`].
//!
//! # Example
//!
//! ```
//! use scip_stats_core::*;
//!
//! let doc: StatsDocument = [
//!     ("Propagators".to_string(), Value::RawString("#Propagate #ResProp Cutoffs DomReds".into())),
//!     (
//!         "Propagators.dualfix".to_string(),
//!         Value::TokenList(vec![Scalar::Int(3), Scalar::Int(0), Scalar::Int(0), Scalar::Int(0)]),
//!     ),
//! ]
//! .into_iter()
//! .collect();
//!
//! let table = doc.project("Propagators").unwrap();
//! assert_eq!(table.width(), 4);
//! assert_eq!(table.cell("dualfix", "#Propagate"), Some(3.0));
//! assert!(doc.get("Propagators.rootredcost").is_missing());
//! ```

mod project;
mod table;
mod types;

pub use project::{ProjectionError, project_section};
pub use table::{CrossSection, Table, TableRow, cross_section};
pub use types::*;
