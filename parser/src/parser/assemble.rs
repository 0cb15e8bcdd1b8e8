//! Raw value assembly: per-key cleanup of the text after the delimiter.
//!
//! Most values are stored trimmed and otherwise verbatim. A closed set of
//! keys gets bespoke normalization so that their rows line up with their
//! section's header row once projected into a table.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::classify::LineKind;
use crate::config::ParserConfig;
use scip_stats_core::PLACEHOLDER;

/// One normalization step applied to a raw value before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// Remove a trailing parenthetical annotation such as `(pool size: ...)`.
    StripTrailingParenthetical,
    /// Rewrite the two-word column `LP Iter...` as `LP_Iter...`.
    JoinLpIter,
    /// Insert a `-` token at `position` (or at the end if the row is shorter).
    InsertPlaceholder { position: usize },
    /// Append one `-` token.
    AppendPlaceholder,
    /// Append `times` `-` tokens; honored only with
    /// [`ParserConfig::pad_extended_lp_rows`].
    ExtendPlaceholders { times: usize },
}

const LP_ITER_SPACED: &str = "LP Iter";
const LP_ITER_JOINED: &str = "LP_Iter";

const HEADER_CLEANUPS: &[(&str, &[Cleanup])] = &[
    (
        "Conflict_Analysis",
        &[Cleanup::StripTrailingParenthetical, Cleanup::JoinLpIter],
    ),
    ("Diving_(single)", &[Cleanup::JoinLpIter]),
    ("Diving_(adaptive)", &[Cleanup::JoinLpIter]),
];

const ESTIMATION_ROW: &[Cleanup] = &[
    Cleanup::AppendPlaceholder,
    Cleanup::InsertPlaceholder { position: 2 },
];

const SHORT_LP_ROW: &[Cleanup] = &[Cleanup::ExtendPlaceholders { times: 3 }];

const SUBHEADER_CLEANUPS: &[(&str, &[Cleanup])] = &[
    (
        "Separators.cut_pool",
        &[
            Cleanup::StripTrailingParenthetical,
            Cleanup::InsertPlaceholder { position: 1 },
        ],
    ),
    ("LP.primal_LP", &[Cleanup::AppendPlaceholder]),
    ("LP.dual_LP", &[Cleanup::AppendPlaceholder]),
    ("LP.barrier_LP", &[Cleanup::AppendPlaceholder]),
    ("Estimations.gap", ESTIMATION_ROW),
    ("Estimations.tree-weight", ESTIMATION_ROW),
    ("Estimations.leaf-frequency", ESTIMATION_ROW),
    ("Estimations.ssg", ESTIMATION_ROW),
    ("Estimations.open-nodes", ESTIMATION_ROW),
    ("LP.lex_dual_LP", SHORT_LP_ROW),
    ("LP.resolve_instable", SHORT_LP_ROW),
    ("LP.diving/probing_LP", SHORT_LP_ROW),
    ("LP.(at_root_node)", SHORT_LP_ROW),
    ("LP.conflict_analysis", SHORT_LP_ROW),
];

static TRAILING_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\(.*\)$").expect("static regex must compile"));

/// Returns the cleanup steps registered for `key`, in application order.
pub fn cleanups_for(key: &str, kind: LineKind) -> &'static [Cleanup] {
    let table = match kind {
        LineKind::Header => HEADER_CLEANUPS,
        LineKind::Subheader => SUBHEADER_CLEANUPS,
    };
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, steps)| *steps)
        .unwrap_or(&[])
}

/// Trims `raw` and applies the cleanup steps registered for `key`.
pub fn assemble_value(key: &str, kind: LineKind, raw: &str, config: &ParserConfig) -> String {
    let mut value = raw.trim().to_string();
    for cleanup in cleanups_for(key, kind) {
        value = apply_cleanup(key, *cleanup, value, config);
    }
    value
}

fn apply_cleanup(key: &str, cleanup: Cleanup, value: String, config: &ParserConfig) -> String {
    debug!(key, ?cleanup, "Applying value cleanup");
    match cleanup {
        Cleanup::StripTrailingParenthetical => match TRAILING_PARENTHETICAL.find(&value) {
            Some(found) => value[..found.start()].to_string(),
            None => {
                debug!(key, "No trailing parenthetical to strip");
                value
            }
        },
        Cleanup::JoinLpIter => value.replace(LP_ITER_SPACED, LP_ITER_JOINED),
        Cleanup::InsertPlaceholder { position } => {
            let mut tokens = tokenize(&value);
            tokens.insert(position.min(tokens.len()), PLACEHOLDER);
            tokens.join(" ")
        }
        Cleanup::AppendPlaceholder => {
            let mut tokens = tokenize(&value);
            tokens.push(PLACEHOLDER);
            tokens.join(" ")
        }
        Cleanup::ExtendPlaceholders { times } => {
            if !config.pad_extended_lp_rows {
                debug!(key, times, "Placeholder padding disabled; keeping row unpadded");
                return value;
            }
            let mut tokens = tokenize(&value);
            tokens.extend(std::iter::repeat_n(PLACEHOLDER, times));
            tokens.join(" ")
        }
    }
}

fn tokenize(value: &str) -> Vec<&str> {
    value.split_whitespace().collect()
}
