//! Typed value extraction: an ordered chain of pattern recognizers.
//!
//! Each assembled raw value is offered to [`RULES`] in order; the first rule
//! that recognizes it decides the stored [`Value`]. A value no rule matches
//! stays a [`Value::RawString`]. The order is data, so every rule can be
//! enumerated and tested on its own.
//!
//! [`render_raw`] goes the other way: it writes a typed value back in the
//! text shape its rule recognizes, so re-extracting the rendering yields the
//! same value.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

use scip_stats_core::{Record, Scalar, Value};

/// Known table widths, one entry per tabular section.
///
/// A value whose whitespace token count equals one of these widths is stored
/// as a token list.
pub const TABLE_WIDTHS: &[(&str, usize)] = &[
    ("Presolvers", 12),
    ("Constraints", 15),
    ("Constraint_Timings", 10),
    ("Propagators", 4),
    ("Propagator_Timings", 6),
    ("Conflict_Analysis", 11),
    ("Separators", 8),
    ("Primal_Heuristics", 5),
    ("Diving_(single)", 13),
    ("Diving_(adaptive)", 13),
    ("Neighborhoods", 18),
];

/// Returns `true` if `width` matches a known table width.
pub fn is_table_width(width: usize) -> bool {
    TABLE_WIDTHS.iter().any(|(_, known)| *known == width)
}

/// Options that change what individual rules keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Keep the estimation tree's `internal` count as `et_internal`.
    pub keep_estimation_internal: bool,
}

/// One named recognizer: a pure function from raw text to an optional value.
#[derive(Clone, Copy)]
pub struct ExtractRule {
    pub name: &'static str,
    pub apply: fn(&str, &ExtractOptions) -> Option<Value>,
}

impl std::fmt::Debug for ExtractRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractRule").field("name", &self.name).finish()
    }
}

/// The extractor chain in priority order. First match wins.
pub static RULES: &[ExtractRule] = &[
    ExtractRule {
        name: "annotated_float",
        apply: annotated_float,
    },
    ExtractRule {
        name: "plain_number",
        apply: plain_number,
    },
    ExtractRule {
        name: "variable_counts",
        apply: variable_counts,
    },
    ExtractRule {
        name: "node_counts",
        apply: node_counts,
    },
    ExtractRule {
        name: "repropagations",
        apply: repropagations,
    },
    ExtractRule {
        name: "estimation_tree",
        apply: estimation_tree,
    },
    ExtractRule {
        name: "first_solution",
        apply: first_solution,
    },
    ExtractRule {
        name: "constraint_count",
        apply: constraint_count,
    },
    ExtractRule {
        name: "gap",
        apply: gap,
    },
    ExtractRule {
        name: "table_row",
        apply: table_row,
    },
];

/// Regex patterns for typed value extraction.
static PATTERNS: LazyLock<ValuePatterns> = LazyLock::new(ValuePatterns::new);

struct ValuePatterns {
    annotated_float: Regex,
    plain_number: Regex,
    variable_counts: Regex,
    node_counts: Regex,
    repropagations: Regex,
    estimation_tree: Regex,
    first_solution: Regex,
    constraint_count: Regex,
    gap: Regex,
    table_int: Regex,
}

impl ValuePatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure indicates
        // a programmer error in the pattern, not a runtime condition.
        Self {
            // 0.03 (included in solving)
            annotated_float: Regex::new(r"^(\d+\.\d+)\s\(.*$").expect("static regex must compile"),
            // 25, 1.52
            plain_number: Regex::new(r"^(\d+(?:\.\d+)?)$").expect("static regex must compile"),
            // 1234 (56 binary, 78 integer, 9 implicit integer, 1091 continuous)
            variable_counts: Regex::new(
                r"^(\d+)\s\((\d+)\sbinary,\s(\d+)\sinteger,\s(\d+)\simplicit integer,\s(\d+)\scontinuous\)$",
            )
            .expect("static regex must compile"),
            // 25 (12 internal, 13 leaves)
            node_counts: Regex::new(r"^(\d+) \((\d+) internal, (\d+) leaves\)")
                .expect("static regex must compile"),
            // 2 (5 domain reductions, 0 cutoffs)
            repropagations: Regex::new(r"^(\d+) \((\d+) domain reductions, (\d+) cutoffs\)")
                .expect("static regex must compile"),
            // 25 nodes (25 visited, 12 internal, 13 leaves, 0 open), weight: ...
            estimation_tree: Regex::new(
                r"^(\d+) nodes \((\d+) visited, (\d+) internal, (\d+) leaves, (\d+) open",
            )
            .expect("static regex must compile"),
            // +1.5e+02   (in run 1, after 1 nodes, 0.12 seconds, depth 3, found by <rounding>)
            first_solution: Regex::new(
                r"^([+-]?\d\.\d+e\+\d+)\s+.*\(in run (\d+), after (\d+) nodes, (\d+\.\d+) seconds, depth (\d+), found by <(\w+)>\)",
            )
            .expect("static regex must compile"),
            // 812 initial, 812 maximal
            constraint_count: Regex::new(r"^(\d+)\sinitial").expect("static regex must compile"),
            // 23.4 %
            gap: Regex::new(r"^(\d+\.\d+)\s%").expect("static regex must compile"),
            // 580, 580+
            table_int: Regex::new(r"^(\d+)\+?$").expect("static regex must compile"),
        }
    }
}

/// Runs `raw` through [`RULES`] and returns the first match, or the raw
/// string itself when nothing matches.
pub fn extract_value(raw: &str, options: &ExtractOptions) -> Value {
    match apply_rules(raw, options) {
        Some((rule, value)) => {
            debug!(rule, kind = value.kind(), "Extracted typed value");
            value
        }
        None => Value::RawString(raw.to_string()),
    }
}

/// Name of the first rule that recognizes `raw`, if any.
pub fn matching_rule(raw: &str, options: &ExtractOptions) -> Option<&'static str> {
    apply_rules(raw, options).map(|(rule, _)| rule)
}

fn apply_rules(raw: &str, options: &ExtractOptions) -> Option<(&'static str, Value)> {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(raw, options).map(|value| (rule.name, value)))
}

fn capture<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn int_field(caps: &Captures<'_>, group: usize) -> Option<Scalar> {
    capture::<i64>(caps, group).map(Scalar::Int)
}

fn float_field(caps: &Captures<'_>, group: usize) -> Option<Scalar> {
    capture::<f64>(caps, group).map(Scalar::Float)
}

fn annotated_float(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.annotated_float.captures(raw)?;
    capture(&caps, 1).map(Value::Float)
}

fn plain_number(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.plain_number.captures(raw)?;
    capture(&caps, 1).map(Value::Float)
}

fn variable_counts(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.variable_counts.captures(raw)?;
    Some(Value::Record(
        Record::new()
            .with("vars", int_field(&caps, 1)?)
            .with("bins", int_field(&caps, 2)?)
            .with("ints", int_field(&caps, 3)?)
            .with("impl_ints", int_field(&caps, 4)?)
            .with("conts", int_field(&caps, 5)?),
    ))
}

fn node_counts(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.node_counts.captures(raw)?;
    Some(Value::Record(
        Record::new()
            .with("nodes", int_field(&caps, 1)?)
            .with("internal", int_field(&caps, 2)?)
            .with("leaves", int_field(&caps, 3)?),
    ))
}

fn repropagations(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.repropagations.captures(raw)?;
    // cutoffs stays the matched text.
    Some(Value::Record(
        Record::new()
            .with("repropagations", int_field(&caps, 1)?)
            .with("domain_reductions", int_field(&caps, 2)?)
            .with("cutoffs", Scalar::text(caps.get(3)?.as_str())),
    ))
}

fn estimation_tree(raw: &str, options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.estimation_tree.captures(raw)?;
    let mut record = Record::new()
        .with("et_nodes", int_field(&caps, 1)?)
        .with("et_visited", int_field(&caps, 2)?);
    if options.keep_estimation_internal {
        record = record.with("et_internal", int_field(&caps, 3)?);
    }
    Some(Value::Record(
        record
            .with("et_leaves", int_field(&caps, 4)?)
            .with("et_open", int_field(&caps, 5)?),
    ))
}

fn first_solution(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.first_solution.captures(raw)?;
    Some(Value::Record(
        Record::new()
            .with("first_sol", float_field(&caps, 1)?)
            .with("run", int_field(&caps, 2)?)
            .with("after_nodes", int_field(&caps, 3)?)
            .with("seconds", float_field(&caps, 4)?)
            .with("depth", int_field(&caps, 5)?)
            .with("found_by_heur", Scalar::text(caps.get(6)?.as_str())),
    ))
}

fn constraint_count(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.constraint_count.captures(raw)?;
    capture(&caps, 1).map(Value::Integer)
}

fn gap(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let caps = PATTERNS.gap.captures(raw)?;
    capture(&caps, 1).map(Value::Float)
}

fn table_row(raw: &str, _options: &ExtractOptions) -> Option<Value> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if !is_table_width(tokens.len()) {
        return None;
    }
    Some(Value::TokenList(
        tokens.into_iter().map(coerce_token).collect(),
    ))
}

/// Integer tokens (optionally followed by `+`) become [`Scalar::Int`];
/// everything else stays text.
pub fn coerce_token(token: &str) -> Scalar {
    PATTERNS
        .table_int
        .captures(token)
        .and_then(|caps| capture::<i64>(&caps, 1))
        .map_or_else(|| Scalar::text(token), Scalar::Int)
}

/// Separator for re-rendered token lists. Rules ahead of `table_row` expect a
/// single space between their leading tokens, so a rendered row never matches
/// them, even after `5+` is written back as `5`.
const TOKEN_SEPARATOR: &str = "  ";

/// Writes `value` back in the raw text shape its extractor rule recognizes.
pub fn render_raw(value: &Value) -> String {
    match value {
        Value::Float(x) => x.to_string(),
        Value::Integer(n) => format!("{n} initial"),
        Value::Record(record) => render_record(record),
        Value::TokenList(tokens) => tokens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(TOKEN_SEPARATOR),
        Value::RawString(raw) => raw.clone(),
        Value::Missing => String::new(),
    }
}

fn render_record(record: &Record) -> String {
    let int = |name: &str| record.int(name).unwrap_or_default();
    let text = |name: &str| record.get(name).map(ToString::to_string).unwrap_or_default();
    let float = |name: &str| {
        record
            .get(name)
            .and_then(Scalar::as_f64)
            .unwrap_or_default()
    };

    if record.contains("vars") {
        format!(
            "{} ({} binary, {} integer, {} implicit integer, {} continuous)",
            int("vars"),
            int("bins"),
            int("ints"),
            int("impl_ints"),
            int("conts")
        )
    } else if record.contains("nodes") {
        format!(
            "{} ({} internal, {} leaves)",
            int("nodes"),
            int("internal"),
            int("leaves")
        )
    } else if record.contains("repropagations") {
        format!(
            "{} ({} domain reductions, {} cutoffs)",
            int("repropagations"),
            int("domain_reductions"),
            text("cutoffs")
        )
    } else if record.contains("et_nodes") {
        format!(
            "{} nodes ({} visited, {} internal, {} leaves, {} open)",
            int("et_nodes"),
            int("et_visited"),
            int("et_internal"),
            int("et_leaves"),
            int("et_open")
        )
    } else if record.contains("first_sol") {
        format!(
            "{}   (in run {}, after {} nodes, {} seconds, depth {}, found by <{}>)",
            format_scientific(float("first_sol")),
            int("run"),
            int("after_nodes"),
            format_decimal(float("seconds")),
            int("depth"),
            text("found_by_heur")
        )
    } else {
        record
            .values()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `1.5e+02` style: at least one fractional digit, signed two-digit exponent.
fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.to_string()
    } else {
        format!("{mantissa}.0")
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// Decimal rendering that always carries a fractional part.
fn format_decimal(value: f64) -> String {
    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> Value {
        extract_value(raw, &ExtractOptions::default())
    }

    fn rule(raw: &str) -> Option<&'static str> {
        matching_rule(raw, &ExtractOptions::default())
    }

    fn record(value: &Value) -> &Record {
        value.as_record().expect("value should be a record")
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            [
                "annotated_float",
                "plain_number",
                "variable_counts",
                "node_counts",
                "repropagations",
                "estimation_tree",
                "first_solution",
                "constraint_count",
                "gap",
                "table_row",
            ]
        );
    }

    #[test]
    fn test_annotated_float() {
        assert_eq!(extract("0.03 (included in solving)"), Value::Float(0.03));
        assert_eq!(rule("0.01 (2 times copied the problem)"), Some("annotated_float"));
        assert_eq!(rule("3 (integer only)"), None);
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(extract("1.52"), Value::Float(1.52));
        assert_eq!(extract("25"), Value::Float(25.0));
        assert_eq!(rule("-1.5"), None);
    }

    #[test]
    fn test_variable_counts() {
        let value = extract("1234 (56 binary, 78 integer, 9 implicit integer, 1091 continuous)");
        let record = record(&value);
        assert_eq!(record.int("vars"), Some(1234));
        assert_eq!(record.int("bins"), Some(56));
        assert_eq!(record.int("ints"), Some(78));
        assert_eq!(record.int("impl_ints"), Some(9));
        assert_eq!(record.int("conts"), Some(1091));
    }

    #[test]
    fn test_node_counts() {
        let value = extract("25 (12 internal, 13 leaves)");
        assert_eq!(
            value,
            Value::Record(
                Record::new()
                    .with("nodes", Scalar::Int(25))
                    .with("internal", Scalar::Int(12))
                    .with("leaves", Scalar::Int(13))
            )
        );
    }

    #[test]
    fn test_repropagations_keep_cutoffs_as_text() {
        let value = extract("2 (5 domain reductions, 0 cutoffs)");
        let record = record(&value);
        assert_eq!(record.int("repropagations"), Some(2));
        assert_eq!(record.int("domain_reductions"), Some(5));
        assert_eq!(record.get("cutoffs"), Some(&Scalar::text("0")));
    }

    #[test]
    fn test_estimation_tree_drops_internal_by_default() {
        let raw = "25 nodes (25 visited, 12 internal, 13 leaves, 0 open), weight: 1.0000e+00 completed 1.0000e+00";
        let value = extract(raw);
        let names: Vec<&str> = record(&value).field_names().collect();
        assert_eq!(names, ["et_nodes", "et_visited", "et_leaves", "et_open"]);

        let kept = extract_value(
            raw,
            &ExtractOptions {
                keep_estimation_internal: true,
            },
        );
        assert_eq!(record(&kept).int("et_internal"), Some(12));
    }

    #[test]
    fn test_first_solution() {
        let value = extract(
            "+1.50000000000000e+02   (in run 1, after 1 nodes, 0.12 seconds, depth 3, found by <rounding>)",
        );
        let record = record(&value);
        assert_eq!(record.get("first_sol"), Some(&Scalar::Float(150.0)));
        assert_eq!(record.int("run"), Some(1));
        assert_eq!(record.int("after_nodes"), Some(1));
        assert_eq!(record.get("seconds"), Some(&Scalar::Float(0.12)));
        assert_eq!(record.int("depth"), Some(3));
        assert_eq!(record.get("found_by_heur"), Some(&Scalar::text("rounding")));
    }

    #[test]
    fn test_constraint_count() {
        assert_eq!(extract("812 initial, 812 maximal"), Value::Integer(812));
    }

    #[test]
    fn test_gap() {
        assert_eq!(extract("23.4 %"), Value::Float(23.4));
        assert_eq!(rule("0.00 %"), Some("gap"));
    }

    #[test]
    fn test_table_row_coerces_integer_tokens() {
        let value = extract("580+ 585 10 1500 6 0 0 210 0 5 130 80 60 3 -");
        let tokens = value.as_tokens().expect("15-token row");
        assert_eq!(tokens.len(), 15);
        assert_eq!(tokens[0], Scalar::Int(580));
        assert_eq!(tokens[1], Scalar::Int(585));
        assert_eq!(tokens[14], Scalar::text("-"));
    }

    #[test]
    fn test_table_row_keeps_decimal_tokens_as_text() {
        let value = extract("0.00 0 0 0.00 -");
        assert_eq!(
            value,
            Value::TokenList(vec![
                Scalar::text("0.00"),
                Scalar::Int(0),
                Scalar::Int(0),
                Scalar::text("0.00"),
                Scalar::text("-"),
            ])
        );
    }

    #[test]
    fn test_unknown_width_falls_through_to_raw() {
        assert_eq!(rule("a b c"), None);
        assert_eq!(
            extract("problem is solved"),
            Value::RawString("problem is solved".into())
        );
        assert_eq!(extract(""), Value::RawString(String::new()));
    }

    #[test]
    fn test_header_rows_with_table_width_become_token_lists() {
        let value = extract("#Propagate #ResProp Cutoffs DomReds");
        assert_eq!(value.as_tokens().map(<[Scalar]>::len), Some(4));
    }

    #[test]
    fn test_known_widths() {
        for width in [12, 15, 10, 4, 6, 11, 8, 5, 13, 18] {
            assert!(is_table_width(width), "width {width}");
        }
        assert!(!is_table_width(7));
        assert!(!is_table_width(3));
    }

    #[test]
    fn test_render_roundtrips_through_the_same_rule() {
        let samples = [
            "0.03 (included in solving)",
            "1.52",
            "1234 (56 binary, 78 integer, 9 implicit integer, 1091 continuous)",
            "25 (12 internal, 13 leaves)",
            "2 (5 domain reductions, 0 cutoffs)",
            "25 nodes (25 visited, 12 internal, 13 leaves, 0 open), weight: 1.0000e+00",
            "+1.50000000000000e+02   (in run 1, after 1 nodes, 0.12 seconds, depth 3, found by <rounding>)",
            "-2.5e+10 (in run 2, after 7 nodes, 3.50 seconds, depth 1, found by <shifting>)",
            "812 initial, 812 maximal",
            "23.4 %",
            "580+ 585 10 1500",
            "812  initial a b",
            "5+ initial x y",
            "23.40  % a b",
            "some narrative text",
        ];
        for raw in samples {
            let first = extract(raw);
            let second = extract(&render_raw(&first));
            assert_eq!(first, second, "raw: {raw}");
        }
    }

    #[test]
    fn test_rendered_token_list_stays_a_table_row() {
        let value = extract("5+ initial x y");
        assert_eq!(
            value,
            Value::TokenList(vec![
                Scalar::Int(5),
                Scalar::text("initial"),
                Scalar::text("x"),
                Scalar::text("y"),
            ])
        );
        assert_eq!(render_raw(&value), "5  initial  x  y");
        assert_eq!(rule(&render_raw(&value)), Some("table_row"));
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(150.0), "1.5e+02");
        assert_eq!(format_scientific(1000.0), "1.0e+03");
        assert_eq!(format_scientific(-2.5e10), "-2.5e+10");
    }
}
