//! Typed values and the ordered statistics document.
//!
//! A parsed report is a [`StatsDocument`]: an insertion-ordered mapping from
//! dotted keys (`Section` or `Section.SubEntry`) to [`Value`]s. Which value
//! variant a key holds is decided by the parser's extractor chain, never
//! declared up front.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::project::{ProjectionError, project_section};
use crate::table::Table;

/// Placeholder text used by the report format for "no value".
pub const PLACEHOLDER: &str = "-";

/// Sections whose content is scalar or narrative and therefore can never be
/// projected into a [`Table`].
pub const INVALID_SECTIONS: &[&str] = &[
    "SCIP_Status",
    "Total_Time",
    "Original_Problem",
    "Presolved_Problem",
    "Pricers",
    "B&B_Tree",
    "Estim._Tree_Size",
    "Estimation_Tree",
    "Root_Node",
    "Integrals",
];

/// Returns `true` if `section` is a member of [`INVALID_SECTIONS`].
pub fn is_invalid_section(section: &str) -> bool {
    INVALID_SECTIONS.contains(&section)
}

/// A single typed cell: a record field or one token of a token list.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Creates a text scalar.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the numeric value of this scalar, if it has one.
    ///
    /// Text is parsed as a float; the placeholder `-` is not numeric here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(text) => text.parse::<f64>().ok(),
        }
    }

    /// Returns `true` if this scalar is the format's `-` placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Text(text) if text == PLACEHOLDER)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// A composite value with named fields, kept in field order.
///
/// # Examples
///
/// ```
/// use scip_stats_core::{Record, Scalar};
///
/// let record = Record::new()
///     .with("nodes", Scalar::Int(25))
///     .with("internal", Scalar::Int(12))
///     .with("leaves", Scalar::Int(13));
///
/// assert_eq!(record.len(), 3);
/// assert_eq!(record.get("leaves"), Some(&Scalar::Int(13)));
/// assert_eq!(record.field_names().collect::<Vec<_>>(), ["nodes", "internal", "leaves"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Scalar>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns the record.
    pub fn with(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns the field named `name`.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.get(name)
    }

    /// Returns the integer value of field `name`, if it holds one.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.fields.get(name)? {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Typed value stored under one document key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Bare float (plain numbers, annotated numbers, percentages).
    Float(f64),
    /// Integer count (e.g. initial constraint count).
    Integer(i64),
    /// Named-field composite (variable counts, node counts, first solution, ...).
    Record(Record),
    /// Whitespace-tokenized table row whose width matches a known section.
    TokenList(Vec<Scalar>),
    /// Text no extractor rule recognized, kept verbatim.
    RawString(String),
    /// Sentinel returned by [`StatsDocument::get`] for unknown keys. Never stored.
    Missing,
}

impl Value {
    /// Returns the float payload of a [`Value::Float`] or [`Value::Integer`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[Scalar]> {
        match self {
            Self::TokenList(tokens) => Some(tokens),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::RawString(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Short lowercase name of the variant, used in diagnostics and output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Integer(_) => "integer",
            Self::Record(_) => "record",
            Self::TokenList(_) => "token_list",
            Self::RawString(_) => "raw_string",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(x) => write!(f, "{x}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Record(record) => {
                f.write_str("{")?;
                for (idx, (name, value)) in record.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            Self::TokenList(tokens) => {
                let joined = tokens
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "[{joined}]")
            }
            Self::RawString(raw) => f.write_str(raw),
            Self::Missing => f.write_str(PLACEHOLDER),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Record(record) => record.serialize(serializer),
            Self::TokenList(tokens) => tokens.serialize(serializer),
            Self::RawString(raw) => serializer.serialize_str(raw),
            Self::Missing => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

static MISSING: Value = Value::Missing;

/// Parsed statistics report: an insertion-ordered key → [`Value`] mapping.
///
/// Keys keep file order. The document is built once by the parser and has no
/// mutation API afterwards; projections only read it.
///
/// # Examples
///
/// ```
/// use scip_stats_core::{StatsDocument, Value};
///
/// let doc: StatsDocument = [
///     ("Total_Time".to_string(), Value::Float(1.52)),
///     ("Total_Time.solving".to_string(), Value::Float(1.48)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(doc.get("Total_Time.solving"), &Value::Float(1.48));
/// assert!(doc.get("nonexistent_key").is_missing());
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["Total_Time", "Total_Time.solving"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatsDocument {
    entries: IndexMap<String, Value>,
}

impl StatsDocument {

    /// Returns the value stored under `key`, or the [`Value::Missing`]
    /// sentinel when the key is unknown.
    pub fn get(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&MISSING)
    }

    /// Returns the value stored under `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is stored, including keys with empty bodies.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion (file) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed set of non-tabular section names.
    pub fn invalid_sections() -> &'static [&'static str] {
        INVALID_SECTIONS
    }

    /// Sub-entries of `section` in file order, as `(sub_entry, value)` pairs.
    pub fn section_entries<'a>(
        &'a self,
        section: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.entries.iter().filter_map(move |(key, value)| {
            let (prefix, sub_entry) = key.split_once('.')?;
            (prefix == section).then_some((sub_entry, value))
        })
    }

    /// Projects `section` into a [`Table`]. See [`project_section`].
    pub fn project(&self, section: &str) -> Result<Table, ProjectionError> {
        project_section(self, section)
    }
}

/// Documents are equal when they hold the same entries in the same order.
impl PartialEq for StatsDocument {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<(String, Value)> for StatsDocument {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for StatsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
