//! Line classification and key normalization.
//!
//! A line that starts with the indentation unit continues the current
//! section; any other line opens a new one. Labels become keys by trimming
//! and replacing spaces with underscores.

/// Role of a physical report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Opens a top-level section (`Section`).
    Header,
    /// Continues the current section (`Section.SubEntry`).
    Subheader,
}

/// Classifies `line` by its leading indentation. Purely local, no lookahead.
pub fn classify_line(line: &str, indent_unit: &str) -> LineKind {
    if !indent_unit.is_empty() && line.starts_with(indent_unit) {
        LineKind::Subheader
    } else {
        LineKind::Header
    }
}

/// Splits a line at the first `delimiter` into `(label, value)`.
pub fn split_label_value(line: &str, delimiter: char) -> Option<(&str, &str)> {
    line.split_once(delimiter)
}

/// Canonical key segment for a raw label: trimmed, spaces replaced with `_`.
pub fn normalize_label(label: &str) -> String {
    label.trim().replace(' ', "_")
}

/// Section part of a key: everything before the first `.`.
pub fn section_of(key: &str) -> &str {
    key.split_once('.').map_or(key, |(section, _)| section)
}

pub fn dotted_key(section: &str, sub_entry: &str) -> String {
    format!("{section}.{sub_entry}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header_and_subheader() {
        assert_eq!(classify_line("LP                 :  Time", "  "), LineKind::Header);
        assert_eq!(classify_line("  dual LP          :  0.05", "  "), LineKind::Subheader);
        assert_eq!(classify_line("    (at root node) :  -", "  "), LineKind::Subheader);
        assert_eq!(classify_line(" single indent: 1", "  "), LineKind::Header);
    }

    #[test]
    fn test_empty_indent_unit_never_matches() {
        assert_eq!(classify_line("  dual LP: 1", ""), LineKind::Header);
    }

    #[test]
    fn test_split_at_first_delimiter_only() {
        assert_eq!(
            split_label_value("SCIP Status : solved [time: 1s]", ':'),
            Some(("SCIP Status ", " solved [time: 1s]"))
        );
        assert_eq!(split_label_value("no delimiter here", ':'), None);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Presolved Problem  "), "Presolved_Problem");
        assert_eq!(normalize_label("  diving/probing LP"), "diving/probing_LP");
        assert_eq!(normalize_label("(at root node) "), "(at_root_node)");
        assert_eq!(normalize_label("Estim. Tree Size"), "Estim._Tree_Size");
    }

    #[test]
    fn test_section_of() {
        assert_eq!(section_of("LP"), "LP");
        assert_eq!(section_of("LP.dual_LP"), "LP");
        assert_eq!(section_of("Estim._Tree_Size"), "Estim");
    }
}
