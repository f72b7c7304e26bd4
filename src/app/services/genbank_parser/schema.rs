//! Column layout of GenBank fields
//!
//! The flat-file format has no delimiters: a line's role is decided purely
//! by where its text starts. Each field uses one [`FieldLayout`]; the
//! [`Schema`] maps field names to layouts and is built once from
//! [`SchemaConfig`].

use crate::config::SchemaConfig;
use std::collections::HashMap;

/// Column positions for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Content starts at this column; everything before is the label
    pub separator_column: usize,

    /// An alphanumeric character here starts a subfield; `None` disables subfields
    pub subfield_column: Option<usize>,

    /// Columns past `subfield_column` where a label may also start
    pub subfield_slack: usize,
}

impl FieldLayout {
    pub fn new(separator_column: usize, subfield_column: Option<usize>) -> Self {
        Self {
            separator_column,
            subfield_column,
            subfield_slack: 0,
        }
    }

    pub fn with_subfield_slack(mut self, slack: usize) -> Self {
        self.subfield_slack = slack;
        self
    }

    pub fn allows_subfields(&self) -> bool {
        self.subfield_column.is_some()
    }

    /// Whether `line` holds a subfield label at the subfield column
    ///
    /// The label must follow only spaces and start within
    /// `subfield_column..=subfield_column + subfield_slack`.
    pub fn starts_subfield(&self, line: &str) -> bool {
        let Some(column) = self.subfield_column else {
            return false;
        };
        let indent = line.chars().take_while(|c| *c == ' ').count();
        (column..=column + self.subfield_slack).contains(&indent)
            && line.chars().nth(indent).is_some_and(char::is_alphanumeric)
    }

    /// Trimmed label text before the separator column
    pub fn label<'a>(&self, line: &'a str) -> &'a str {
        let end = byte_offset(line, self.separator_column);
        line[..end].trim()
    }

    /// Trimmed content after the separator column
    ///
    /// Lines shorter than the separator column yield an empty payload.
    pub fn payload<'a>(&self, line: &'a str) -> &'a str {
        let start = byte_offset(line, self.separator_column);
        line[start..].trim()
    }
}

/// Byte offset of the `column`-th character, clamped to the line length
fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

/// Immutable layout table shared by every parse
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    end_marker: String,
    default_layout: FieldLayout,
    overrides: HashMap<String, FieldLayout>,
}

impl Schema {
    /// Build the layout table from configuration
    pub fn from_config(config: &SchemaConfig) -> Self {
        let default_layout = FieldLayout::new(
            config.short_separator_column,
            Some(config.short_subfield_column),
        )
        .with_subfield_slack(config.short_subfield_slack);

        let mut overrides = HashMap::new();
        overrides.insert(
            config.long_field.to_lowercase(),
            FieldLayout::new(
                config.long_separator_column,
                Some(config.long_subfield_column),
            ),
        );
        overrides.insert(config.flat_field.to_lowercase(), FieldLayout::new(0, None));

        Self {
            end_marker: config.record_end_marker.clone(),
            default_layout,
            overrides,
        }
    }

    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    pub fn is_record_end(&self, line: &str) -> bool {
        line.starts_with(&self.end_marker)
    }

    /// Layout for a field; unknown or absent fields use the ordinary layout
    pub fn layout(&self, field: Option<&str>) -> &FieldLayout {
        field
            .and_then(|name| self.overrides.get(name))
            .unwrap_or(&self.default_layout)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::from_config(&SchemaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layouts() {
        let schema = Schema::default();
        let short = FieldLayout::new(12, Some(2)).with_subfield_slack(1);
        assert_eq!(schema.layout(Some("locus")), &short);
        assert_eq!(schema.layout(Some("features")), &FieldLayout::new(21, Some(5)));
        assert_eq!(schema.layout(Some("origin")), &FieldLayout::new(0, None));
        assert_eq!(schema.layout(None), &short);
    }

    #[test]
    fn test_payload_and_label() {
        let layout = FieldLayout::new(12, Some(2));
        let line = "  ORGANISM  Saccharomyces cerevisiae";
        assert_eq!(layout.label(line), "ORGANISM");
        assert_eq!(layout.payload(line), "Saccharomyces cerevisiae");
        assert!(layout.starts_subfield(line));
    }

    #[test]
    fn test_short_line_has_empty_payload() {
        let layout = FieldLayout::new(12, Some(2));
        assert_eq!(layout.payload("ORIGIN"), "");
        assert_eq!(layout.label("ORIGIN"), "ORIGIN");
        assert!(!layout.starts_subfield(" "));
    }

    #[test]
    fn test_subfield_label_within_slack() {
        let layout = FieldLayout::new(12, Some(2)).with_subfield_slack(1);
        assert!(layout.starts_subfield("  JOURNAL   Yeast 10 (11)"));
        assert!(layout.starts_subfield("   PUBMED   7871890"));
        assert!(!layout.starts_subfield("    DEEPER  too far"));
        assert!(!layout.starts_subfield(" SHALLOW   too near"));
        assert_eq!(layout.label("   PUBMED   7871890"), "PUBMED");
        assert_eq!(layout.payload("   PUBMED   7871890"), "7871890");

        let exact = FieldLayout::new(12, Some(2));
        assert!(!exact.starts_subfield("   PUBMED   7871890"));
    }

    #[test]
    fn test_flat_layout_never_starts_subfield() {
        let layout = FieldLayout::new(0, None);
        assert!(!layout.allows_subfields());
        assert!(!layout.starts_subfield("        1 gatcctccat"));
        assert_eq!(layout.payload("        1 gatcctccat"), "1 gatcctccat");
    }

    #[test]
    fn test_payload_with_multibyte_text() {
        let layout = FieldLayout::new(12, Some(2));
        let line = "            Müller,J. and Ødegaard,K.";
        assert_eq!(layout.payload(line), "Müller,J. and Ødegaard,K.");
    }

    #[test]
    fn test_record_end_marker() {
        let schema = Schema::default();
        assert!(schema.is_record_end("//"));
        assert!(schema.is_record_end("// trailing"));
        assert!(!schema.is_record_end(" //"));
    }
}
