//! Line classification
//!
//! Decides, from indentation and the layout of the currently open field,
//! what role a raw line plays in the record being built.

use super::schema::Schema;
use std::fmt;

/// Role of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Line starts with the end-of-record marker
    RecordEnd,
    /// Unindented line opening a top-level field (lower-cased name)
    NewField(String),
    /// Indented line with a label at the subfield column (lower-cased name)
    NewSubfield(String),
    /// Continuation of the open field or subfield
    Content,
}

/// Indented line seen while no field is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralFault {
    ContentOutsideField,
    SubfieldOutsideField,
}

impl fmt::Display for StructuralFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralFault::ContentOutsideField => {
                write!(f, "content line encountered before any field was opened")
            }
            StructuralFault::SubfieldOutsideField => {
                write!(f, "subfield line encountered before any field was opened")
            }
        }
    }
}

/// Classify `line` given the currently open field
///
/// The end marker wins over every other rule. Unindented lines open a
/// field. Indented lines open a subfield when the open field allows
/// subfields and an alphanumeric label starts at its subfield column;
/// otherwise they continue the current content.
pub fn classify(
    line: &str,
    current_field: Option<&str>,
    schema: &Schema,
) -> Result<LineKind, StructuralFault> {
    if schema.is_record_end(line) {
        return Ok(LineKind::RecordEnd);
    }

    if !starts_indented(line) {
        return Ok(LineKind::NewField(field_name(line)));
    }

    let layout = schema.layout(current_field);
    if layout.starts_subfield(line) {
        if current_field.is_none() {
            return Err(StructuralFault::SubfieldOutsideField);
        }
        return Ok(LineKind::NewSubfield(layout.label(line).to_lowercase()));
    }

    if current_field.is_none() {
        return Err(StructuralFault::ContentOutsideField);
    }
    Ok(LineKind::Content)
}

fn starts_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Leading token of an unindented line, lower-cased
fn field_name(line: &str) -> String {
    line.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
