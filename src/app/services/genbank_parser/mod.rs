//! GenBank flat-file parser
//!
//! Turns column-aligned GenBank entries into [`Record`](crate::Record)
//! values, one per `//`-terminated entry. Structure is recognised purely by
//! position: unindented lines open fields, lines with a label at the
//! field's subfield column open subfields, everything else is content.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`schema`] - per-field column layout built from configuration
//! - [`classifier`] - line classification into field/subfield/content/end
//! - [`accumulator`] - parse state, boundary flushing and subfield promotion
//! - [`dispatch`] - the closed table of field converters and the fallback
//! - [`converters`] - field-specific converters
//! - [`diagnostics`] - non-fatal irregularities collected during a parse
//! - [`parser`] - the line loop and record finalisation
//! - [`stats`] - parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use gbparse::GenbankParser;
//!
//! # fn example() -> gbparse::Result<()> {
//! let text = "LOCUS       AB000001   1000 bp    DNA     linear\n//\n";
//! let result = GenbankParser::default().parse_records(text.as_bytes())?;
//!
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].identifier(), Some("AB000001"));
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod classifier;
pub mod converters;
pub mod diagnostics;
pub mod dispatch;
pub mod parser;
pub mod schema;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use accumulator::{FlushOutcome, ParseState};
pub use classifier::{LineKind, StructuralFault, classify};
pub use converters::{Conversion, ConvertError, ConvertResult, Converter};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use dispatch::{DispatchTable, FieldEntry, FieldId, Resolution, Route};
pub use parser::GenbankParser;
pub use schema::{FieldLayout, Schema};
pub use stats::{ParseResult, ParseStats};
