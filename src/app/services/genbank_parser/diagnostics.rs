//! Non-fatal parse diagnostics
//!
//! Diagnostics never stop a parse. Each one is logged at `warn` level as it
//! is reported and kept for the caller in [`super::ParseStats`].

use serde::Serialize;
use tracing::warn;

/// What kind of irregularity was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Field or subfield without a registered converter; its content was discarded
    UnknownField,
    /// CDS or RNA feature without an open gene; a synthetic gene entry was added
    OrphanFeature,
    /// Input ended inside a record that never saw its end marker
    PartialRecordDiscarded,
}

/// One reported irregularity with the location it was found at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub field: Option<String>,
    pub subfield: Option<String>,
    pub message: String,
}

/// Collector handed to converters
///
/// The accumulator sets the location before each converter call, so
/// converters only describe what happened.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    line: usize,
    field: Option<String>,
    subfield: Option<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the location attached to subsequent reports
    pub fn locate(&mut self, line: usize, field: Option<&str>, subfield: Option<&str>) {
        self.line = line;
        self.field = field.map(str::to_string);
        self.subfield = subfield.map(str::to_string);
    }

    /// Record a diagnostic at the current location
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(
            line = self.line,
            field = self.field.as_deref().unwrap_or("-"),
            subfield = self.subfield.as_deref().unwrap_or("-"),
            "{}",
            message
        );
        self.entries.push(Diagnostic {
            kind,
            line: self.line,
            field: self.field.clone(),
            subfield: self.subfield.clone(),
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_captures_location() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.locate(42, Some("features"), Some("cds"));
        diagnostics.report(DiagnosticKind::OrphanFeature, "cds without gene");

        let entry = &diagnostics.entries()[0];
        assert_eq!(entry.line, 42);
        assert_eq!(entry.field.as_deref(), Some("features"));
        assert_eq!(entry.subfield.as_deref(), Some("cds"));
        assert_eq!(entry.kind, DiagnosticKind::OrphanFeature);
    }

    #[test]
    fn test_kind_serialises_snake_case() {
        let json = serde_json::to_string(&DiagnosticKind::PartialRecordDiscarded).unwrap();
        assert_eq!(json, "\"partial_record_discarded\"");
    }
}
