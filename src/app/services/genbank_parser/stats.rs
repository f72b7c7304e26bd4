//! Parsing statistics and result structures for GenBank processing
//!
//! [`ParseStats`] is returned by every parse; [`ParseResult`] pairs it with
//! the collected records for the collect-to-memory mode.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use crate::app::models::Record;

/// Parsed records with statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Finished records in input order
    pub records: Vec<Record>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// Counters and diagnostics for one parse
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ParseStats {
    /// Input lines read, including blank ones
    pub lines_read: usize,

    /// Records handed to the sink
    pub records_emitted: usize,

    /// Field flushes performed
    pub fields_flushed: usize,

    /// Non-fatal irregularities in the order they were seen
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// True when the parse produced no diagnostics
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Fold the statistics of another parse into this one
    pub fn absorb(&mut self, other: ParseStats) {
        self.lines_read += other.lines_read;
        self.records_emitted += other.records_emitted;
        self.fields_flushed += other.fields_flushed;
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            line: 1,
            field: None,
            subfield: None,
            message: String::new(),
        }
    }

    #[test]
    fn test_count_by_kind() {
        let mut stats = ParseStats::new();
        stats.diagnostics.push(diagnostic(DiagnosticKind::UnknownField));
        stats.diagnostics.push(diagnostic(DiagnosticKind::UnknownField));
        stats.diagnostics.push(diagnostic(DiagnosticKind::OrphanFeature));

        assert_eq!(stats.count(DiagnosticKind::UnknownField), 2);
        assert_eq!(stats.count(DiagnosticKind::OrphanFeature), 1);
        assert_eq!(stats.count(DiagnosticKind::PartialRecordDiscarded), 0);
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_absorb_sums_counters() {
        let mut total = ParseStats {
            lines_read: 10,
            records_emitted: 1,
            fields_flushed: 4,
            diagnostics: Vec::new(),
        };
        total.absorb(ParseStats {
            lines_read: 5,
            records_emitted: 2,
            fields_flushed: 3,
            diagnostics: vec![diagnostic(DiagnosticKind::OrphanFeature)],
        });

        assert_eq!(total.lines_read, 15);
        assert_eq!(total.records_emitted, 3);
        assert_eq!(total.fields_flushed, 7);
        assert_eq!(total.diagnostics.len(), 1);
    }
}
