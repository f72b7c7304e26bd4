//! Field dispatch table
//!
//! The closed set of supported fields ([`FieldId`]), the converters
//! registered for each of their subfields, and the single fallback used for
//! everything else. The standard table is built once and shared read-only
//! by every parser.

use super::converters::{self, Converter, features, header, reference, sequence};
use std::sync::{Arc, LazyLock};

/// Fields with registered converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Locus,
    Definition,
    Accession,
    Version,
    Dblink,
    Keywords,
    Segment,
    Source,
    Reference,
    Comment,
    Project,
    Contig,
    BaseCount,
    Features,
    Origin,
}

impl FieldId {
    pub const ALL: [FieldId; 15] = [
        FieldId::Locus,
        FieldId::Definition,
        FieldId::Accession,
        FieldId::Version,
        FieldId::Dblink,
        FieldId::Keywords,
        FieldId::Segment,
        FieldId::Source,
        FieldId::Reference,
        FieldId::Comment,
        FieldId::Project,
        FieldId::Contig,
        FieldId::BaseCount,
        FieldId::Features,
        FieldId::Origin,
    ];

    /// Field name as produced by the classifier (lower-cased leading token)
    pub fn name(self) -> &'static str {
        match self {
            FieldId::Locus => "locus",
            FieldId::Definition => "definition",
            FieldId::Accession => "accession",
            FieldId::Version => "version",
            FieldId::Dblink => "dblink",
            FieldId::Keywords => "keywords",
            FieldId::Segment => "segment",
            FieldId::Source => "source",
            FieldId::Reference => "reference",
            FieldId::Comment => "comment",
            FieldId::Project => "project",
            FieldId::Contig => "contig",
            FieldId::BaseCount => "base",
            FieldId::Features => "features",
            FieldId::Origin => "origin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Converters registered for one field, keyed by subfield (`None` = the field itself)
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub id: FieldId,
    pub handlers: Vec<(Option<&'static str>, Converter)>,
}

impl FieldEntry {
    pub fn new(id: FieldId, handlers: Vec<(Option<&'static str>, Converter)>) -> Self {
        Self { id, handlers }
    }

    fn handler(&self, subfield: Option<&str>) -> Option<Converter> {
        self.handlers
            .iter()
            .find(|(name, _)| *name == subfield)
            .map(|(_, converter)| *converter)
    }

    /// Registered subfield names, without the field's own slot
    pub fn subfields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().filter_map(|(name, _)| *name)
    }
}

/// How a converter was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Registered for this exact field and subfield
    Exact,
    /// Subfield not registered; the field's own converter is used
    FieldDefault,
    /// Nothing registered; content is discarded with a diagnostic
    Fallback,
}

/// Converter chosen for a field/subfield pair
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub converter: Converter,
    pub route: Route,
}

/// Two-level lookup from field and subfield to converter
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: Vec<FieldEntry>,
    fallback: Converter,
}

static STANDARD: LazyLock<Arc<DispatchTable>> =
    LazyLock::new(|| Arc::new(DispatchTable::build_standard()));

impl DispatchTable {
    pub fn new(entries: Vec<FieldEntry>, fallback: Converter) -> Self {
        Self { entries, fallback }
    }

    /// The process-wide table of GenBank converters
    pub fn standard() -> Arc<DispatchTable> {
        Arc::clone(&STANDARD)
    }

    fn build_standard() -> Self {
        use FieldId::*;

        let entries = vec![
            FieldEntry::new(Locus, vec![(None, header::locus as Converter)]),
            FieldEntry::new(Definition, vec![(None, header::text as Converter)]),
            FieldEntry::new(Accession, vec![(None, header::text as Converter)]),
            FieldEntry::new(Version, vec![(None, header::version as Converter)]),
            FieldEntry::new(Dblink, vec![(None, header::dblink as Converter)]),
            FieldEntry::new(Keywords, vec![(None, header::text as Converter)]),
            FieldEntry::new(Segment, vec![(None, header::text as Converter)]),
            FieldEntry::new(
                Source,
                vec![
                    (None, sequence::source as Converter),
                    (Some("organism"), sequence::organism as Converter),
                ],
            ),
            FieldEntry::new(
                Reference,
                vec![
                    (None, reference::reference as Converter),
                    (Some("authors"), reference::authors as Converter),
                    (Some("consrtm"), reference::consortium as Converter),
                    (Some("title"), reference::title as Converter),
                    (Some("journal"), reference::journal as Converter),
                    (Some("pubmed"), reference::pubmed as Converter),
                    (Some("medline"), reference::medline as Converter),
                    (Some("remark"), reference::remark as Converter),
                ],
            ),
            FieldEntry::new(Comment, vec![(None, header::text as Converter)]),
            FieldEntry::new(Project, vec![(None, header::text as Converter)]),
            FieldEntry::new(Contig, vec![(None, header::text as Converter)]),
            FieldEntry::new(BaseCount, vec![(None, header::base_count as Converter)]),
            FieldEntry::new(
                Features,
                vec![
                    (None, header::text as Converter),
                    (Some("source"), features::source as Converter),
                    (Some("gene"), features::gene as Converter),
                    (Some("cds"), features::cds as Converter),
                    (Some("rrna"), features::rrna as Converter),
                    (Some("trna"), features::trna as Converter),
                    (Some("ncrna"), features::ncrna as Converter),
                    (Some("tmrna"), features::tmrna as Converter),
                ],
            ),
            FieldEntry::new(Origin, vec![(None, sequence::origin as Converter)]),
        ];

        Self::new(entries, converters::unparsed)
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn entry(&self, field: &str) -> Option<&FieldEntry> {
        let id = FieldId::from_name(field)?;
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Find the converter for `field`/`subfield`
    ///
    /// Lookup order: exact pair, then the field's own converter, then the
    /// fallback.
    pub fn resolve(&self, field: &str, subfield: Option<&str>) -> Resolution {
        let Some(entry) = self.entry(field) else {
            return Resolution {
                converter: self.fallback,
                route: Route::Fallback,
            };
        };

        if let Some(converter) = entry.handler(subfield) {
            return Resolution {
                converter,
                route: Route::Exact,
            };
        }

        match entry.handler(None) {
            Some(converter) => Resolution {
                converter,
                route: Route::FieldDefault,
            },
            None => Resolution {
                converter: self.fallback,
                route: Route::Fallback,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_id_round_trips_by_name() {
        for id in FieldId::ALL {
            assert_eq!(FieldId::from_name(id.name()), Some(id));
        }
        assert_eq!(FieldId::from_name("nosuchfield"), None);
    }

    #[test]
    fn test_standard_table_covers_every_field_once() {
        let table = DispatchTable::standard();
        for id in FieldId::ALL {
            let count = table.entries().iter().filter(|e| e.id == id).count();
            assert_eq!(count, 1, "field {:?} registered {} times", id, count);
        }
    }

    #[test]
    fn test_resolve_exact_subfield() {
        let table = DispatchTable::standard();
        assert_eq!(table.resolve("features", Some("cds")).route, Route::Exact);
        assert_eq!(table.resolve("locus", None).route, Route::Exact);
    }

    #[test]
    fn test_resolve_unknown_subfield_uses_field_default() {
        let table = DispatchTable::standard();
        let resolution = table.resolve("features", Some("misc_feature"));
        assert_eq!(resolution.route, Route::FieldDefault);
    }

    #[test]
    fn test_resolve_unknown_field_uses_fallback() {
        let table = DispatchTable::standard();
        assert_eq!(table.resolve("primary", None).route, Route::Fallback);
        assert_eq!(table.resolve("wgs_scafld", Some("x")).route, Route::Fallback);
    }

    #[test]
    fn test_field_without_default_falls_back_for_unknown_subfield() {
        let table = DispatchTable::new(
            vec![FieldEntry::new(
                FieldId::Comment,
                vec![(Some("note"), header::text as Converter)],
            )],
            converters::unparsed,
        );
        assert_eq!(table.resolve("comment", Some("other")).route, Route::Fallback);
        assert_eq!(table.resolve("comment", Some("note")).route, Route::Exact);
    }

    #[test]
    fn test_subfield_listing() {
        let table = DispatchTable::standard();
        let reference = table.entry("reference").unwrap();
        let subfields: Vec<_> = reference.subfields().collect();
        assert!(subfields.contains(&"authors"));
        assert!(subfields.contains(&"journal"));
        assert!(!subfields.is_empty());
    }
}
