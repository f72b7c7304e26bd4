//! Tests pinning down the gene/CDS/RNA transition table
//!
//! The property tests drive arbitrary feature sequences through the parser
//! and compare the resulting gene list with a small reference model.

use super::*;
use crate::app::models::Value;
use crate::app::services::genbank_parser::DiagnosticKind;
use crate::constants::{CONTENT_KEY, content_keys, gene_keys};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    Gene,
    Cds,
    Rna(&'static str),
}

impl Feature {
    fn key(self) -> &'static str {
        match self {
            Feature::Gene => "gene",
            Feature::Cds => "CDS",
            Feature::Rna("rrna") => "rRNA",
            Feature::Rna("trna") => "tRNA",
            Feature::Rna("ncrna") => "ncRNA",
            Feature::Rna(_) => "tmRNA",
        }
    }
}

/// Expected state of one gene entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    done: bool,
    cds: bool,
    rna: bool,
}

/// Reference model of the transition table
fn model(features: &[Feature]) -> (Vec<Entry>, usize) {
    let mut entries: Vec<Entry> = Vec::new();
    let mut orphans = 0;

    for feature in features {
        match feature {
            Feature::Gene => {
                if let Some(last) = entries.last_mut() {
                    last.done = true;
                }
                entries.push(Entry {
                    done: false,
                    cds: false,
                    rna: false,
                });
            }
            product => {
                let is_cds = *product == Feature::Cds;
                match entries.last_mut() {
                    Some(last) if !last.done => {
                        last.cds |= is_cds;
                        last.rna |= !is_cds;
                        last.done = true;
                    }
                    _ => {
                        orphans += 1;
                        entries.push(Entry {
                            done: true,
                            cds: is_cds,
                            rna: !is_cds,
                        });
                    }
                }
            }
        }
    }

    (entries, orphans)
}

fn record_with(features: &[Feature]) -> String {
    let mut lines = vec![
        LOCUS_LINE.to_string(),
        "FEATURES             Location/Qualifiers".to_string(),
    ];
    for (index, feature) in features.iter().enumerate() {
        lines.push(super::feature(feature.key(), &format!("{}..{}", index * 10 + 1, index * 10 + 9)));
        lines.push(qualifier(&format!("/note=\"feature {}\"", index)));
    }
    lines.push("//".to_string());
    lines.join("\n")
}

fn observed(record: &Record) -> Vec<Entry> {
    let flag = |entry: &Value, name: &str| {
        entry
            .get(Some(name))
            .and_then(Value::as_flag)
            .unwrap_or(false)
    };

    record
        .get(CONTENT_KEY)
        .and_then(|content| content.get(Some(content_keys::GENES)))
        .and_then(Value::as_list)
        .unwrap_or_default()
        .iter()
        .map(|entry| Entry {
            done: flag(entry, gene_keys::DONE),
            cds: flag(entry, gene_keys::CDS_INCLUDED),
            rna: flag(entry, gene_keys::RNA_INCLUDED),
        })
        .collect()
}

#[test]
fn test_second_cds_after_one_gene_is_orphan() {
    let features = [Feature::Gene, Feature::Cds, Feature::Cds];
    let result = parse(&record_with(&features));

    let entries = observed(&result.records[0]);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.done && e.cds));
    assert_eq!(result.stats.count(DiagnosticKind::OrphanFeature), 1);
}

#[test]
fn test_gene_after_gene_closes_previous() {
    let result = parse(&record_with(&[Feature::Gene, Feature::Gene]));

    let entries = observed(&result.records[0]);
    assert_eq!(
        entries,
        vec![
            Entry { done: true, cds: false, rna: false },
            Entry { done: false, cds: false, rna: false },
        ]
    );
    assert!(result.stats.is_clean());
}

#[test]
fn test_rna_records_its_type() {
    let result = parse(&record_with(&[Feature::Gene, Feature::Rna("trna")]));

    let genes = result.records[0]
        .get(CONTENT_KEY)
        .and_then(|content| content.get(Some(content_keys::GENES)))
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(genes[0].get(Some(gene_keys::RNA_TYPE)), Some(&Value::text("trna")));
    assert_eq!(genes[0].get(Some("note")), Some(&Value::text("feature 1")));
}

fn feature_strategy() -> impl Strategy<Value = Feature> {
    prop_oneof![
        3 => Just(Feature::Gene),
        3 => Just(Feature::Cds),
        1 => Just(Feature::Rna("rrna")),
        1 => Just(Feature::Rna("trna")),
        1 => Just(Feature::Rna("ncrna")),
        1 => Just(Feature::Rna("tmrna")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gene_list_follows_transition_table(features in prop::collection::vec(feature_strategy(), 1..16)) {
        let result = parse(&record_with(&features));
        let (expected, orphans) = model(&features);

        prop_assert_eq!(result.records.len(), 1);
        prop_assert_eq!(observed(&result.records[0]), expected);
        prop_assert_eq!(result.stats.count(DiagnosticKind::OrphanFeature), orphans);
    }

    #[test]
    fn only_the_last_entry_can_be_open(features in prop::collection::vec(feature_strategy(), 1..16)) {
        let result = parse(&record_with(&features));
        let entries = observed(&result.records[0]);

        if let Some((_, closed)) = entries.split_last() {
            prop_assert!(closed.iter().all(|entry| entry.done));
        }
    }
}
