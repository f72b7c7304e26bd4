//! Tests for the field converters

use super::*;
use crate::app::models::Value;
use crate::app::services::genbank_parser::converters::{
    Conversion, ConvertError, features, header, reference, sequence,
};
use crate::constants::{CONTENT_KEY, content_keys};

fn merged(result: crate::app::services::genbank_parser::ConvertResult) -> Value {
    match result.expect("conversion succeeds") {
        Conversion::Merge(value) => value,
        Conversion::AlreadyApplied => panic!("expected a value to merge"),
    }
}

fn content_of<'a>(record: &'a Record, name: &str) -> &'a Value {
    record
        .get(CONTENT_KEY)
        .and_then(|content| content.get(Some(name)))
        .expect("content entry present")
}

#[test]
fn test_locus_with_date_and_unpaired_token() {
    let (result, _, _) = convert(
        header::locus,
        &["SCU49845     5028 bp    DNA             PLN       21-JUN-1999"],
    );
    let locus = merged(result);

    assert_eq!(locus.get(None), Some(&Value::text("SCU49845")));
    assert_eq!(locus.get(Some("size [bp]")), Some(&Value::text("5028")));
    assert_eq!(locus.get(Some("DNA")), Some(&Value::text("PLN")));
    assert_eq!(locus.get(Some("21-JUN-1999")), Some(&Value::text("")));
    assert_eq!(locus.get(Some("date")), Some(&Value::text("1999-06-21")));
}

#[test]
fn test_locus_seven_tokens() {
    let (result, _, _) = convert(
        header::locus,
        &["NC_000913    4641652 bp    DNA     circular CON 09-MAR-2022"],
    );
    let locus = merged(result);

    assert_eq!(locus.get(Some("DNA")), Some(&Value::text("circular")));
    assert_eq!(locus.get(Some("CON")), Some(&Value::text("09-MAR-2022")));
    assert_eq!(locus.get(Some("date")), Some(&Value::text("2022-03-09")));
}

#[test]
fn test_locus_too_short() {
    let (result, _, _) = convert(header::locus, &["AB000001 1000"]);
    assert_eq!(
        result,
        Err(ConvertError::MissingTokens {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn test_version_pairs() {
    let (result, _, _) = convert(header::version, &["U49845.1  GI:1293613"]);
    let version = merged(result);
    assert_eq!(version.get(None), Some(&Value::text("U49845.1")));
    assert_eq!(version.get(Some("GI")), Some(&Value::text("1293613")));

    let (result, _, _) = convert(header::version, &["U49845.1  stray"]);
    assert!(matches!(result, Err(ConvertError::MalformedPair { .. })));
}

#[test]
fn test_dblink_lines_and_continuation() {
    let (result, _, _) = convert(
        header::dblink,
        &["BioProject: PRJNA224116", "BioSample: SAMN0260", "4091"],
    );
    let links = merged(result);
    assert_eq!(links.get(Some("BioProject")), Some(&Value::text("PRJNA224116")));
    assert_eq!(links.get(Some("BioSample")), Some(&Value::text("SAMN02604091")));

    let (result, _, _) = convert(header::dblink, &["no separator here"]);
    assert!(matches!(result, Err(ConvertError::MalformedPair { .. })));
}

#[test]
fn test_base_count_pairs() {
    let (result, _, _) = convert(header::base_count, &["1510 a   1074 c    835 g   1609 t"]);
    let counts = merged(result);
    assert_eq!(counts.get(Some("a")), Some(&Value::text("1510")));
    assert_eq!(counts.get(Some("t")), Some(&Value::text("1609")));

    let (result, _, _) = convert(header::base_count, &["COUNT 10 a 20"]);
    assert!(matches!(result, Err(ConvertError::MalformedPair { .. })));
}

#[test]
fn test_text_joins_with_single_spaces() {
    let (result, _, _) = convert(header::text, &["  first  ", "", "second"]);
    assert_eq!(merged(result), Value::text("first second"));
}

#[test]
fn test_reference_subfields_fill_last_entry() {
    let mut record = Record::new();
    let mut diagnostics = Diagnostics::new();

    reference::reference(&lines(&["1  (bases 1 to 5028)"]), &mut record, &mut diagnostics).unwrap();
    reference::reference(&lines(&["2  (bases 1 to 5028)"]), &mut record, &mut diagnostics).unwrap();
    reference::authors(
        &lines(&["Roemer,T., Madden,K., Chang,J. and", "Snyder,M."]),
        &mut record,
        &mut diagnostics,
    )
    .unwrap();
    reference::title(&lines(&["Selection of axial", "growth sites"]), &mut record, &mut diagnostics).unwrap();
    reference::consortium(&lines(&["Yeast Consortium"]), &mut record, &mut diagnostics).unwrap();

    let references = record.get("reference").unwrap().as_list().unwrap();
    assert_eq!(references.len(), 2);
    assert!(references[0].get(Some("authors")).is_none());

    let last = &references[1];
    assert_eq!(last.get(Some("info")), Some(&Value::text("2  (bases 1 to 5028)")));
    assert_eq!(
        last.get(Some("authors")),
        Some(&Value::List(vec![
            Value::text("Roemer T."),
            Value::text("Madden K."),
            Value::text("Chang J."),
            Value::text("Snyder M."),
        ]))
    );
    assert_eq!(last.get(Some("title")), Some(&Value::text("Selection of axial growth sites")));
    assert_eq!(last.get(Some("consortium")), Some(&Value::text("Yeast Consortium")));
}

#[test]
fn test_reference_subfield_without_entry_fails() {
    let (result, _, _) = convert(reference::journal, &["Yeast 10 (11), 1503-1509 (1994)"]);
    assert_eq!(
        result,
        Err(ConvertError::NoOpenEntry {
            entry: "reference"
        })
    );
}

#[test]
fn test_single_author_without_separator() {
    let (result, record, _) = convert(reference::reference, &["1"]);
    assert!(result.is_ok());

    let mut record = record;
    let mut diagnostics = Diagnostics::new();
    reference::authors(&lines(&["Smith,J."]), &mut record, &mut diagnostics).unwrap();
    let authors = record.get("reference").unwrap().as_list().unwrap()[0]
        .get(Some("authors"))
        .cloned();
    assert_eq!(authors, Some(Value::List(vec![Value::text("Smith J.")])));
}

#[test]
fn test_source_and_organism_write_content() {
    let mut record = Record::new();
    let mut diagnostics = Diagnostics::new();

    sequence::source(&lines(&["Saccharomyces cerevisiae (baker's yeast)"]), &mut record, &mut diagnostics)
        .unwrap();
    sequence::organism(
        &lines(&[
            "Saccharomyces cerevisiae",
            "Eukaryota; Fungi; Ascomycota;",
            "Saccharomycetales.",
        ]),
        &mut record,
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(
        content_of(&record, content_keys::SOURCE),
        &Value::text("Saccharomyces cerevisiae (baker's yeast)")
    );
    assert_eq!(
        content_of(&record, content_keys::ORGANISM),
        &Value::List(vec![
            Value::text("Saccharomyces cerevisiae"),
            Value::text("Eukaryota"),
            Value::text("Fungi"),
            Value::text("Ascomycota"),
            Value::text("Saccharomycetales"),
        ])
    );
}

#[test]
fn test_origin_drops_position_numbers() {
    let (result, record, _) = convert(
        sequence::origin,
        &["ORIGIN", "1 gatcctccat atacaacggt", "21 atctcc"],
    );
    assert_eq!(result, Ok(Conversion::AlreadyApplied));
    assert_eq!(
        content_of(&record, content_keys::SEQUENCE),
        &Value::text("gatcctccatatacaacggtatctcc")
    );
}

#[test]
fn test_feature_qualifiers() {
    let feature = features::parse_feature(&lines(&[
        "complement(3300..",
        "4037)",
        "/gene=\"REV7\"",
        "/pseudo",
        "/note=\"spans two lines and has",
        "/a slash inside\"",
        "/translation=\"MNRWVEKWLRV",
        "YLKCYINL\"",
        "/codon_start=1",
    ]));

    let get = |name: &str| feature.get(&Some(name.to_string())).cloned();
    assert_eq!(get("bp_range"), Some(Value::text("complement(3300..4037)")));
    assert_eq!(get("gene"), Some(Value::text("REV7")));
    assert_eq!(get("pseudo"), Some(Value::Flag(true)));
    assert_eq!(get("note"), Some(Value::text("spans two lines and has /a slash inside")));
    assert_eq!(get("translation"), Some(Value::text("MNRWVEKWLRVYLKCYINL")));
    assert_eq!(get("codon_start"), Some(Value::text("1")));
}

#[test]
fn test_source_feature_stored_in_content() {
    let (result, record, diagnostics) = convert(
        features::source,
        &["1..5028", "/organism=\"Saccharomyces cerevisiae\"", "/db_xref=\"taxon:4932\""],
    );
    assert_eq!(result, Ok(Conversion::AlreadyApplied));
    assert!(diagnostics.is_empty());

    let source = content_of(&record, content_keys::SOURCE_FEATURE);
    assert_eq!(source.get(Some("db_xref")), Some(&Value::text("taxon:4932")));
    assert_eq!(source.get(Some("bp_range")), Some(&Value::text("1..5028")));
}
