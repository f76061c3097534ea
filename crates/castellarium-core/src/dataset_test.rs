use serde_json::json;

use super::*;

fn full_record() -> Value {
    json!({
        "id": "PA00090613",
        "nom": "Château de Fougères",
        "commune": "Fougères",
        "departement": "Ille-et-Vilaine",
        "region": "Bretagne",
        "datation": "1173;1480",
        "siecles": "XIIe–XVe",
        "resume_historique": "Forteresse médiévale.",
        "coordonnees": {"lat": 48.3534, "lon": -1.2094}
    })
}

// -----------------------------------------------------------------------
// normalize_record
// -----------------------------------------------------------------------

#[test]
fn normalize_record_maps_all_fields() {
    let castle = normalize_record(0, full_record());
    assert_eq!(castle.id, "PA00090613");
    assert_eq!(castle.name, "Château de Fougères");
    assert_eq!(castle.location, "Fougères · Ille-et-Vilaine · Bretagne");
    assert_eq!(castle.era, "XIIe–XVe");
    assert_eq!(castle.style, "Bretagne");
    assert_eq!(castle.description, "Forteresse médiévale.");
    assert_eq!(castle.commune.as_deref(), Some("Fougères"));
    assert_eq!(castle.department.as_deref(), Some("Ille-et-Vilaine"));
    let coords = castle.coordinates.expect("coordinates present");
    assert!((coords.latitude - 48.3534).abs() < 1e-9);
    assert!((coords.longitude + 1.2094).abs() < 1e-9);
}

#[test]
fn normalize_record_builds_lowercase_search_blob() {
    let castle = normalize_record(0, full_record());
    assert_eq!(
        castle.search_blob,
        "château de fougères fougères ille-et-vilaine bretagne"
    );
}

#[test]
fn normalize_record_uses_placeholders_for_empty_record() {
    let castle = normalize_record(7, json!({}));
    assert_eq!(castle.id, "mh-7");
    assert_eq!(castle.name, UNKNOWN_NAME);
    assert_eq!(castle.location, UNKNOWN_LOCATION);
    assert_eq!(castle.era, UNKNOWN_ERA);
    assert_eq!(castle.style, UNKNOWN_REGION);
    assert_eq!(castle.description, NO_DESCRIPTION);
    assert!(castle.coordinates.is_none());
    assert_eq!(castle.search_blob, "château (nom inconnu)");
}

#[test]
fn normalize_record_skips_blank_location_parts() {
    let castle = normalize_record(
        0,
        json!({"commune": "Vitré", "departement": "  ", "region": "Bretagne"}),
    );
    assert_eq!(castle.location, "Vitré · Bretagne");
    assert!(castle.department.is_none());
}

#[test]
fn normalize_record_falls_back_to_datation_for_era() {
    let castle = normalize_record(0, json!({"datation": "1513;1521"}));
    assert_eq!(castle.era, "1513;1521");
}

#[test]
fn normalize_record_treats_blank_summary_as_missing() {
    let castle = normalize_record(0, json!({"resume_historique": "   \n "}));
    assert_eq!(castle.description, NO_DESCRIPTION);
}

#[test]
fn normalize_record_stringifies_numeric_id() {
    let castle = normalize_record(3, json!({"id": 42}));
    assert_eq!(castle.id, "42");
}

#[test]
fn normalize_record_drops_fraction_of_integral_float_id() {
    assert_eq!(normalize_record(0, json!({"id": 7.0})).id, "7");
    assert_eq!(normalize_record(0, json!({"id": 7.5})).id, "7.5");
}

#[test]
fn normalize_record_falls_back_on_empty_or_zero_id() {
    assert_eq!(normalize_record(1, json!({"id": ""})).id, "mh-1");
    assert_eq!(normalize_record(2, json!({"id": 0})).id, "mh-2");
    assert_eq!(normalize_record(3, json!({"id": null})).id, "mh-3");
}

#[test]
fn normalize_record_ignores_string_coordinates() {
    let castle = normalize_record(0, json!({"coordonnees": {"lat": "48.1", "lon": "-1.2"}}));
    assert!(castle.coordinates.is_none());
}

#[test]
fn normalize_record_requires_both_coordinates() {
    let castle = normalize_record(0, json!({"coordonnees": {"lat": 48.1}}));
    assert!(castle.coordinates.is_none());
    let castle = normalize_record(0, json!({"coordonnees": null}));
    assert!(castle.coordinates.is_none());
}

#[test]
fn normalize_record_keeps_raw_record() {
    let castle = normalize_record(0, full_record());
    assert_eq!(castle.raw["datation"], "1173;1480");
}

// -----------------------------------------------------------------------
// normalize_dataset / parse_dataset
// -----------------------------------------------------------------------

#[test]
fn normalize_dataset_preserves_order() {
    let castles =
        normalize_dataset(vec![json!({"id": "b"}), json!({}), json!({"id": "a"})]).unwrap();
    let ids: Vec<&str> = castles.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "mh-1", "a"]);
}

#[test]
fn normalize_dataset_rejects_duplicate_ids() {
    let result = normalize_dataset(vec![json!({"id": "x"}), json!({"id": "x"})]);
    assert!(
        matches!(result, Err(DatasetError::DuplicateId { ref id, index: 1 }) if id == "x"),
        "expected DuplicateId, got: {result:?}"
    );
}

#[test]
fn parse_dataset_rejects_non_array() {
    let result = parse_dataset(r#"{"id": "x"}"#);
    assert!(matches!(result, Err(DatasetError::NotAnArray)));
}

#[test]
fn parse_dataset_rejects_invalid_json() {
    let result = parse_dataset("[{");
    assert!(matches!(result, Err(DatasetError::Parse(_))));
}

#[test]
fn load_dataset_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chateaux.json");
    std::fs::write(&path, serde_json::to_string(&vec![full_record()]).unwrap()).unwrap();
    let castles = load_dataset(&path).unwrap();
    assert_eq!(castles.len(), 1);
    assert_eq!(castles[0].id, "PA00090613");
}

#[test]
fn load_dataset_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_dataset(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(DatasetError::Io { .. })));
}
