use super::*;

const HEADER: &str = "\u{feff}Reference;Titre_editorial_de_la_notice;Denomination_de_l_edifice;\
Commune_forme_editoriale;Commune_forme_index;Département;Région;Datation_de_l_edifice;\
Format_abrege_du_siecle_de_construction;Siecle_de_la_campagne_principale_de_construction;\
Siecle_de_campagne_secondaire_de_construction;Historique;Description_de_l_edifice;\
Observations;coordonnees_au_format_WGS84;Domaine";

fn csv_of(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

fn row(pairs: &[(&str, &str)]) -> Row {
    Row::from_pairs(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())))
}

// ---------------------------------------------------------------------------
// parse_coords
// ---------------------------------------------------------------------------

#[test]
fn parse_coords_reads_lat_lon_pair() {
    assert_eq!(
        parse_coords(" 48.1234, -1.2 "),
        Some(DatasetCoordinates {
            lat: 48.1234,
            lon: -1.2
        })
    );
}

#[test]
fn parse_coords_rejects_malformed_input() {
    assert_eq!(parse_coords(""), None);
    assert_eq!(parse_coords("48.1"), None);
    assert_eq!(parse_coords("48.1, -1.2, 3"), None);
    assert_eq!(parse_coords("nord, ouest"), None);
}

// ---------------------------------------------------------------------------
// record_from_row
// ---------------------------------------------------------------------------

#[test]
fn record_prefers_editorial_fields() {
    let record = record_from_row(
        &row(&[
            ("Reference", "PA35000035"),
            ("Titre_editorial_de_la_notice", "Château de Vitré"),
            ("Denomination_de_l_edifice", "château fort"),
            ("Commune_forme_editoriale", "Vitré"),
            ("Commune_forme_index", "VITRE"),
            ("Département", "Ille-et-Vilaine"),
            ("Région", "Bretagne"),
            ("Format_abrege_du_siecle_de_construction", "13e siècle;15e siècle"),
        ]),
        1,
    );

    assert_eq!(record.id, "PA35000035");
    assert_eq!(record.nom, "Château de Vitré");
    assert_eq!(record.commune, "Vitré");
    assert_eq!(record.departement, "Ille-et-Vilaine");
    assert_eq!(record.region, "Bretagne");
    assert_eq!(record.siecles, "XIIIe–XVe");
    assert_eq!(record.resume_historique, None);
    assert_eq!(record.coordonnees, None);
}

#[test]
fn record_falls_back_for_missing_fields() {
    let record = record_from_row(
        &row(&[
            ("Denomination_de_l_edifice", "manoir"),
            ("Commune_forme_index", "Plouër"),
            ("Departement_format_numerique", "22"),
        ]),
        4,
    );

    assert_eq!(record.id, "mh-4");
    assert_eq!(record.nom, "manoir");
    assert_eq!(record.commune, "Plouër");
    assert_eq!(record.departement, "22");
    assert_eq!(record.region, "");
    assert_eq!(record.siecles, "Datation inconnue");

    let untitled = record_from_row(&row(&[]), 1);
    assert_eq!(untitled.nom, "Sans titre");
}

#[test]
fn centuries_use_campaigns_then_dating_years() {
    let from_campaigns = record_from_row(
        &row(&[
            ("Siecle_de_la_campagne_principale_de_construction", "16e siècle"),
            ("Siecle_de_campagne_secondaire_de_construction", "19e siècle"),
            ("Datation_de_l_edifice", "1200"),
        ]),
        1,
    );
    assert_eq!(from_campaigns.siecles, "XVIe–XIXe");

    let from_years = record_from_row(&row(&[("Datation_de_l_edifice", "1513;1521")]), 1);
    assert_eq!(from_years.siecles, "XVIe");
    assert_eq!(from_years.datation, "1513;1521");
}

#[test]
fn summary_joins_non_empty_blocks_with_blank_lines() {
    let record = record_from_row(
        &row(&[
            ("Historique", "  Construit au XVe. "),
            ("Description_de_l_edifice", ""),
            ("Observations", "Remanié."),
        ]),
        1,
    );
    assert_eq!(
        record.resume_historique.as_deref(),
        Some("Construit au XVe.\n\nRemanié.")
    );
}

#[test]
fn row_drops_byte_order_mark_from_header() {
    let row = Row::from_pairs([("\u{feff}Reference".to_owned(), "PA1".to_owned())]);
    assert_eq!(row.raw("Reference"), "PA1");
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_selects_castles_and_counts_rows() {
    let text = csv_of(&[
        "PA1;Château de Combourg;château;Combourg;;Ille-et-Vilaine;Bretagne;;;;;Berceau.;;;48.41, -1.75;",
        "PA2;Église Saint-Martin;église;Vitré;;Ille-et-Vilaine;Bretagne;;;;;;;;;",
        ";;manoir;Dinan;;Côtes-d'Armor;Bretagne;1620;;;;;;;;",
        "PA4;Maison;maison;Rennes;;Ille-et-Vilaine;Bretagne;;;;;;;;;",
    ]);

    let (records, summary) = convert(text.as_bytes()).unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            total_rows: 4,
            selected: 2,
            skipped: 0
        }
    );
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "PA1");
    assert_eq!(
        records[0].coordonnees,
        Some(DatasetCoordinates {
            lat: 48.41,
            lon: -1.75
        })
    );
    assert_eq!(records[0].resume_historique.as_deref(), Some("Berceau."));
    assert_eq!(records[1].id, "mh-2");
    assert_eq!(records[1].siecles, "XVIIe");
}

#[test]
fn convert_tolerates_short_rows() {
    let text = csv_of(&["PA9;Donjon de Niort"]);

    let (records, summary) = convert(text.as_bytes()).unwrap();

    assert_eq!(summary.selected, 1);
    assert_eq!(records[0].nom, "Donjon de Niort");
    assert_eq!(records[0].commune, "");
}

#[test]
fn dataset_json_uses_expected_keys() {
    let record = record_from_row(&row(&[("Reference", "PA1")]), 1);
    let value = serde_json::to_value(&record).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "id",
        "nom",
        "commune",
        "departement",
        "region",
        "datation",
        "siecles",
        "resume_historique",
        "coordonnees",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert!(value["resume_historique"].is_null());
}
