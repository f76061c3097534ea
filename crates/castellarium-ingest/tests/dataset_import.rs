//! End-to-end: CSV export → dataset JSON → normalized castles.

use castellarium_ingest::{import_file, ImportSummary};

const CSV: &str = "\u{feff}Reference;Titre_editorial_de_la_notice;Denomination_de_l_edifice;\
Commune_forme_editoriale;Département;Région;Format_abrege_du_siecle_de_construction;\
Historique;coordonnees_au_format_WGS84
PA35000035;Château de Vitré;château fort;Vitré;Ille-et-Vilaine;Bretagne;XI-XV;Place forte.;48.1236, -1.2097
PA35000099;Chapelle Saint-Roch;chapelle;Vitré;Ille-et-Vilaine;Bretagne;;;
PA22000010;;château;;Côtes-d'Armor;Bretagne;;;
";

#[test]
fn imported_dataset_loads_through_the_normalizer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("immeubles_mh.csv");
    let output = dir.path().join("chateaux.json");
    std::fs::write(&input, CSV).unwrap();

    let summary = import_file(&input, &output).unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            total_rows: 3,
            selected: 2,
            skipped: 0
        }
    );

    let castles = castellarium_core::load_dataset(&output).unwrap();
    assert_eq!(castles.len(), 2);

    let vitre = &castles[0];
    assert_eq!(vitre.id, "PA35000035");
    assert_eq!(vitre.name, "Château de Vitré");
    assert_eq!(vitre.location, "Vitré · Ille-et-Vilaine · Bretagne");
    assert_eq!(vitre.era, "XIe–XVe");
    assert_eq!(vitre.style, "Bretagne");
    assert_eq!(vitre.description, "Place forte.");
    let coords = vitre.coordinates.expect("coordinates");
    assert!((coords.latitude - 48.1236).abs() < 1e-9);

    let untitled = &castles[1];
    assert_eq!(untitled.name, "château");
    assert_eq!(untitled.commune, None);
    assert_eq!(untitled.era, "Datation inconnue");
    assert_eq!(untitled.description, "Aucun résumé disponible.");
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = import_file(&dir.path().join("absent.csv"), &dir.path().join("out.json"))
        .unwrap_err();
    assert!(
        matches!(err, castellarium_ingest::IngestError::Io { .. }),
        "got: {err:?}"
    );
}
