//! Which monument rows count as castles.

use crate::convert::Row;

const INCLUDE_KEYWORDS: &[&str] = &[
    "château",
    "chateau",
    "château-fort",
    "chateau-fort",
    "manoir",
    "donjon",
    "fort",
    "forteresse",
    "citadelle",
    "abbaye",
    "abbatiale",
    "prieuré",
    "prieure",
    "monastère",
    "monastere",
    "chartreuse",
];

const EXCLUDE_KEYWORDS: &[&str] = &[
    // religious buildings
    "église",
    "eglise",
    "cathédrale",
    "cathedrale",
    "chapelle",
    "basilique",
    "temple",
    "mosquée",
    "mosquee",
    "synagogue",
    // antique and gallo-roman sites
    "villa gallo-romaine",
    "site gallo-romain",
    "gallo-romain",
    "gallo romain",
    "thermes gallo-romains",
    "théâtre antique",
    "theatre antique",
    "amphithéâtre",
    "amphitheatre",
    "arènes",
    "arenes",
    // megaliths
    "dolmen",
    "menhir",
    "tumulus",
];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Exclusion keywords in the denomination or title win; then any inclusion
/// keyword there selects the row; the `Domaine` column is the last resort.
#[must_use]
pub fn is_selected(row: &Row) -> bool {
    let denomination = format!(
        "{} {}",
        row.raw("Denomination_de_l_edifice"),
        row.raw("Titre_editorial_de_la_notice")
    )
    .to_lowercase();

    if contains_any(&denomination, EXCLUDE_KEYWORDS) {
        return false;
    }
    if contains_any(&denomination, INCLUDE_KEYWORDS) {
        return true;
    }
    contains_any(&row.raw("Domaine").to_lowercase(), INCLUDE_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        Row::from_pairs(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())))
    }

    #[test]
    fn castle_denomination_is_selected() {
        assert!(is_selected(&row(&[("Denomination_de_l_edifice", "Château")])));
        assert!(is_selected(&row(&[(
            "Titre_editorial_de_la_notice",
            "Manoir de la Ville-Guérif"
        )])));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(is_selected(&row(&[("Denomination_de_l_edifice", "DONJON")])));
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        assert!(!is_selected(&row(&[
            ("Denomination_de_l_edifice", "chapelle"),
            ("Titre_editorial_de_la_notice", "Chapelle du château"),
        ])));
        assert!(!is_selected(&row(&[(
            "Titre_editorial_de_la_notice",
            "Villa gallo-romaine du Fort"
        )])));
    }

    #[test]
    fn domaine_is_a_fallback() {
        assert!(is_selected(&row(&[
            ("Denomination_de_l_edifice", "logis"),
            ("Domaine", "Architecture de château"),
        ])));
        assert!(!is_selected(&row(&[
            ("Denomination_de_l_edifice", "logis"),
            ("Domaine", "architecture domestique"),
        ])));
    }

    #[test]
    fn unrelated_row_is_skipped() {
        assert!(!is_selected(&row(&[("Denomination_de_l_edifice", "maison")])));
        assert!(!is_selected(&row(&[])));
    }
}
