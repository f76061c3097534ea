use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::centuries::{centuries_from_text, centuries_from_years};
use crate::error::IngestError;
use crate::selection::is_selected;

const UNKNOWN_CENTURIES: &str = "Datation inconnue";
const UNTITLED: &str = "Sans titre";

/// One CSV row keyed by header name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Builds a row from header/value pairs. A byte-order mark left on a
    /// header is dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(key, value)| (key.trim_start_matches('\u{feff}').to_owned(), value))
            .collect();
        Self { fields }
    }

    /// Raw cell value, empty when the column is missing.
    #[must_use]
    pub fn raw(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    /// First of `columns` holding a non-blank value, trimmed.
    #[must_use]
    pub fn first_of(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .map(|c| self.raw(c).trim())
            .find(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetCoordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the generated dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    pub id: String,
    pub nom: String,
    pub commune: String,
    pub departement: String,
    pub region: String,
    pub datation: String,
    pub siecles: String,
    pub resume_historique: Option<String>,
    pub coordonnees: Option<DatasetCoordinates>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub selected: usize,
    /// Rows the CSV reader could not decode.
    pub skipped: usize,
}

/// Parses `"47.1234, 2.1234"` into coordinates.
#[must_use]
pub fn parse_coords(raw: &str) -> Option<DatasetCoordinates> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [lat, lon] = parts.as_slice() else {
        return None;
    };
    let lat: f64 = lat.parse().ok()?;
    let lon: f64 = lon.parse().ok()?;
    Some(DatasetCoordinates { lat, lon })
}

fn compute_centuries(row: &Row) -> Option<String> {
    if let Some(label) = row
        .first_of(&["Format_abrege_du_siecle_de_construction"])
        .and_then(centuries_from_text)
    {
        return Some(label);
    }

    let campaigns: Vec<&str> = [
        "Siecle_de_la_campagne_principale_de_construction",
        "Siecle_de_campagne_secondaire_de_construction",
    ]
    .iter()
    .map(|c| row.raw(c).trim())
    .filter(|v| !v.is_empty())
    .collect();
    if let Some(label) = centuries_from_text(&campaigns.join(";")) {
        return Some(label);
    }

    centuries_from_years(row.raw("Datation_de_l_edifice").trim())
}

fn summary(row: &Row) -> Option<String> {
    let blocks: Vec<&str> = ["Historique", "Description_de_l_edifice", "Observations"]
        .iter()
        .map(|c| row.raw(c).trim())
        .filter(|v| !v.is_empty())
        .collect();
    (!blocks.is_empty()).then(|| blocks.join("\n\n"))
}

/// Builds the dataset entry for a selected row. `position` is the 1-based
/// rank among selected rows, used for the fallback id.
#[must_use]
pub fn record_from_row(row: &Row, position: usize) -> DatasetRecord {
    let own = |s: Option<&str>| s.unwrap_or_default().to_owned();
    DatasetRecord {
        id: row
            .first_of(&["Reference"])
            .map_or_else(|| format!("mh-{position}"), str::to_owned),
        nom: row
            .first_of(&["Titre_editorial_de_la_notice", "Denomination_de_l_edifice"])
            .unwrap_or(UNTITLED)
            .to_owned(),
        commune: own(row.first_of(&["Commune_forme_editoriale", "Commune_forme_index"])),
        departement: own(row.first_of(&["Département", "Departement_format_numerique"])),
        region: own(row.first_of(&["Région"])),
        datation: row.raw("Datation_de_l_edifice").trim().to_owned(),
        siecles: compute_centuries(row).unwrap_or_else(|| UNKNOWN_CENTURIES.to_owned()),
        resume_historique: summary(row),
        coordonnees: parse_coords(row.raw("coordonnees_au_format_WGS84")),
    }
}

/// Reads `;`-delimited CSV from `input` and returns the selected records.
///
/// Rows the CSV reader cannot decode are logged and skipped.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the header row cannot be read.
pub fn convert<R: Read>(input: R) -> Result<(Vec<DatasetRecord>, ImportSummary), IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    tracing::debug!(columns = headers.len(), "CSV header read");

    let mut records = Vec::new();
    let mut summary = ImportSummary::default();

    for (line, result) in reader.records().enumerate() {
        summary.total_rows += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                summary.skipped += 1;
                tracing::warn!(row = line + 1, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };

        let row = Row::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_owned(), v.to_owned())),
        );
        if !is_selected(&row) {
            continue;
        }
        summary.selected += 1;
        records.push(record_from_row(&row, summary.selected));
    }

    Ok((records, summary))
}

/// Converts the CSV at `input` and writes the dataset JSON to `output`.
///
/// # Errors
///
/// Returns an error if either file cannot be accessed, the CSV header is
/// unreadable, or the JSON cannot be encoded.
pub fn import_file(input: &Path, output: &Path) -> Result<ImportSummary, IngestError> {
    let file = std::fs::File::open(input).map_err(|source| IngestError::Io {
        path: input.display().to_string(),
        source,
    })?;
    let (records, summary) = convert(std::io::BufReader::new(file))?;

    let body = serde_json::to_vec_pretty(&records)?;
    std::fs::write(output, body).map_err(|source| IngestError::Io {
        path: output.display().to_string(),
        source,
    })?;

    tracing::info!(
        total_rows = summary.total_rows,
        selected = summary.selected,
        skipped = summary.skipped,
        output = %output.display(),
        "dataset import complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
