//! Normalization from raw dataset records to [`Castle`] entities.
//!
//! Records are heterogeneous JSON objects produced by the Mérimée importer.
//! Every field is optional; each one has a fixed fallback so a sparse record
//! still yields a displayable castle.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::castle::{Castle, Coordinates};
use crate::error::DatasetError;

pub const UNKNOWN_NAME: &str = "Château (nom inconnu)";
pub const UNKNOWN_LOCATION: &str = "Localisation inconnue";
pub const UNKNOWN_ERA: &str = "Datation inconnue";
pub const UNKNOWN_REGION: &str = "Région inconnue";
pub const NO_DESCRIPTION: &str = "Aucun résumé disponible.";

const LOCATION_SEPARATOR: &str = " · ";

/// Normalizes one raw record. `index` is the record's position in the
/// dataset and only matters when the record carries no usable id.
#[must_use]
pub fn normalize_record(index: usize, raw: Value) -> Castle {
    let id = record_id(&raw).unwrap_or_else(|| format!("mh-{index}"));
    let name = text_field(&raw, "nom").unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let commune = text_field(&raw, "commune");
    let department = text_field(&raw, "departement");
    let region = text_field(&raw, "region");

    let admin: Vec<&str> = [&commune, &department, &region]
        .into_iter()
        .filter_map(Option::as_deref)
        .collect();

    let location = if admin.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        admin.join(LOCATION_SEPARATOR)
    };

    let era = text_field(&raw, "siecles")
        .or_else(|| text_field(&raw, "datation"))
        .unwrap_or_else(|| UNKNOWN_ERA.to_string());
    let style = region.clone().unwrap_or_else(|| UNKNOWN_REGION.to_string());
    let description =
        text_field(&raw, "resume_historique").unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let search_blob = std::iter::once(name.as_str())
        .chain(admin.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let coordinates = coordinates(&raw);

    Castle {
        id,
        name,
        location,
        era,
        style,
        description,
        commune,
        department,
        region,
        coordinates,
        search_blob,
        raw,
    }
}

/// Normalizes a whole dataset, preserving order.
///
/// # Errors
///
/// Returns [`DatasetError::DuplicateId`] if two records normalize to the same id.
pub fn normalize_dataset(records: Vec<Value>) -> Result<Vec<Castle>, DatasetError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut castles = Vec::with_capacity(records.len());

    for (index, raw) in records.into_iter().enumerate() {
        let castle = normalize_record(index, raw);
        if !seen.insert(castle.id.clone()) {
            return Err(DatasetError::DuplicateId {
                id: castle.id,
                index,
            });
        }
        castles.push(castle);
    }

    Ok(castles)
}

/// Parses and normalizes a dataset from its JSON text.
///
/// # Errors
///
/// - [`DatasetError::Parse`] if the text is not JSON.
/// - [`DatasetError::NotAnArray`] if the top-level value is not an array.
/// - [`DatasetError::DuplicateId`] on id collisions.
pub fn parse_dataset(json: &str) -> Result<Vec<Castle>, DatasetError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => normalize_dataset(records),
        _ => Err(DatasetError::NotAnArray),
    }
}

/// Reads, parses and normalizes a dataset file.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_dataset`].
pub fn load_dataset(path: &Path) -> Result<Vec<Castle>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_dataset(&content)
}

fn record_id(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64().map_or(true, |v| v.abs() > 0.0) => Some(number_id(n)),
        _ => None,
    }
}

/// Integral floats print without a fractional part, so `7.0` and `7` give
/// the same id.
fn number_id(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

/// String field, with blank strings treated as absent.
fn text_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coordinates(raw: &Value) -> Option<Coordinates> {
    let coord = raw.get("coordonnees")?;
    let latitude = coord.get("lat").and_then(Value::as_f64)?;
    let longitude = coord.get("lon").and_then(Value::as_f64)?;
    (latitude.is_finite() && longitude.is_finite()).then_some(Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
