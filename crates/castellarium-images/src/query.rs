//! Candidate search phrases for a castle image lookup.
//!
//! Generic names ("Château", "Château fort"…) match thousands of unrelated
//! pages, so they are only ever searched together with the commune and
//! department. Specific names are tried most-specific first.

use std::collections::HashSet;
use std::sync::LazyLock;

use castellarium_core::Castle;
use regex::Regex;

static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical regex"));
static ALTERNATE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bou\b.*$").expect("valid alternate-name regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const GENERIC_NAMES: &[&str] = &[
    "château",
    "chateau",
    "ancien château",
    "ancien chateau",
    "château ruiné",
    "chateau ruine",
    "château fort",
    "chateau fort",
];

/// Strips parenthetical asides and a trailing `ou <autre nom>`, then
/// collapses whitespace.
///
/// `"Château de Comper (ou de Concoret)"` → `"Château de Comper"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let without_parens = PARENTHETICAL_RE.replace_all(name, "");
    let without_alternate = ALTERNATE_NAME_RE.replace(&without_parens, "");
    WHITESPACE_RE
        .replace_all(&without_alternate, " ")
        .trim()
        .to_string()
}

/// Keeps the part of an administrative label before the first `,` or `(`.
fn admin_label(raw: Option<&str>) -> &str {
    raw.and_then(|s| s.split([',', '(']).next())
        .map_or("", str::trim)
}

fn is_generic(normalized: &str) -> bool {
    if normalized.is_empty() {
        return true;
    }
    let lower = normalized.to_lowercase();
    GENERIC_NAMES.contains(&lower.as_str())
}

/// Ordered, de-duplicated search phrases for a castle.
#[must_use]
pub fn build_search_queries(
    name: &str,
    commune: Option<&str>,
    department: Option<&str>,
) -> Vec<String> {
    let base = normalize_name(name);
    let commune = admin_label(commune);
    let department = admin_label(department);

    let mut queries = Vec::new();

    if is_generic(&base) {
        match (commune.is_empty(), department.is_empty()) {
            (false, false) => {
                queries.push(format!("château de {commune} ({department})"));
                queries.push(format!("château de {commune} {department} france"));
                queries.push(format!("château {commune} {department} france"));
            }
            (false, true) => {
                queries.push(format!("château de {commune} france"));
                queries.push(format!("château {commune} france"));
                queries.push(format!("{commune} château"));
            }
            // Without a commune there is nothing to anchor a generic name to.
            (true, _) => {}
        }
    } else {
        if !commune.is_empty() {
            queries.push(format!("{base} ({commune})"));
            queries.push(format!("{base} {commune} château"));
            queries.push(format!("château de {base} {commune}"));
        }
        if !department.is_empty() {
            queries.push(format!("{base} ({department})"));
            queries.push(format!("{base} {department} château"));
        }
        queries.push(format!("château de {base}"));
        queries.push(format!("{base} château"));
        queries.push(base);
    }

    let mut seen = HashSet::new();
    queries.retain(|q| seen.insert(q.clone()));
    queries
}

/// [`build_search_queries`] applied to a normalized castle.
#[must_use]
pub fn queries_for_castle(castle: &Castle) -> Vec<String> {
    build_search_queries(
        &castle.name,
        castle.commune.as_deref(),
        castle.department.as_deref(),
    )
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
