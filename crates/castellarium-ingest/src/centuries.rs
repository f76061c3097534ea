//! Century labels in Roman numerals, e.g. `XVIe` or `XVIe–XIXe`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static ROMAN_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([IVXLCDM]+)\b").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Numbers up to this value are read as centuries rather than years.
const MAX_CENTURY_NUMBER: u64 = 30;

/// Renders `n` in Roman numerals (`16` → `XVI`).
#[must_use]
pub fn roman(n: u32) -> String {
    let mut out = String::new();
    let mut rest = n;
    for (value, symbol) in NUMERALS {
        while rest >= value {
            out.push_str(symbol);
            rest -= value;
        }
    }
    out
}

/// Parses Roman numerals, case-insensitively. Unknown letters count as zero;
/// a non-positive total is `None`.
#[must_use]
pub fn roman_to_int(s: &str) -> Option<u32> {
    let mut total: i64 = 0;
    let mut prev: i64 = 0;
    for ch in s.trim().chars().rev() {
        let value = match ch.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => 0,
        };
        if value < prev {
            total -= value;
        } else {
            total += value;
            prev = value;
        }
    }
    u32::try_from(total).ok().filter(|n| *n > 0)
}

/// Derives a century label from every number in `raw`: numbers up to 30
/// are centuries, larger ones are years.
///
/// `"1513;1521;1860"` → `XVIe–XIXe`, `"16e siècle"` → `XVIe`.
#[must_use]
pub fn centuries_from_years(raw: &str) -> Option<String> {
    let centuries: BTreeSet<u32> = NUMBER_RE
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .map(|n| {
            if n <= MAX_CENTURY_NUMBER {
                n
            } else {
                (n - 1) / 100 + 1
            }
        })
        .filter_map(|c| u32::try_from(c).ok())
        .collect();
    label(&centuries)
}

/// Derives a century label from Roman numerals in `raw`
/// (`"XVI ; XIX"` → `XVIe–XIXe`), falling back to
/// [`centuries_from_years`] when there are none.
#[must_use]
pub fn centuries_from_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = ROMAN_TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    if tokens.is_empty() {
        return centuries_from_years(text);
    }

    let centuries: BTreeSet<u32> = tokens.into_iter().filter_map(roman_to_int).collect();
    label(&centuries)
}

fn label(centuries: &BTreeSet<u32>) -> Option<String> {
    let first = centuries.first()?;
    let last = centuries.last()?;
    if first == last {
        Some(format!("{}e", roman(*first)))
    } else {
        Some(format!("{}e–{}e", roman(*first), roman(*last)))
    }
}
