use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|youtube\.com/watch\?v=)([^&]+)").expect("valid youtube regex")
});

/// WGS84 position of a castle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A historic site, normalized from one raw dataset record.
///
/// Built once by [`crate::dataset::normalize_record`] and never mutated
/// afterwards. `id` is the join key for the visited/wishlist sets and the
/// image cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Castle {
    pub id: String,
    pub name: String,
    /// Human-readable `commune · département · région`, or a placeholder.
    pub location: String,
    pub era: String,
    /// Display category; the dataset only carries the region, so this is it.
    pub style: String,
    pub description: String,
    pub commune: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Lowercase name and administrative parts, used for substring search.
    pub search_blob: String,
    /// Untouched source record, for fields not modeled above.
    pub raw: serde_json::Value,
}

impl Castle {
    /// Raw video link attached to the record, if any.
    #[must_use]
    pub fn video_link(&self) -> Option<&str> {
        self.raw
            .get("lien_video")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Embeddable video URL: YouTube watch and short links are rewritten to
    /// the `/embed/` form, anything else is returned as-is.
    #[must_use]
    pub fn video_embed_url(&self) -> Option<String> {
        let link = self.video_link()?;
        Some(embed_url(link))
    }
}

fn embed_url(link: &str) -> String {
    match YOUTUBE_ID_RE.captures(link).and_then(|c| c.get(1)) {
        Some(id) => format!("https://www.youtube.com/embed/{}", id.as_str()),
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::normalize_record;
    use serde_json::json;

    #[test]
    fn embed_url_rewrites_watch_links() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=abc123&t=42"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn embed_url_rewrites_short_links() {
        assert_eq!(
            embed_url("https://youtu.be/xyz789"),
            "https://www.youtube.com/embed/xyz789"
        );
    }

    #[test]
    fn embed_url_keeps_other_links() {
        assert_eq!(
            embed_url("https://vimeo.com/12345"),
            "https://vimeo.com/12345"
        );
    }

    #[test]
    fn video_embed_url_reads_raw_record() {
        let castle = normalize_record(
            0,
            json!({"id": "PA1", "nom": "Château de Vitré", "lien_video": "https://youtu.be/q1"}),
        );
        assert_eq!(
            castle.video_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/q1")
        );
    }

    #[test]
    fn blank_video_link_is_absent() {
        let castle = normalize_record(0, json!({"id": "PA1", "lien_video": "  "}));
        assert!(castle.video_embed_url().is_none());
    }
}
