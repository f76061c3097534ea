//! Response shapes of the MediaWiki `action=query` API, limited to the
//! `generator=search` + `prop=pageimages` combination used for thumbnails.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Absent when the search generator produced no pages.
    #[serde(default)]
    pub query: Option<QueryBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryBlock {
    /// Keyed by page id.
    #[serde(default)]
    pub pages: HashMap<String, Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    /// Search rank assigned by the generator, 1-based.
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl QueryResponse {
    /// Thumbnail URL of the best-ranked page, if it has a usable one.
    #[must_use]
    pub fn top_thumbnail(&self) -> Option<&str> {
        let pages = &self.query.as_ref()?.pages;
        let top = pages
            .values()
            .min_by_key(|p| p.index.unwrap_or(u32::MAX))?;
        top.thumbnail
            .as_ref()
            .map(|t| t.source.trim())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> QueryResponse {
        serde_json::from_str(json).expect("valid fixture")
    }

    #[test]
    fn top_thumbnail_reads_single_page() {
        let resp = parse(
            r#"{"batchcomplete":"","query":{"pages":{"123":{"pageid":123,"title":"Château de Vitré","index":1,
                "thumbnail":{"source":"https://upload.wikimedia.org/vitre.jpg","width":640,"height":427}}}}}"#,
        );
        assert_eq!(
            resp.top_thumbnail(),
            Some("https://upload.wikimedia.org/vitre.jpg")
        );
    }

    #[test]
    fn top_thumbnail_prefers_lowest_index() {
        let resp = parse(
            r#"{"query":{"pages":{
                "9":{"index":2,"thumbnail":{"source":"https://example.org/second.jpg"}},
                "4":{"index":1,"thumbnail":{"source":"https://example.org/first.jpg"}}}}}"#,
        );
        assert_eq!(resp.top_thumbnail(), Some("https://example.org/first.jpg"));
    }

    #[test]
    fn no_query_block_means_no_thumbnail() {
        let resp = parse(r#"{"batchcomplete":""}"#);
        assert!(resp.top_thumbnail().is_none());
    }

    #[test]
    fn page_without_thumbnail_means_no_thumbnail() {
        let resp = parse(r#"{"query":{"pages":{"1":{"title":"Vitré","index":1}}}}"#);
        assert!(resp.top_thumbnail().is_none());
    }

    #[test]
    fn blank_thumbnail_source_is_ignored() {
        let resp = parse(r#"{"query":{"pages":{"1":{"index":1,"thumbnail":{"source":" "}}}}}"#);
        assert!(resp.top_thumbnail().is_none());
    }
}
