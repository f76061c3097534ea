//! Image search providers.
//!
//! A provider turns one free-text query into at most one thumbnail URL. The
//! resolver tries providers in the order it was given them, so adding or
//! reordering sources never touches the resolution algorithm.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::ImageError;
use crate::types::QueryResponse;

/// One image search backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Searches for `query` and returns the first usable thumbnail URL.
    ///
    /// `Ok(None)` means the backend answered but had nothing to offer.
    async fn search(&self, query: &str) -> Result<Option<String>, ImageError>;
}

/// Builds the HTTP client shared by the providers.
///
/// # Errors
///
/// Returns [`ImageError::Http`] if the underlying `reqwest::Client` cannot be
/// constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ImageError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Thumbnail search against a MediaWiki `api.php` endpoint, e.g. French
/// Wikipedia or Wikimedia Commons.
///
/// Uses `generator=search` limited to one page and `prop=pageimages` to get
/// that page's lead image at the configured width.
pub struct MediaWikiImageSearch {
    client: Client,
    name: String,
    endpoint: Url,
    thumbnail_size: u32,
}

impl MediaWikiImageSearch {
    /// Creates a provider for the `api.php` endpoint at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute http(s) URL.
    pub fn new(
        client: Client,
        name: &str,
        endpoint: &str,
        thumbnail_size: u32,
    ) -> Result<Self, ImageError> {
        let url = Url::parse(endpoint).map_err(|e| ImageError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImageError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }
        Ok(Self {
            client,
            name: name.to_owned(),
            endpoint: url,
            thumbnail_size,
        })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("origin", "*")
            .append_pair("prop", "pageimages")
            .append_pair("piprop", "thumbnail")
            .append_pair("pithumbsize", &self.thumbnail_size.to_string())
            .append_pair("generator", "search")
            .append_pair("gsrsearch", query)
            .append_pair("gsrlimit", "1");
        url
    }
}

#[async_trait]
impl ImageProvider for MediaWikiImageSearch {
    fn name(&self) -> &str {
        &self.name
    }

    /// # Errors
    ///
    /// - [`ImageError::Http`] on network failure.
    /// - [`ImageError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ImageError::Deserialize`] if the body is not a MediaWiki query response.
    async fn search(&self, query: &str) -> Result<Option<String>, ImageError> {
        let url = self.search_url(query);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed =
            serde_json::from_str::<QueryResponse>(&body).map_err(|e| ImageError::Deserialize {
                context: format!("{} search for \"{query}\"", self.name),
                source: e,
            })?;

        Ok(parsed.top_thumbnail().map(str::to_owned))
    }
}
