//! Per-user remote document holding the same two id lists.
//!
//! The HTTP implementation speaks a small document API:
//! `GET {base}/users/{uid}` returns the document (404 when the user has none)
//! and `PATCH {base}/users/{uid}` merges the given fields into it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::deserialize_ids;

/// The remote per-user document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUserState {
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub visited_ids: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub wishlist_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches the user's document. `Ok(None)` means the user has none yet.
    async fn load_user_state(&self, user_id: &str)
        -> Result<Option<RemoteUserState>, StoreError>;

    /// Merges both lists and a fresh `updatedAt` into the user's document.
    async fn save_user_state(
        &self,
        user_id: &str,
        visited_ids: &[String],
        wishlist_ids: &[String],
    ) -> Result<(), StoreError>;
}

pub struct HttpRemoteStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for HttpRemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteStore")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl HttpRemoteStore {
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRemoteUrl`] if `base_url` is not an
    /// absolute http(s) URL that can carry path segments.
    pub fn new(client: Client, base_url: &str, token: Option<String>) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidRemoteUrl {
            url: base_url.to_owned(),
            reason: reason.to_owned(),
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base"));
        }
        Ok(Self {
            client,
            base_url: parsed,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn user_url(&self, user_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(user_id);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn load_user_state(
        &self,
        user_id: &str,
    ) -> Result<Option<RemoteUserState>, StoreError> {
        let url = self.user_url(user_id);
        let response = self.authorize(self.client.get(url.clone())).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let state = serde_json::from_str::<RemoteUserState>(&body).map_err(|source| {
            StoreError::Deserialize {
                context: format!("user state for {user_id}"),
                source,
            }
        })?;
        Ok(Some(state))
    }

    async fn save_user_state(
        &self,
        user_id: &str,
        visited_ids: &[String],
        wishlist_ids: &[String],
    ) -> Result<(), StoreError> {
        let url = self.user_url(user_id);
        let document = RemoteUserState {
            visited_ids: visited_ids.to_vec(),
            wishlist_ids: wishlist_ids.to_vec(),
            updated_at: Some(Utc::now()),
        };
        let response = self
            .authorize(self.client.patch(url.clone()))
            .json(&document)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }
}
