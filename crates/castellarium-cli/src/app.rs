//! Everything a command needs once configuration is loaded: the normalized
//! catalog, the image resolver and the visited / wishlist tracker.

use std::sync::Arc;

use anyhow::Context;
use castellarium_core::{parse_dataset, AppConfig, Castle};
use castellarium_images::{build_http_client, ImageProvider, ImageResolver, MediaWikiImageSearch};
use castellarium_store::{
    HttpRemoteStore, JsonFileStore, LocalStore, RemoteStore, SignInOutcome, Tracker,
};

pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) castles: Vec<Castle>,
    pub(crate) resolver: ImageResolver,
    pub(crate) tracker: Tracker,
}

impl AppContext {
    /// Loads the dataset and opens local (and, if configured, remote)
    /// storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched or normalized, the
    /// HTTP client cannot be built, or local storage is unreadable.
    pub(crate) async fn load(config: AppConfig) -> anyhow::Result<Self> {
        let client = build_http_client(config.request_timeout_secs, &config.user_agent)
            .context("failed to build HTTP client")?;

        let castles = load_castles(&client, &config.dataset).await?;
        tracing::info!(count = castles.len(), dataset = %config.dataset, "catalog loaded");

        let resolver = build_resolver(&client, &config)?;
        let tracker = open_tracker(&client, &config)?;

        Ok(Self {
            config,
            castles,
            resolver,
            tracker,
        })
    }

    /// Re-runs sign-in reconciliation for the remembered session user.
    ///
    /// # Errors
    ///
    /// Returns an error only if local storage cannot be written.
    pub(crate) async fn restore_session(&mut self) -> anyhow::Result<()> {
        let Some(user_id) = self.tracker.session_user().map(str::to_owned) else {
            return Ok(());
        };
        let outcome = self.tracker.reconcile_on_sign_in(&user_id).await?;
        if let SignInOutcome::FetchFailed { reason } = &outcome {
            eprintln!("warning: could not load saved lists for {user_id}: {reason}");
        }
        Ok(())
    }

    /// Looks up a castle by id.
    ///
    /// # Errors
    ///
    /// Returns an error if no castle has this id.
    pub(crate) fn castle(&self, id: &str) -> anyhow::Result<&Castle> {
        find_castle(&self.castles, id)
    }
}

pub(crate) fn find_castle<'a>(castles: &'a [Castle], id: &str) -> anyhow::Result<&'a Castle> {
    castles
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow::anyhow!("castle '{id}' not found; try `search` to find its id"))
}

fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn load_castles(client: &reqwest::Client, source: &str) -> anyhow::Result<Vec<Castle>> {
    if !is_remote_source(source) {
        return castellarium_core::load_dataset(std::path::Path::new(source))
            .with_context(|| format!("failed to load dataset {source}"));
    }

    let response = client
        .get(source)
        .send()
        .await
        .with_context(|| format!("failed to fetch dataset {source}"))?;
    if !response.status().is_success() {
        anyhow::bail!("dataset {source} returned HTTP {}", response.status());
    }
    let body = response
        .text()
        .await
        .with_context(|| format!("failed to read dataset {source}"))?;
    parse_dataset(&body).with_context(|| format!("failed to load dataset {source}"))
}

/// Wikipedia first, then Commons.
fn build_resolver(client: &reqwest::Client, config: &AppConfig) -> anyhow::Result<ImageResolver> {
    let providers: Vec<Box<dyn ImageProvider>> = vec![
        Box::new(MediaWikiImageSearch::new(
            client.clone(),
            "wikipedia",
            &config.wikipedia_api_url,
            config.thumbnail_size,
        )?),
        Box::new(MediaWikiImageSearch::new(
            client.clone(),
            "commons",
            &config.commons_api_url,
            config.thumbnail_size,
        )?),
    ];
    Ok(ImageResolver::new(providers))
}

fn open_tracker(client: &reqwest::Client, config: &AppConfig) -> anyhow::Result<Tracker> {
    let local: Arc<dyn LocalStore> = Arc::new(JsonFileStore::new(&config.state_path));
    let remote: Option<Arc<dyn RemoteStore>> = match &config.remote_url {
        Some(url) => Some(Arc::new(HttpRemoteStore::new(
            client.clone(),
            url,
            config.remote_token.clone(),
        )?)),
        None => {
            tracing::debug!("no remote store configured, running local-only");
            None
        }
    };
    Tracker::open(local, remote)
        .with_context(|| format!("failed to open state file {}", config.state_path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn remote_source_detection() {
        assert!(is_remote_source("https://example.org/chateaux.json"));
        assert!(is_remote_source("http://localhost:8080/chateaux.json"));
        assert!(!is_remote_source("./chateaux.json"));
        assert!(!is_remote_source("/data/https-mirror.json"));
    }

    #[test]
    fn find_castle_by_id() {
        let castles = castellarium_core::normalize_dataset(vec![
            json!({"id": "PA1", "nom": "Château de Vitré"}),
            json!({"id": 2, "nom": "Château de Fougères"}),
        ])
        .unwrap();

        assert_eq!(find_castle(&castles, "2").unwrap().name, "Château de Fougères");
        let err = find_castle(&castles, "PA9").unwrap_err();
        assert!(err.to_string().contains("PA9"));
    }
}
