use castellarium_core::Castle;

use crate::cache::{CacheState, ImageCache};
use crate::provider::ImageProvider;
use crate::query::queries_for_castle;

/// Finds at most one illustration per castle.
///
/// For every candidate query (most specific first), each provider is asked
/// in order; the first non-empty thumbnail wins. Provider failures count as
/// "nothing found" and never reach the caller. Outcomes, including misses,
/// are cached per castle id so a castle is searched at most once per
/// resolver, and concurrent callers for the same id share one search.
pub struct ImageResolver {
    providers: Vec<Box<dyn ImageProvider>>,
    cache: ImageCache,
}

impl ImageResolver {
    #[must_use]
    pub fn new(providers: Vec<Box<dyn ImageProvider>>) -> Self {
        Self {
            providers,
            cache: ImageCache::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Cached outcome for `castle`, without triggering a search.
    #[must_use]
    pub fn cached(&self, castle: &Castle) -> CacheState {
        self.cache.state(&castle.id)
    }

    /// Returns the image URL for `castle`, searching on first use.
    pub async fn resolve(&self, castle: &Castle) -> Option<String> {
        // Registering the slot happens before the first await, so a second
        // caller for the same id joins this lookup instead of starting one.
        let slot = self.cache.slot(&castle.id);
        let outcome = slot.get_or_init(|| self.search(castle)).await;
        outcome.clone()
    }

    /// Like [`resolve`](Self::resolve), and hands a found URL to `sink`.
    pub async fn resolve_into<F>(&self, castle: &Castle, sink: F) -> Option<String>
    where
        F: FnOnce(&str),
    {
        let url = self.resolve(castle).await;
        if let Some(found) = &url {
            sink(found);
        }
        url
    }

    async fn search(&self, castle: &Castle) -> Option<String> {
        let queries = queries_for_castle(castle);
        if queries.is_empty() {
            tracing::debug!(castle_id = %castle.id, "no usable image query for castle");
            return None;
        }

        for query in &queries {
            for provider in &self.providers {
                match provider.search(query).await {
                    Ok(Some(url)) => {
                        tracing::debug!(
                            castle_id = %castle.id,
                            provider = provider.name(),
                            query = %query,
                            url = %url,
                            "image found"
                        );
                        return Some(url);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!(
                            castle_id = %castle.id,
                            provider = provider.name(),
                            query = %query,
                            error = %e,
                            "image search failed, treating as no result"
                        );
                    }
                }
            }
        }

        tracing::debug!(
            castle_id = %castle.id,
            candidates = queries.len(),
            "no image found"
        );
        None
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
