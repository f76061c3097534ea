//! Best-effort illustration lookup for castles.
//!
//! Builds candidate search phrases from a castle's name and location, asks an
//! ordered list of encyclopedia image providers for a thumbnail, and caches
//! one outcome per castle id for the life of the resolver.

pub mod cache;
pub mod error;
pub mod provider;
pub mod query;
pub mod resolver;
pub mod types;

pub use cache::{CacheState, ImageCache};
pub use error::ImageError;
pub use provider::{build_http_client, ImageProvider, MediaWikiImageSearch};
pub use query::{build_search_queries, normalize_name, queries_for_castle};
pub use resolver::ImageResolver;
