use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Local path or `http(s)://` URL of the castle dataset JSON.
    pub dataset: String,
    /// File backing the durable local key-value store.
    pub state_path: PathBuf,
    /// Base URL of the remote per-user document store. `None` keeps the
    /// application in local-only mode.
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
    pub wikipedia_api_url: String,
    pub commons_api_url: String,
    pub thumbnail_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_limit: usize,
    pub search_image_limit: usize,
    pub nearby_radius_km: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("dataset", &self.dataset)
            .field("state_path", &self.state_path)
            .field("remote_url", &self.remote_url)
            .field(
                "remote_token",
                &self.remote_token.as_ref().map(|_| "[redacted]"),
            )
            .field("wikipedia_api_url", &self.wikipedia_api_url)
            .field("commons_api_url", &self.commons_api_url)
            .field("thumbnail_size", &self.thumbnail_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_limit", &self.search_limit)
            .field("search_image_limit", &self.search_image_limit)
            .field("nearby_radius_km", &self.nearby_radius_km)
            .finish()
    }
}
