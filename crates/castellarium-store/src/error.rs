use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local store file {path} is not a JSON object of strings: {source}")]
    CorruptFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("local store entry \"{key}\" is not a JSON array: {source}")]
    CorruptEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode local store entry \"{key}\": {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid remote store URL \"{url}\": {reason}")]
    InvalidRemoteUrl { url: String, reason: String },
}
