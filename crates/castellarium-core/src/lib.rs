//! Domain types and pure operations shared by every Castellarium crate:
//! the normalized [`Castle`] entity, dataset normalization, catalog views,
//! map helpers and environment configuration.

pub mod app_config;
pub mod castle;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use castle::{Castle, Coordinates};
pub use catalog::{search, select, visited_stats, VisitedStats};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{load_dataset, normalize_dataset, normalize_record, parse_dataset};
pub use error::{ConfigError, DatasetError};
