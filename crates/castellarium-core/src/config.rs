use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://fr.wikipedia.org/w/api.php";
pub const DEFAULT_COMMONS_API_URL: &str = "https://commons.wikimedia.org/w/api.php";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values are treated like unset ones.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CASTELLARIUM_ENV", "development"));
    let log_level = or_default("CASTELLARIUM_LOG_LEVEL", "info");
    let dataset = or_default("CASTELLARIUM_DATASET", "./chateaux.json");
    let state_path = PathBuf::from(or_default(
        "CASTELLARIUM_STATE_PATH",
        "./castellarium-state.json",
    ));

    let remote_url = optional("CASTELLARIUM_REMOTE_URL");
    if let Some(url) = &remote_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(
                "CASTELLARIUM_REMOTE_URL",
                format!("\"{url}\" is not an http(s) URL"),
            ));
        }
    }
    let remote_token = optional("CASTELLARIUM_REMOTE_TOKEN");

    let wikipedia_api_url = or_default("CASTELLARIUM_WIKIPEDIA_API_URL", DEFAULT_WIKIPEDIA_API_URL);
    let commons_api_url = or_default("CASTELLARIUM_COMMONS_API_URL", DEFAULT_COMMONS_API_URL);
    let thumbnail_size = parse_u32("CASTELLARIUM_THUMBNAIL_SIZE", "640")?;
    let request_timeout_secs = parse_u64("CASTELLARIUM_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "CASTELLARIUM_USER_AGENT",
        "castellarium/0.1 (castle-catalog)",
    );

    let search_limit = parse_usize("CASTELLARIUM_SEARCH_LIMIT", "100")?;
    let search_image_limit = parse_usize("CASTELLARIUM_SEARCH_IMAGE_LIMIT", "30")?;

    let radius_raw = or_default("CASTELLARIUM_NEARBY_RADIUS_KM", "50");
    let nearby_radius_km = radius_raw
        .parse::<f64>()
        .map_err(|e| invalid("CASTELLARIUM_NEARBY_RADIUS_KM", e.to_string()))?;
    if !nearby_radius_km.is_finite() || nearby_radius_km <= 0.0 {
        return Err(invalid(
            "CASTELLARIUM_NEARBY_RADIUS_KM",
            format!("radius must be a positive number, got {radius_raw}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        dataset,
        state_path,
        remote_url,
        remote_token,
        wikipedia_api_url,
        commons_api_url,
        thumbnail_size,
        request_timeout_secs,
        user_agent,
        search_limit,
        search_image_limit,
        nearby_radius_km,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
