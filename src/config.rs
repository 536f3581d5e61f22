use std::{env, fmt::Display, str::FromStr};

use tracing::info;

/// Runtime configuration, read once at startup from the environment
/// (a `.env` file is loaded before this in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Key required in the `x-api-key` header of the public REST API.
    /// When unset, the API routes reject every request.
    pub api_key: Option<String>,
    /// Base URL used for the canonical `url` field in API responses.
    pub community_base_url: Option<String>,
    pub imgproxy_url: String,
    pub imgproxy_key: Option<String>,
    pub imgproxy_salt: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: try_load("HOST", "127.0.0.1"),
            port: try_load("PORT", "3000"),
            api_key: env::var("API_KEY").ok().filter(|s| !s.is_empty()),
            community_base_url: env::var("COMMUNITY_BASE_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string()),
            imgproxy_url: try_load("IMGPROXY_URL", "http://localhost:8080"),
            imgproxy_key: env::var("IMGPROXY_KEY").ok().filter(|s| !s.is_empty()),
            imgproxy_salt: env::var("IMGPROXY_SALT").ok().filter(|s| !s.is_empty()),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .unwrap_or_else(|e| panic!("Invalid {key} value: {e}"))
}
