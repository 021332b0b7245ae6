use std::env;

use anyhow::{Context, anyhow};
use url::Url;

pub const DEFAULT_STORAGE_BUCKET: &str = "tea-varieties";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_url: Url,
    pub service_api_key: String,
    pub database_url: String,
    pub storage_bucket: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing or blank connection
    /// parameters are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let service_url = required("SERVICE_URL")?;
        let service_url =
            Url::parse(&service_url).with_context(|| format!("SERVICE_URL is not a valid URL: {service_url}"))?;
        if service_url.cannot_be_a_base() {
            return Err(anyhow!("SERVICE_URL must be an http(s) URL"));
        }
        let service_api_key = required("SERVICE_API_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let storage_bucket = lookup("STORAGE_BUCKET")
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string());
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        Ok(Self {
            service_url,
            service_api_key,
            database_url,
            storage_bucket,
            host,
            port,
        })
    }
}
