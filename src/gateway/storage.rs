use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use crate::{
    config::AppConfig,
    gateway::{GatewayError, GatewayResult, ImageStorage},
};

const STORAGE_PREFIX: [&str; 3] = ["storage", "v1", "object"];

/// Object storage client for the backend's product-image bucket.
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.service_url.clone(),
            api_key: config.service_api_key.clone(),
            bucket: config.storage_bucket.clone(),
        }
    }

    fn object_url(&self, scope: &[&str], object_path: &str) -> Url {
        let mut url = self.base_url.clone();
        // `AppConfig` only accepts URLs that can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(STORAGE_PREFIX)
                .extend(scope)
                .push(&self.bucket)
                .extend(object_path.split('/'));
        }
        url
    }
}

#[async_trait]
impl ImageStorage for HttpObjectStorage {
    async fn upload(
        &self,
        object_name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> GatewayResult<String> {
        let url = self.object_url(&[], object_name);
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CACHE_CONTROL, "max-age=3600")
            .header(CONTENT_TYPE, content_type.unwrap_or("application/octet-stream"))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "image upload request failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StorageErrorBody>(&text)
                .ok()
                .and_then(|body| body.message.or(body.error))
                .unwrap_or_else(|| format!("Image upload failed with status {status}"));
            tracing::error!(%status, object = object_name, message = %message, "image upload rejected");
            return Err(GatewayError::new(message));
        }

        Ok(object_name.to_string())
    }

    fn public_url(&self, object_path: &str) -> String {
        self.object_url(&["public"], object_path).to_string()
    }
}
