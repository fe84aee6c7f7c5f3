//! HTTP client for the upstream text-generation service.

use crate::config::UpstreamSettings;
use crate::error::RelayError;
use crate::models::{GenerationRequest, GenerationResult};
use crate::services::GenerationClient;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

pub struct UpstreamClient {
    client: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    generate_timeout: Duration,
    health_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(settings: UpstreamSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            generate_timeout: Duration::from_secs(settings.generate_timeout_secs),
            health_timeout: Duration::from_secs(settings.health_timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GenerationClient for UpstreamClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, RelayError> {
        let url = format!("{}/generate", self.base_url);
        tracing::info!(%url, prompt_len = request.prompt.len(), "POST to upstream");

        let mut builder = self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_generation(status, &body)
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RelayError::UpstreamStatus {
                status: response.status().as_u16(),
                body: String::new(),
            })
        }
    }
}

#[derive(Deserialize)]
struct RawGeneration {
    #[serde(default)]
    generated_text: Option<String>,
    #[serde(default)]
    response_time: Option<f64>,
}

/// Map an upstream status/body pair onto the relay's error taxonomy. A 2xx
/// with missing or empty `generated_text` is an application-level failure,
/// not a transport one.
pub fn parse_generation(status: StatusCode, body: &str) -> Result<GenerationResult, RelayError> {
    if !status.is_success() {
        return Err(RelayError::UpstreamStatus {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let raw: RawGeneration = serde_json::from_str(body)
        .map_err(|e| RelayError::Application(format!("malformed upstream response: {e}")))?;

    match raw.generated_text {
        Some(text) if !text.is_empty() => Ok(GenerationResult {
            generated_text: text,
            response_time: raw.response_time,
        }),
        _ => Err(RelayError::Application(
            "upstream response did not include 'generated_text'".to_string(),
        )),
    }
}
