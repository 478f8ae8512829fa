use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Boundary to the external free-text generation service. One request per
/// call; the call is bounded by the configured timeout and never retried,
/// since repeated failures mean the service is down rather than a transient
/// hiccup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.generation_base_url.trim_end_matches('/').to_string(),
            model: config.generation_model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            temperature: 0.3,
            max_tokens: 1500,
            top_p: 0.9,
        };

        log::info!("Generation request: {} chars", prompt.len());

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!(
                "Generation service HTTP {}: {}",
                status.as_u16(),
                &body[..body.len().min(200)]
            );
            return Err(AppError::GenerationUnavailable(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.is_empty() {
            log::error!("Generation service returned an empty response field");
            return Err(AppError::GenerationUnavailable(
                "empty response".to_string(),
            ));
        }

        log::info!("Generation reply received: {} chars", parsed.response.len());
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_non_streaming_flag() {
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "Bonjour",
            stream: false,
            temperature: 0.3,
            max_tokens: 1500,
            top_p: 0.9,
        };

        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 1500);
    }

    #[test]
    fn response_tolerates_missing_response_field() {
        let parsed: GenerateResponse =
            serde_json::from_str("{}").expect("empty object should deserialize");
        assert!(parsed.response.is_empty());
    }

    #[test]
    fn client_strips_trailing_slash_from_base_url() {
        let mut config = Config::test_config();
        config.generation_base_url = "http://localhost:11434/".to_string();

        let client = OllamaClient::new(&config).expect("client should build");
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
