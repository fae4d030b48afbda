//! OpenAI-compatible chat completions gateway

use super::gateway::{ChatMessage, GatewayError, GenerationRequest, LlmGateway};
use crate::config::LlmConfig;
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Gateway backed by an OpenAI-compatible HTTP API
pub struct OpenAiGateway {
    client: Client,
    config: LlmConfig,
}

impl OpenAiGateway {
    /// Create a new gateway
    pub fn new(config: LlmConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Model requests are sent to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_once(&self, body: &ChatCompletionRequest<'_>) -> Result<String, GatewayError> {
        let mut req = self.client.post(&self.config.api_url).json(body);

        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(e.to_string())
            } else {
                GatewayError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }

    /// Exponential backoff for the given retry (1-based)
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let base = self.config.retry_backoff();
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        base.saturating_mul(multiplier)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        debug!(
            "Sending {} messages to {}, max_tokens={}",
            request.messages.len(),
            self.config.model,
            request.max_tokens
        );

        let mut attempt = 0;
        loop {
            let start = Instant::now();
            let result = self.send_once(&body).await;
            METRICS.record_gateway_request(result.is_ok(), start.elapsed().as_secs_f64());

            match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = self.calculate_backoff(attempt);
                    warn!("Generation attempt {} failed: {}, retrying in {:?}", attempt, e, backoff);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    warn!("Generation failed after {} attempts: {}", attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
