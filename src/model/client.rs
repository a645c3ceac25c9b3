use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{GenerateRequest, GenerateResponse};
use super::TextGenerator;
use crate::config::{ModelConfig, RequestConfig};
use crate::error::{ModelError, ModelResult};

/// Client for a text-generation inference endpoint
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model_name: String,
    max_new_tokens: u32,
    temperature: f64,
    request_config: RequestConfig,
}

impl InferenceClient {
    /// Create a new inference client
    pub fn new(
        base_url: &str,
        config: &ModelConfig,
        request_config: RequestConfig,
    ) -> ModelResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ModelError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model_name: config.name.clone(),
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
            request_config,
        })
    }

    /// Generate text, retrying with exponential backoff
    pub async fn generate(&self, prompt: &str) -> ModelResult<String> {
        let url = format!("{}/generate", self.base_url);
        let request = GenerateRequest::new(prompt, self.max_new_tokens, self.temperature);

        let mut last_error = None;
        let mut attempts: u32 = 0;

        for retry in 0..=self.request_config.max_retries {
            if retry > 0 {
                let delay = Duration::from_millis(backoff_delay_ms(
                    self.request_config.retry_delay_ms,
                    retry,
                ));
                warn!(
                    model = %self.model_name,
                    retry,
                    delay_ms = delay.as_millis(),
                    "Retrying text generation request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            attempts = attempts.saturating_add(1);

            match self.execute_request(&url, &request).await {
                Ok(text) => {
                    info!(
                        model = %self.model_name,
                        latency_ms = start.elapsed().as_millis(),
                        "Text generation succeeded"
                    );
                    return Ok(strip_prompt_echo(prompt, text));
                }
                Err(e) => {
                    error!(
                        model = %self.model_name,
                        error = %e,
                        latency_ms = start.elapsed().as_millis(),
                        retry,
                        "Text generation failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(ModelError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries: attempts,
        })
    }

    /// Execute a single request (internal)
    async fn execute_request(&self, url: &str, request: &GenerateRequest) -> ModelResult<String> {
        debug!(
            model = %self.model_name,
            prompt_chars = request.inputs.len(),
            "Calling text generation endpoint"
        );

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout {
                    timeout_ms: self.request_config.timeout_ms,
                }
            } else {
                ModelError::Http(e)
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let generated: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| ModelError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        generated
            .into_text()
            .ok_or_else(|| ModelError::InvalidResponse {
                message: "Response contained no generations".to_string(),
            })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate_text(&self, prompt: &str) -> ModelResult<String> {
        self.generate(prompt).await
    }
}

/// Delay before retry number `retry` (1-based): `retry_delay_ms * 2^(retry-1)`, saturating.
pub(crate) fn backoff_delay_ms(retry_delay_ms: u64, retry: u32) -> u64 {
    retry_delay_ms.saturating_mul(2_u64.saturating_pow(retry.saturating_sub(1)))
}

/// Sum of every backoff delay for `max_retries` retries, saturating.
pub(crate) fn total_backoff_ms(retry_delay_ms: u64, max_retries: u32) -> u64 {
    retry_delay_ms.saturating_mul(2_u64.saturating_pow(max_retries).saturating_sub(1))
}

/// Drop a leading copy of the prompt some servers echo back.
fn strip_prompt_echo(prompt: &str, text: String) -> String {
    match text.strip_prefix(prompt) {
        Some(rest) => rest.trim().to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = InferenceClient::new(
            "http://localhost:8080/",
            &ModelConfig::default(),
            RequestConfig::default(),
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff_delay_ms(500, 1), 500);
        assert_eq!(backoff_delay_ms(500, 3), 2000);
        assert_eq!(backoff_delay_ms(500, 70), u64::MAX);
        assert_eq!(total_backoff_ms(500, 2), 1500);
        assert_eq!(total_backoff_ms(500, 0), 0);
        assert_eq!(total_backoff_ms(1, u32::MAX), u64::MAX - 1);
    }

    #[test]
    fn test_strip_prompt_echo() {
        assert_eq!(
            strip_prompt_echo("Query: x", "Query: x  the answer".to_string()),
            "the answer"
        );
        assert_eq!(
            strip_prompt_echo("Query: x", "the answer".to_string()),
            "the answer"
        );
    }
}
