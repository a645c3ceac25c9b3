//! Text generation used for answer narration.
//!
//! [`ModelManager`] is what the agent talks to. It wraps an optional
//! [`TextGenerator`] backend and always produces text: without a backend it
//! returns a canned mock answer, and backend failures or timeouts degrade to a
//! fixed fallback string with a logged warning.

mod client;
mod types;

pub use client::*;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ModelConfig, RequestConfig};
use crate::error::{AppResult, ModelResult};

/// A backend able to continue a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt.
    async fn generate_text(&self, prompt: &str) -> ModelResult<String>;
}

/// Description of the narration backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    /// "http" when an endpoint is configured, "mock" otherwise
    pub backend: String,
    pub is_loaded: bool,
}

/// Infallible narration wrapper around an optional backend.
#[derive(Clone)]
pub struct ModelManager {
    model_name: String,
    backend: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl ModelManager {
    /// Create a manager that always returns mock narration
    pub fn mock(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            backend: None,
            timeout: Duration::from_millis(RequestConfig::default().timeout_ms),
        }
    }

    /// Create a manager over an explicit backend
    pub fn with_backend(
        model_name: impl Into<String>,
        backend: Arc<dyn TextGenerator>,
        timeout: Duration,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            backend: Some(backend),
            timeout,
        }
    }

    /// Build from configuration; an HTTP backend is used when a base URL is set.
    pub fn from_config(config: &ModelConfig, request: &RequestConfig) -> AppResult<Self> {
        let Some(base_url) = config.base_url.as_deref() else {
            warn!(
                model = %config.name,
                "No MODEL_BASE_URL configured, using mock narration"
            );
            return Ok(Self::mock(&config.name));
        };

        let client = InferenceClient::new(base_url, config, request.clone())?;
        info!(model = %config.name, base_url = %base_url, "Inference client initialized");

        // Every attempt plus its backoff must fit inside the overall budget.
        let attempts = u64::from(request.max_retries).saturating_add(1);
        let backoff = total_backoff_ms(request.retry_delay_ms, request.max_retries);
        let budget = request
            .timeout_ms
            .saturating_mul(attempts)
            .saturating_add(backoff);

        Ok(Self::with_backend(
            &config.name,
            Arc::new(client),
            Duration::from_millis(budget),
        ))
    }

    /// Generate narration for a prompt; never fails.
    pub async fn generate_text(&self, prompt: &str) -> String {
        let Some(backend) = &self.backend else {
            return format!("This is a mock response to: {}", prompt);
        };

        match tokio::time::timeout(self.timeout, backend.generate_text(prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(model = %self.model_name, error = %e, "Text generation failed, using fallback");
                fallback_text(prompt)
            }
            Err(_) => {
                warn!(
                    model = %self.model_name,
                    timeout_ms = self.timeout.as_millis(),
                    "Text generation timed out, using fallback"
                );
                fallback_text(prompt)
            }
        }
    }

    /// Information about the configured model
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.model_name.clone(),
            backend: if self.backend.is_some() { "http" } else { "mock" }.to_string(),
            is_loaded: self.backend.is_some(),
        }
    }
}

fn fallback_text(prompt: &str) -> String {
    format!("Error generating response for: {}", prompt)
}
