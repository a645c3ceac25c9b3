use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub agent: AgentConfig,
    pub network_tools: NetworkToolsConfig,
    pub model: ModelConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
}

/// Agent behaviour configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Number of user/assistant exchanges kept in memory
    pub memory_limit: usize,
    /// Route complex queries through the analysis chain
    pub use_advanced_chain: bool,
}

/// Network tools configuration
#[derive(Debug, Clone, Default)]
pub struct NetworkToolsConfig {
    pub knowledge_base_path: Option<PathBuf>,
    pub anomaly_detection: AnomalyDetectionConfig,
}

/// Anomaly detection tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyDetectionConfig {
    pub sensitivity: Sensitivity,
    pub threshold: f64,
}

/// Anomaly detection sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

/// Narration model configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub name: String,
    /// Text-generation endpoint; narration is mocked when unset
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub max_new_tokens: u32,
    pub temperature: f64,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let agent = AgentConfig {
            memory_limit: parse_env("AGENT_MEMORY_LIMIT").unwrap_or(10),
            use_advanced_chain: env::var("AGENT_USE_ADVANCED_CHAIN")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(false),
        };

        let sensitivity = match env::var("ANOMALY_DETECTION_SENSITIVITY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring ANOMALY_DETECTION_SENSITIVITY");
                Sensitivity::default()
            }),
            Err(_) => Sensitivity::default(),
        };

        let threshold = match parse_env::<f64>("ANOMALY_DETECTION_THRESHOLD") {
            Some(t) if (0.0..=1.0).contains(&t) => t,
            Some(t) => {
                warn!(threshold = t, "ANOMALY_DETECTION_THRESHOLD outside [0, 1], using default");
                AnomalyDetectionConfig::default().threshold
            }
            None => AnomalyDetectionConfig::default().threshold,
        };

        let network_tools = NetworkToolsConfig {
            knowledge_base_path: env::var("NETWORK_TOOLS_KNOWLEDGE_BASE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            anomaly_detection: AnomalyDetectionConfig {
                sensitivity,
                threshold,
            },
        };

        let base_url = env::var("MODEL_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if let Some(url) = &base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config {
                    message: format!("MODEL_BASE_URL must use http or https, got '{}'", url),
                });
            }
        }

        let model_defaults = ModelConfig::default();
        let model = ModelConfig {
            name: env::var("MODEL_DEFAULT").unwrap_or(model_defaults.name),
            base_url,
            api_key: env::var("MODEL_API_KEY").ok().filter(|s| !s.is_empty()),
            max_new_tokens: parse_env("MODEL_MAX_NEW_TOKENS")
                .unwrap_or(model_defaults.max_new_tokens),
            temperature: parse_env("MODEL_TEMPERATURE").unwrap_or(model_defaults.temperature),
        };

        let request_defaults = RequestConfig::default();
        let request = RequestConfig {
            timeout_ms: parse_env("REQUEST_TIMEOUT_MS").unwrap_or(request_defaults.timeout_ms),
            max_retries: parse_env("MAX_RETRIES").unwrap_or(request_defaults.max_retries),
            retry_delay_ms: parse_env("RETRY_DELAY_MS")
                .unwrap_or(request_defaults.retry_delay_ms),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            agent,
            network_tools,
            model,
            request,
            logging,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Sensitivity {
    /// Get the sensitivity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "low",
            Sensitivity::Medium => "medium",
            Sensitivity::High => "high",
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Sensitivity::Low),
            "medium" => Ok(Sensitivity::Medium),
            "high" => Ok(Sensitivity::High),
            _ => Err(format!("Unknown sensitivity: {}", s)),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            memory_limit: 10,
            use_advanced_chain: false,
        }
    }
}

impl Default for AnomalyDetectionConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::Medium,
            threshold: 0.7,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "distilgpt2".to_string(),
            base_url: None,
            api_key: None,
            max_new_tokens: 100,
            temperature: 0.7,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
