use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Knowledge base loading errors
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid knowledge base JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unrecognized knowledge base shape: {message}")]
    UnrecognizedShape { message: String },
}

/// Text generation backend errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model backend unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for knowledge base loading
pub type KnowledgeBaseResult<T> = Result<T, KnowledgeBaseError>;

/// Result type alias for model backend operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "MODEL_BASE_URL must use http or https".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration error: MODEL_BASE_URL must use http or https"
        );
    }

    #[test]
    fn test_knowledge_base_error_display() {
        let err = KnowledgeBaseError::Io {
            path: PathBuf::from("/missing/kb.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read /missing/kb.json: no such file"
        );

        let err = KnowledgeBaseError::UnrecognizedShape {
            message: "expected array or object with entries".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized knowledge base shape: expected array or object with entries"
        );
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::Unavailable {
            message: "server down".to_string(),
            retries: 3,
        };
        assert_eq!(
            err.to_string(),
            "Model backend unavailable: server down (retries: 3)"
        );

        let err = ModelError::Api {
            status: 503,
            message: "loading".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - loading");

        let err = ModelError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_parse_error_converts_to_app_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let kb_err: KnowledgeBaseError = json_err.into();
        let app_err: AppError = kb_err.into();
        assert!(matches!(
            app_err,
            AppError::KnowledgeBase(KnowledgeBaseError::Parse(_))
        ));
    }

    #[test]
    fn test_model_error_conversion_to_app_error() {
        let model_err = ModelError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = model_err.into();
        assert!(matches!(app_err, AppError::Model(_)));
        assert!(app_err.to_string().contains("Request timeout"));
    }
}
