use serde::{Deserialize, Serialize};

/// Request body for a text-generation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub inputs: String,
    pub parameters: GenerateParameters,
}

/// Sampling parameters
#[derive(Debug, Clone, Serialize)]
pub struct GenerateParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub do_sample: bool,
    /// Only return the continuation, not the prompt
    pub return_full_text: bool,
}

/// A single generation result
#[derive(Debug, Clone, Deserialize)]
pub struct Generation {
    pub generated_text: String,
}

/// Response from a text-generation endpoint.
///
/// Inference servers return either a single object or a one-element array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Single(Generation),
    Batch(Vec<Generation>),
}

impl GenerateRequest {
    /// Create a request for a prompt
    pub fn new(prompt: impl Into<String>, max_new_tokens: u32, temperature: f64) -> Self {
        Self {
            inputs: prompt.into(),
            parameters: GenerateParameters {
                max_new_tokens,
                temperature,
                do_sample: true,
                return_full_text: false,
            },
        }
    }
}

impl GenerateResponse {
    /// The first generated text, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Single(g) => Some(g.generated_text),
            GenerateResponse::Batch(batch) => batch.into_iter().next().map(|g| g.generated_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest::new("Query: x", 64, 0.5);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "Query: x");
        assert_eq!(json["parameters"]["max_new_tokens"], 64);
        assert_eq!(json["parameters"]["temperature"], 0.5);
        assert_eq!(json["parameters"]["return_full_text"], false);
    }

    #[test]
    fn test_response_single_and_batch() {
        let single: GenerateResponse =
            serde_json::from_str(r#"{"generated_text": "one"}"#).unwrap();
        assert_eq!(single.into_text().as_deref(), Some("one"));

        let batch: GenerateResponse =
            serde_json::from_str(r#"[{"generated_text": "first"}, {"generated_text": "second"}]"#)
                .unwrap();
        assert_eq!(batch.into_text().as_deref(), Some("first"));

        let empty: GenerateResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_text().is_none());
    }
}
