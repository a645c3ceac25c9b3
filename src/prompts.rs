//! Centralized prompt construction for answer narration
//!
//! The agent narrates tool results through the model manager. Keeping the
//! prompt layouts here makes them easier to maintain and test.

/// Instruction closing a prompt built from analysis chain output.
pub const CHAIN_RESPONSE_INSTRUCTION: &str = "Provide a detailed and helpful response.";

/// Instruction closing a prompt built from raw tool output.
pub const TOOLS_RESPONSE_INSTRUCTION: &str = "Provide a helpful response.";

/// Prompt for narrating an analysis chain run.
///
/// `context` is the serialized chain output.
pub fn chain_response_prompt(query: &str, summary: &str, context: &str) -> String {
    format!(
        "Query: {}\nAnalysis: {}\nContext: {}\n{}",
        query, summary, context, CHAIN_RESPONSE_INSTRUCTION
    )
}

/// Prompt for narrating the outputs of individual tools.
///
/// `context` is the serialized map of tool outputs.
pub fn tools_response_prompt(query: &str, context: &str) -> String {
    format!(
        "Query: {}\nContext: {}\n{}",
        query, context, TOOLS_RESPONSE_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_prompt_layout() {
        let prompt = chain_response_prompt("why slow?", "High latency likely", "{}");
        assert_eq!(
            prompt,
            "Query: why slow?\nAnalysis: High latency likely\nContext: {}\nProvide a detailed and helpful response."
        );
    }

    #[test]
    fn test_tools_prompt_layout() {
        let prompt = tools_response_prompt("status", r#"{"a":1}"#);
        assert!(prompt.starts_with("Query: status\n"));
        assert!(prompt.contains(r#"Context: {"a":1}"#));
        assert!(prompt.ends_with(TOOLS_RESPONSE_INSTRUCTION));
    }
}
