//! # Network AI Assistant
//!
//! An agentic assistant for network troubleshooting. Each query is planned by
//! keyword rules, executed against a set of network tools, and narrated into
//! an answer with reasoning and recommended actions.
//!
//! ## Features
//!
//! - **Keyword Planning**: closed set of plan steps chosen per query
//! - **Network Tools**: traffic, anomaly, health and failure telemetry plus
//!   knowledge-base diagnosis and search
//! - **Analysis Chain**: classify → gather → analyze → recommend for complex
//!   queries
//! - **Narration**: optional HTTP text-generation backend with a mock fallback
//! - **Bounded Memory**: recent conversation turns per agent
//!
//! ## Architecture
//!
//! ```text
//! CLI → NetworkAgent → NetworkTools → TelemetrySource / KnowledgeBase
//!            ↓               ↑
//!       ModelManager   NetworkAnalysisChain
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use network_ai_assistant::{Config, NetworkAgent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut agent = NetworkAgent::new(&config)?;
//!     let response = agent.process_query("We have high latency issues").await;
//!     println!("{}", response.answer);
//!     Ok(())
//! }
//! ```

/// Agent pipeline: planning, execution, narration and memory.
pub mod agent;
/// Multi-step analysis chain for complex queries.
pub mod chain;
/// Configuration loaded from environment variables.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Static knowledge base of known network issues.
pub mod knowledge;
/// Text generation backends and the narration manager.
pub mod model;
/// Prompt layouts for answer narration.
pub mod prompts;
/// Live network telemetry capability and its mock implementation.
pub mod telemetry;
/// Network tools exposed to the agent.
pub mod tools;

pub use agent::{NetworkAgent, Response};
pub use config::Config;
pub use error::{AppError, AppResult};
