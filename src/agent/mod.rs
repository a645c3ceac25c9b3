//! The network agent: plan, execute and respond for each query.
//!
//! A query is planned by keyword rules ([`plan_for`]), each [`Step`] is
//! dispatched to [`NetworkTools`] or the [`NetworkAnalysisChain`], and the
//! collected outputs are narrated through the [`ModelManager`] into a
//! [`Response`]. The agent keeps a bounded [`ConversationMemory`].

mod memory;
mod planner;

pub use memory::*;
pub use planner::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chain::{ChainOutput, NetworkAnalysisChain};
use crate::config::{AgentConfig, Config};
use crate::error::AppResult;
use crate::model::ModelManager;
use crate::prompts::{chain_response_prompt, tools_response_prompt};
use crate::tools::{NetworkTools, RecommendationSet, ToolOutput};

/// Action reported when no tool produced a recommendation.
pub const NO_ACTIONS: &str = "No specific actions recommended at this time.";

/// Outputs collected while executing a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub steps_executed: Vec<Step>,
    /// Tool outputs keyed by step or data name
    pub tools_output: BTreeMap<String, ToolOutput>,
    pub chain_output: Option<ChainOutput>,
}

/// Answer returned for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    pub reasoning: String,
    pub actions: Vec<String>,
}

/// Conversational network troubleshooting agent.
pub struct NetworkAgent {
    memory: ConversationMemory,
    tools: Arc<NetworkTools>,
    model: ModelManager,
    chain: Option<NetworkAnalysisChain>,
    config: AgentConfig,
}

impl NetworkAgent {
    /// Build an agent and its collaborators from configuration.
    pub fn new(config: &Config) -> AppResult<Self> {
        let tools = Arc::new(NetworkTools::new(&config.network_tools));
        let model = ModelManager::from_config(&config.model, &config.request)?;
        Ok(Self::with_parts(tools, model, config.agent.clone()))
    }

    /// Build an agent over existing tools and model.
    ///
    /// An analysis chain is created only when `use_advanced_chain` is set.
    pub fn with_parts(tools: Arc<NetworkTools>, model: ModelManager, config: AgentConfig) -> Self {
        let chain = config
            .use_advanced_chain
            .then(|| NetworkAnalysisChain::new(Arc::clone(&tools)));

        info!(
            memory_limit = config.memory_limit,
            advanced_chain = chain.is_some(),
            model = %model.model_info().model_name,
            "NetworkAgent initialized"
        );

        Self {
            memory: ConversationMemory::new(config.memory_limit),
            tools,
            model,
            chain,
            config,
        }
    }

    /// Conversation history
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Shared network tools
    pub fn tools(&self) -> &Arc<NetworkTools> {
        &self.tools
    }

    /// Narration model
    pub fn model(&self) -> &ModelManager {
        &self.model
    }

    /// Agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Choose the steps for a query.
    pub fn plan(&self, query: &str) -> Plan {
        plan_for(query, self.chain.is_some())
    }

    /// Run each step of a plan.
    pub fn execute(&self, plan: &[Step], query: &str) -> PlanResult {
        let mut result = PlanResult {
            steps_executed: Vec::with_capacity(plan.len()),
            tools_output: BTreeMap::new(),
            chain_output: None,
        };

        for &step in plan {
            debug!(step = %step, "Executing step");
            result.steps_executed.push(step);

            let tools = &self.tools;
            let output = match step {
                Step::AnalyzeNetworkTraffic => ToolOutput::Traffic(tools.analyze_traffic()),
                Step::DetectAnomalies => ToolOutput::Anomalies(tools.detect_anomalies()),
                Step::GenerateReport => ToolOutput::Report(tools.generate_report()),
                Step::CheckNetworkHealth => ToolOutput::Health(tools.check_health()),
                Step::PredictFailures => ToolOutput::Failures(tools.predict_failures()),
                Step::SuggestMaintenance => ToolOutput::Maintenance(tools.suggest_maintenance()),
                Step::DiagnoseIssue => ToolOutput::Diagnosis(tools.diagnose_issue(query)),
                Step::SearchKnowledgeBase => {
                    ToolOutput::Search(tools.search_knowledge_base(query))
                }
                Step::SuggestSolutions => ToolOutput::Solutions(tools.suggest_solutions(query)),
                Step::ClassifyQuery => ToolOutput::Classification(tools.classify_query(query)),
                Step::GenerateResponse => continue,
                Step::UseAnalysisChain => {
                    match &self.chain {
                        Some(chain) => {
                            let chain_output = chain.run(query);
                            merge_chain_output(&mut result.tools_output, &chain_output);
                            result.chain_output = Some(chain_output);
                        }
                        None => debug!("No analysis chain configured, skipping step"),
                    }
                    continue;
                }
            };

            result.tools_output.insert(step.as_str().to_string(), output);
        }

        result
    }

    /// Turn plan results into a narrated response.
    pub async fn formulate_response(&self, result: &PlanResult, query: &str) -> Response {
        let (answer, reasoning, mut actions) = match &result.chain_output {
            Some(chain) => {
                let summary = &chain.analysis.summary;
                let prompt = chain_response_prompt(query, summary, &to_context(chain));
                let answer = self.model.generate_text(&prompt).await;

                let mut reasoning = format!(
                    "I analyzed your query using our network analysis chain. {}",
                    summary
                );
                if !chain.analysis.potential_causes.is_empty() {
                    reasoning.push_str(&format!(
                        " Potential causes include: {}",
                        chain.analysis.potential_causes.join(", ")
                    ));
                }

                (answer, reasoning, chain.recommendations.clone())
            }
            None => {
                let prompt = tools_response_prompt(query, &to_context(&result.tools_output));
                let answer = self.model.generate_text(&prompt).await;

                let steps: Vec<&str> = result.steps_executed.iter().map(Step::as_str).collect();
                let reasoning = format!(
                    "I analyzed your query by following these steps: {}",
                    steps.join(", ")
                );

                let mut actions: Vec<String> = Vec::new();
                for recommendation in result
                    .tools_output
                    .values()
                    .flat_map(ToolOutput::recommendations)
                {
                    if !actions.contains(recommendation) {
                        actions.push(recommendation.clone());
                    }
                }

                (answer, reasoning, actions)
            }
        };

        if actions.is_empty() {
            actions.push(NO_ACTIONS.to_string());
        }

        Response {
            answer,
            reasoning,
            actions,
        }
    }

    /// Handle one user query end to end.
    pub async fn process_query(&mut self, query: &str) -> Response {
        self.memory.push(Role::User, query);

        let plan = self.plan(query);
        info!(
            query_chars = query.len(),
            steps = ?plan.iter().map(Step::as_str).collect::<Vec<_>>(),
            "Processing query"
        );

        let result = self.execute(&plan, query);
        let response = self.formulate_response(&result, query).await;

        self.memory.push(Role::Assistant, response.answer.as_str());
        debug!(
            memory_len = self.memory.len(),
            actions = response.actions.len(),
            "Query processed"
        );

        response
    }
}

/// Copy the chain's classification, gathered data and recommendations into
/// the tool output map.
fn merge_chain_output(tools_output: &mut BTreeMap<String, ToolOutput>, chain: &ChainOutput) {
    tools_output.insert(
        Step::ClassifyQuery.as_str().to_string(),
        ToolOutput::Classification(chain.classification.clone()),
    );
    tools_output.extend(
        chain
            .data
            .iter()
            .map(|(key, output)| (key.clone(), output.clone())),
    );
    tools_output.insert(
        "recommendations".to_string(),
        ToolOutput::Recommendations(RecommendationSet {
            timestamp: chain.timestamp,
            recommendations: chain.recommendations.clone(),
        }),
    );
}

/// Serialize prompt context, degrading to an empty object.
fn to_context<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize prompt context");
        "{}".to_string()
    })
}
