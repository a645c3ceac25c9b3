//! Integration tests for the network agent
//!
//! Exercises the plan → execute → respond pipeline end to end with a fixed
//! telemetry backend and a mocked narration model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use pretty_assertions::assert_eq;

use network_ai_assistant::agent::{plan_for, NetworkAgent, Role, Step, NO_ACTIONS};
use network_ai_assistant::config::{AgentConfig, Config, NetworkToolsConfig};
use network_ai_assistant::error::ModelResult;
use network_ai_assistant::knowledge::default_entries;
use network_ai_assistant::model::{ModelManager, TextGenerator};
use network_ai_assistant::telemetry::{
    AnomalyReport, ComponentHealth, FailureForecast, HealthReport, HealthStatus, ProtocolShare,
    TelemetrySource, TrafficAnalysis,
};
use network_ai_assistant::tools::NetworkTools;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        async fn generate_text(&self, prompt: &str) -> ModelResult<String>;
    }
}

/// Telemetry for a quiet, fully healthy network
struct QuietNetwork;

impl TelemetrySource for QuietNetwork {
    fn analyze_traffic(&self) -> TrafficAnalysis {
        TrafficAnalysis {
            timestamp: Utc::now(),
            total_bandwidth_mbps: 200,
            total_traffic: "200 Mbps".to_string(),
            top_protocols: vec![ProtocolShare {
                protocol: "HTTP/HTTPS".to_string(),
                percentage: 50,
            }],
            unusual_patterns: false,
        }
    }

    fn detect_anomalies(&self) -> AnomalyReport {
        AnomalyReport {
            timestamp: Utc::now(),
            anomalies_detected: false,
            anomalies: vec![],
            recommendations: vec![],
        }
    }

    fn check_health(&self) -> HealthReport {
        HealthReport {
            timestamp: Utc::now(),
            overall_status: HealthStatus::Healthy,
            components: vec![ComponentHealth {
                name: "Core Router".to_string(),
                status: HealthStatus::Healthy,
            }],
            recommendations: vec![],
        }
    }

    fn predict_failures(&self) -> FailureForecast {
        FailureForecast {
            timestamp: Utc::now(),
            predictions: vec![],
            recommendations: vec![],
        }
    }
}

fn quiet_tools() -> Arc<NetworkTools> {
    Arc::new(NetworkTools::with_telemetry(default_entries(), Arc::new(QuietNetwork)).with_seed(3))
}

fn create_test_agent(memory_limit: usize, use_advanced_chain: bool) -> NetworkAgent {
    NetworkAgent::with_parts(
        quiet_tools(),
        ModelManager::mock("distilgpt2"),
        AgentConfig {
            memory_limit,
            use_advanced_chain,
        },
    )
}

#[cfg(test)]
mod plan_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anomaly_plan_any_case() {
        for query in ["anomaly", "Show me any ANOMALY", "AnOmAlY in vlan 10"] {
            assert_eq!(
                plan_for(query, false),
                vec![
                    Step::AnalyzeNetworkTraffic,
                    Step::DetectAnomalies,
                    Step::GenerateReport
                ]
            );
        }
        // Short and no question mark: chain mode does not apply
        assert_eq!(plan_for("anomaly report", true)[0], Step::AnalyzeNetworkTraffic);
    }

    #[test]
    fn test_chain_plan_for_complex_queries() {
        let long = "please look at the anomaly we saw on the core router last night";
        assert!(long.split_whitespace().count() >= 11);
        assert_eq!(plan_for(long, true), vec![Step::UseAnalysisChain]);
        assert_eq!(plan_for("maintenance?", true), vec![Step::UseAnalysisChain]);
    }

    #[test]
    fn test_agent_plan_respects_chain_availability() {
        assert_eq!(
            create_test_agent(2, true).plan("is the core ok?"),
            vec![Step::UseAnalysisChain]
        );
        assert_eq!(
            create_test_agent(2, false).plan("is the core ok?")[0],
            Step::ClassifyQuery
        );
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_high_latency_scenario() {
        let mut agent = create_test_agent(10, false);
        let query = "We have high latency issues on our network";

        assert_eq!(
            agent.plan(query),
            vec![
                Step::DiagnoseIssue,
                Step::SearchKnowledgeBase,
                Step::SuggestSolutions
            ]
        );

        let diagnosis = agent.tools().diagnose_issue(query);
        assert_eq!(diagnosis.possible_issues[0].issue, "high latency");

        let response = agent.process_query(query).await;
        assert!(response.answer.contains(query));
        assert_eq!(
            response.reasoning,
            "I analyzed your query by following these steps: diagnose_issue, search_knowledge_base, suggest_solutions"
        );
        assert!(response
            .actions
            .contains(&"Implement QoS (Quality of Service) policies".to_string()));
        assert_eq!(agent.memory().len(), 2);
    }

    #[tokio::test]
    async fn test_quiet_network_anomaly_query() {
        let mut agent = create_test_agent(10, false);
        let response = agent.process_query("any unusual traffic").await;

        assert_eq!(
            response.actions,
            vec!["Continue regular monitoring".to_string()]
        );
    }

    #[tokio::test]
    async fn test_chain_on_quiet_network() {
        let mut agent = create_test_agent(10, true);
        let response = agent
            .process_query("can you monitor the backbone for me?")
            .await;

        assert_eq!(
            response.reasoning,
            "I analyzed your query using our network analysis chain. No significant anomalies detected in network traffic."
        );
        assert_eq!(
            response.actions,
            vec!["Monitor the situation as part of regular maintenance".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_query_default_plan() {
        let mut agent = create_test_agent(10, true);
        let response = agent.process_query("").await;

        assert_eq!(
            response.reasoning,
            "I analyzed your query by following these steps: classify_query, search_knowledge_base, generate_response"
        );
        assert_eq!(
            response.actions,
            vec!["Provide more specific details about your network issue".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_recommendations_fallback() {
        let agent = create_test_agent(10, false);
        let result = agent.execute(&[Step::AnalyzeNetworkTraffic], "traffic");
        let response = agent.formulate_response(&result, "traffic").await;

        assert_eq!(response.actions, vec![NO_ACTIONS.to_string()]);
    }

    #[tokio::test]
    async fn test_agent_from_default_config() {
        let mut agent = NetworkAgent::new(&Config::default()).unwrap();
        assert_eq!(agent.tools().knowledge_base().len(), 3);
        assert_eq!(agent.model().model_info().backend, "mock");

        let response = agent.process_query("check status").await;
        assert!(response.answer.starts_with("This is a mock response to:"));
        assert!(!response.actions.is_empty());
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_agent_exposes_its_config() {
        let agent = create_test_agent(4, true);
        assert_eq!(agent.config().memory_limit, 4);
        assert!(agent.config().use_advanced_chain);

        let plain = create_test_agent(1, false);
        assert!(!plain.config().use_advanced_chain);
    }

    #[tokio::test]
    async fn test_memory_never_exceeds_twice_limit() {
        let k = 2;
        let mut agent = create_test_agent(k, false);

        for i in 0..(2 * k + 1) {
            agent.process_query(&format!("query number {}", i)).await;
            assert!(agent.memory().len() <= 2 * k);
        }

        assert_eq!(agent.memory().len(), 2 * k);
        let last = agent.memory().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        let first = agent.memory().turns().next().unwrap();
        assert_eq!(first.content, "query number 3");
    }

    #[tokio::test]
    async fn test_turns_alternate() {
        let mut agent = create_test_agent(5, false);
        agent.process_query("one").await;
        agent.process_query("two").await;

        let roles: Vec<Role> = agent.memory().turns().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }
}

#[cfg(test)]
mod narration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_model_called_once_per_query() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate_text()
            .withf(|prompt| prompt.starts_with("Query: troubleshoot dns lookup failed"))
            .times(1)
            .returning(|_| Ok("Your resolver is unreachable.".to_string()));

        let model =
            ModelManager::with_backend("test-model", Arc::new(generator), Duration::from_secs(5));
        let mut agent = NetworkAgent::with_parts(
            quiet_tools(),
            model,
            AgentConfig {
                memory_limit: 10,
                use_advanced_chain: false,
            },
        );

        let response = agent.process_query("troubleshoot dns lookup failed").await;

        assert_eq!(response.answer, "Your resolver is unreachable.");
        assert!(response
            .actions
            .contains(&"Flush DNS cache".to_string()));
        assert_eq!(
            agent.memory().last().unwrap().content,
            "Your resolver is unreachable."
        );
    }

    #[tokio::test]
    async fn test_model_failure_uses_fallback_answer() {
        let mut generator = MockGenerator::new();
        generator.expect_generate_text().times(1).returning(|_| {
            Err(network_ai_assistant::error::ModelError::Timeout { timeout_ms: 10 })
        });

        let model =
            ModelManager::with_backend("test-model", Arc::new(generator), Duration::from_secs(5));
        let agent = NetworkAgent::with_parts(
            quiet_tools(),
            model,
            AgentConfig {
                memory_limit: 10,
                use_advanced_chain: false,
            },
        );

        let result = agent.execute(&agent.plan("hello"), "hello");
        let response = agent.formulate_response(&result, "hello").await;
        assert!(response
            .answer
            .starts_with("Error generating response for: Query: hello"));
    }

    #[test]
    fn test_seeded_tools_are_reproducible() {
        let config = NetworkToolsConfig::default();
        let a = NetworkTools::seeded(&config, 11);
        let b = NetworkTools::seeded(&config, 11);
        assert_eq!(
            a.analyze_traffic().total_bandwidth_mbps,
            b.analyze_traffic().total_bandwidth_mbps
        );
        assert_eq!(
            a.suggest_maintenance().maintenance_tasks.len(),
            b.suggest_maintenance().maintenance_tasks.len()
        );
    }
}
