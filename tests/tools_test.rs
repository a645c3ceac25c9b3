//! Network tools integration tests
//!
//! Covers the record shapes produced by the seeded mock telemetry and the
//! knowledge-base operations exposed to the agent.

use pretty_assertions::assert_eq;
use serde_json::Value;

use network_ai_assistant::config::{AnomalyDetectionConfig, NetworkToolsConfig, Sensitivity};
use network_ai_assistant::telemetry::HealthStatus;
use network_ai_assistant::tools::{NetworkTools, QueryCategory, ToolOutput};

fn seeded_tools(seed: u64) -> NetworkTools {
    NetworkTools::seeded(&NetworkToolsConfig::default(), seed)
}

fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .expect("record should serialize to an object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod telemetry_shape_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_shapes_are_stable_across_seeds() {
        for seed in 0..20 {
            let tools = seeded_tools(seed);

            let traffic = serde_json::to_value(tools.analyze_traffic()).unwrap();
            assert_eq!(
                keys(&traffic),
                vec![
                    "timestamp",
                    "top_protocols",
                    "total_bandwidth_mbps",
                    "total_traffic",
                    "unusual_patterns"
                ]
            );

            let anomalies = serde_json::to_value(tools.detect_anomalies()).unwrap();
            assert_eq!(
                keys(&anomalies),
                vec![
                    "anomalies",
                    "anomalies_detected",
                    "recommendations",
                    "timestamp"
                ]
            );

            let health = serde_json::to_value(tools.check_health()).unwrap();
            assert_eq!(
                keys(&health),
                vec!["components", "overall_status", "recommendations", "timestamp"]
            );

            let failures = serde_json::to_value(tools.predict_failures()).unwrap();
            assert_eq!(
                keys(&failures),
                vec!["predictions", "recommendations", "timestamp"]
            );
        }
    }

    #[test]
    fn test_values_in_bounds() {
        for seed in 0..50 {
            let tools = seeded_tools(seed);

            let traffic = tools.analyze_traffic();
            assert!((100..=1000).contains(&traffic.total_bandwidth_mbps));
            assert_eq!(
                traffic.total_traffic,
                format!("{} Mbps", traffic.total_bandwidth_mbps)
            );

            for anomaly in tools.detect_anomalies().anomalies {
                assert!((0.5..=0.95).contains(&anomaly.confidence));
            }

            let health = tools.check_health();
            let any_warning = health
                .components
                .iter()
                .any(|c| c.status == HealthStatus::Warning);
            assert_eq!(health.overall_status == HealthStatus::Warning, any_warning);

            for prediction in tools.predict_failures().predictions {
                assert!((0.6..=0.9).contains(&prediction.probability));
            }
        }
    }

    #[test]
    fn test_low_sensitivity_quiets_connection_patterns() {
        let config = NetworkToolsConfig {
            knowledge_base_path: None,
            anomaly_detection: AnomalyDetectionConfig {
                sensitivity: Sensitivity::Low,
                threshold: 0.7,
            },
        };
        let tools = NetworkTools::seeded(&config, 42);
        let mut spikes = 0;
        let mut patterns = 0;
        for _ in 0..400 {
            for anomaly in tools.detect_anomalies().anomalies {
                match anomaly.kind.as_str() {
                    "traffic spike" => spikes += 1,
                    _ => patterns += 1,
                }
            }
        }
        assert!(spikes > patterns, "spikes {} patterns {}", spikes, patterns);
    }
}

#[cfg(test)]
mod knowledge_tool_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_dns() {
        let search = seeded_tools(1).search_knowledge_base("dns");
        assert_eq!(search.results.len(), 1);
        assert_eq!(search.results[0].issue, "dns resolution failure");
        assert_eq!(search.results[0].solutions.len(), 5);
    }

    #[test]
    fn test_diagnose_unknown_symptoms() {
        let diagnosis = seeded_tools(1).diagnose_issue("the coffee machine is broken");
        assert!(diagnosis.possible_issues.is_empty());
        assert_eq!(diagnosis.recommendations.len(), 2);
    }

    #[test]
    fn test_classification_scores_sum_to_one() {
        let tools = seeded_tools(1);
        for query in [
            "",
            "fix the error",
            "monitor and track the status",
            "upgrade and install the new firmware",
            "configure the monitor to fix the issue and update it",
        ] {
            let classification = tools.classify_query(query);
            let sum: f64 = classification.categories.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{}: {}", query, sum);
            let max = classification
                .categories
                .values()
                .cloned()
                .fold(f64::MIN, f64::max);
            assert_eq!(classification.categories[&classification.top_category], max);
        }
    }

    #[test]
    fn test_classification_category_names() {
        let classification = seeded_tools(1).classify_query("how do I configure vlans");
        assert_eq!(classification.top_category, QueryCategory::Configuration);
        let json = serde_json::to_value(ToolOutput::Classification(classification)).unwrap();
        assert_eq!(json["top_category"], "configuration");
    }

    #[test]
    fn test_maintenance_recommendations_match_tasks() {
        for seed in 0..10 {
            let plan = seeded_tools(seed).suggest_maintenance();
            assert_eq!(plan.recommendations.len(), plan.maintenance_tasks.len());
            let ranks: Vec<u8> = plan
                .maintenance_tasks
                .iter()
                .map(|t| t.priority.rank())
                .collect();
            let mut sorted = ranks.clone();
            sorted.sort();
            assert_eq!(ranks, sorted);
        }
    }
}
