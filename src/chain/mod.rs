//! Multi-step analysis chain for complex queries.
//!
//! The chain runs four stages over the network tools:
//! 1. classify the query;
//! 2. gather data with the tools relevant to the category;
//! 3. analyze the data into a summary, potential causes and a severity;
//! 4. derive recommendations from the analysis.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::telemetry::{
    AnomalyKind, AnomalyReport, AnomalySeverity, FailureForecast, HealthReport, TrafficAnalysis,
};
use crate::tools::{
    Classification, Diagnosis, KnowledgeSearch, NetworkTools, QueryCategory, ToolOutput,
};

/// Severity assigned by the analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSeverity {
    Unknown,
    Low,
    Medium,
    High,
}

/// Result of the analysis stage.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub summary: String,
    pub potential_causes: Vec<String>,
    pub severity: AnalysisSeverity,
}

/// Full output of a chain run.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOutput {
    pub query: String,
    pub classification: Classification,
    /// Gathered tool outputs keyed by data name
    pub data: BTreeMap<String, ToolOutput>,
    pub analysis: Analysis,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Tool outputs gathered for one category.
#[derive(Debug, Default)]
struct GatheredData {
    diagnosis: Option<Diagnosis>,
    knowledge_base: Option<KnowledgeSearch>,
    traffic: Option<TrafficAnalysis>,
    anomalies: Option<AnomalyReport>,
    health: Option<HealthReport>,
    predictions: Option<FailureForecast>,
}

impl GatheredData {
    fn into_map(self) -> BTreeMap<String, ToolOutput> {
        let mut map = BTreeMap::new();
        if let Some(d) = self.diagnosis {
            map.insert("diagnosis".to_string(), ToolOutput::Diagnosis(d));
        }
        if let Some(k) = self.knowledge_base {
            map.insert("knowledge_base".to_string(), ToolOutput::Search(k));
        }
        if let Some(t) = self.traffic {
            map.insert("traffic".to_string(), ToolOutput::Traffic(t));
        }
        if let Some(a) = self.anomalies {
            map.insert("anomalies".to_string(), ToolOutput::Anomalies(a));
        }
        if let Some(h) = self.health {
            map.insert("health".to_string(), ToolOutput::Health(h));
        }
        if let Some(p) = self.predictions {
            map.insert("predictions".to_string(), ToolOutput::Failures(p));
        }
        map
    }
}

/// Classify → gather → analyze → recommend pipeline.
pub struct NetworkAnalysisChain {
    tools: Arc<NetworkTools>,
}

impl NetworkAnalysisChain {
    /// Create a chain over shared tools
    pub fn new(tools: Arc<NetworkTools>) -> Self {
        Self { tools }
    }

    /// Run the full chain on a query.
    pub fn run(&self, query: &str) -> ChainOutput {
        info!(query_chars = query.len(), "Running network analysis chain");

        let classification = self.tools.classify_query(query);
        let category = classification.top_category;
        debug!(category = %category, "Query classified");

        let data = self.gather_data(query, category);
        debug!(category = %category, "Data gathered");

        let analysis = self.analyze_data(&data, category);
        debug!(severity = ?analysis.severity, "Data analyzed");

        let recommendations = generate_recommendations(query, &analysis, category);

        ChainOutput {
            query: query.to_string(),
            classification,
            data: data.into_map(),
            analysis,
            recommendations,
            timestamp: Utc::now(),
        }
    }

    fn gather_data(&self, query: &str, category: QueryCategory) -> GatheredData {
        let tools = &self.tools;
        match category {
            QueryCategory::Troubleshooting => GatheredData {
                diagnosis: Some(tools.diagnose_issue(query)),
                knowledge_base: Some(tools.search_knowledge_base(query)),
                ..GatheredData::default()
            },
            QueryCategory::Monitoring => GatheredData {
                traffic: Some(tools.analyze_traffic()),
                anomalies: Some(tools.detect_anomalies()),
                ..GatheredData::default()
            },
            QueryCategory::Maintenance => GatheredData {
                health: Some(tools.check_health()),
                predictions: Some(tools.predict_failures()),
                ..GatheredData::default()
            },
            QueryCategory::Configuration => GatheredData {
                knowledge_base: Some(tools.search_knowledge_base(query)),
                ..GatheredData::default()
            },
            QueryCategory::General => GatheredData {
                traffic: Some(tools.analyze_traffic()),
                health: Some(tools.check_health()),
                knowledge_base: Some(tools.search_knowledge_base(query)),
                ..GatheredData::default()
            },
        }
    }

    fn analyze_data(&self, data: &GatheredData, category: QueryCategory) -> Analysis {
        match category {
            QueryCategory::Troubleshooting => self.analyze_diagnosis(data.diagnosis.as_ref()),
            QueryCategory::Monitoring => analyze_anomalies(data.anomalies.as_ref()),
            QueryCategory::Maintenance => {
                analyze_health(data.health.as_ref(), data.predictions.as_ref())
            }
            QueryCategory::Configuration | QueryCategory::General => Analysis {
                summary: "General network status appears normal with no critical issues detected."
                    .to_string(),
                potential_causes: Vec::new(),
                severity: AnalysisSeverity::Low,
            },
        }
    }

    fn analyze_diagnosis(&self, diagnosis: Option<&Diagnosis>) -> Analysis {
        let Some(top) = diagnosis.and_then(|d| d.possible_issues.first()) else {
            return Analysis {
                summary: "No known issue matches the description.".to_string(),
                potential_causes: Vec::new(),
                severity: AnalysisSeverity::Unknown,
            };
        };

        let potential_causes = self
            .tools
            .knowledge_base()
            .iter()
            .find(|entry| entry.issue == top.issue)
            .map(|entry| entry.causes.clone())
            .unwrap_or_default();

        let severity = if top.confidence > 0.8 {
            AnalysisSeverity::High
        } else if top.confidence > 0.5 {
            AnalysisSeverity::Medium
        } else {
            AnalysisSeverity::Low
        };

        Analysis {
            summary: format!(
                "The issue appears to be related to {} with {:.0}% confidence.",
                top.issue,
                top.confidence * 100.0
            ),
            potential_causes,
            severity,
        }
    }
}

fn analyze_anomalies(report: Option<&AnomalyReport>) -> Analysis {
    let anomalies = match report {
        Some(r) if r.anomalies_detected && !r.anomalies.is_empty() => &r.anomalies,
        _ => {
            return Analysis {
                summary: "No significant anomalies detected in network traffic.".to_string(),
                potential_causes: Vec::new(),
                severity: AnalysisSeverity::Low,
            }
        }
    };

    let potential_causes = anomalies
        .iter()
        .map(|a| match a.kind {
            AnomalyKind::TrafficSpike => "Possible DDoS attack or traffic surge".to_string(),
            AnomalyKind::NewConnectionPattern => {
                "Potential unauthorized access attempt".to_string()
            }
        })
        .collect();

    let severity = match anomalies.iter().map(|a| a.severity).max() {
        Some(AnomalySeverity::High) => AnalysisSeverity::High,
        Some(AnomalySeverity::Medium) => AnalysisSeverity::Medium,
        _ => AnalysisSeverity::Low,
    };

    Analysis {
        summary: format!(
            "Detected {} anomalies in network traffic that require attention.",
            anomalies.len()
        ),
        potential_causes,
        severity,
    }
}

fn analyze_health(health: Option<&HealthReport>, forecast: Option<&FailureForecast>) -> Analysis {
    let Some(health) = health else {
        return Analysis {
            summary: "Component health data is unavailable.".to_string(),
            potential_causes: Vec::new(),
            severity: AnalysisSeverity::Unknown,
        };
    };

    let mut potential_causes: Vec<String> = health
        .unhealthy_components()
        .map(|c| format!("{} showing warning signs", c.name))
        .collect();
    let warnings = potential_causes.len();

    let predictions = forecast.map(|f| f.predictions.as_slice()).unwrap_or(&[]);
    potential_causes.extend(predictions.iter().map(|p| {
        format!(
            "{} at risk of failure within {}",
            p.component, p.estimated_time
        )
    }));

    let severity = if !predictions.is_empty() {
        AnalysisSeverity::High
    } else if warnings > 0 {
        AnalysisSeverity::Medium
    } else {
        AnalysisSeverity::Low
    };

    let summary = if warnings > 0 {
        format!(
            "{} out of {} components showing warning status.",
            warnings,
            health.components.len()
        )
    } else {
        "All network components appear to be healthy.".to_string()
    };

    Analysis {
        summary,
        potential_causes,
        severity,
    }
}

fn generate_recommendations(
    query: &str,
    analysis: &Analysis,
    category: QueryCategory,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();
    let query = query.to_lowercase();
    let causes = &analysis.potential_causes;
    let any_cause = |needle: &str| causes.iter().any(|c| c.to_lowercase().contains(needle));

    match analysis.severity {
        AnalysisSeverity::High => recommendations
            .push("Immediate attention required to address the identified issues".to_string()),
        AnalysisSeverity::Medium => {
            recommendations.push("Schedule maintenance within the next 24-48 hours".to_string())
        }
        AnalysisSeverity::Low => recommendations
            .push("Monitor the situation as part of regular maintenance".to_string()),
        AnalysisSeverity::Unknown => {}
    }

    let specific: &[&str] = match category {
        QueryCategory::Troubleshooting if query.contains("latency") || any_cause("latency") => &[
            "Check for bandwidth-intensive applications",
            "Implement QoS (Quality of Service) policies",
            "Optimize routing tables",
        ],
        QueryCategory::Troubleshooting
            if query.contains("packet loss") || any_cause("packet loss") =>
        {
            &[
                "Check physical connections",
                "Replace faulty hardware",
                "Reduce network congestion",
            ]
        }
        QueryCategory::Monitoring if any_cause("ddos") => &[
            "Implement rate limiting",
            "Configure firewall rules to block attack sources",
            "Consider a DDoS protection service",
        ],
        QueryCategory::Monitoring if any_cause("unauthorized") => &[
            "Review access control lists",
            "Check for compromised credentials",
            "Enable additional logging for suspicious activities",
        ],
        QueryCategory::Maintenance => &[
            "Perform regular firmware updates on all network devices",
            "Schedule comprehensive network testing during off-hours",
            "Document all maintenance activities and outcomes",
        ],
        _ => &[],
    };
    recommendations.extend(specific.iter().map(|s| s.to_string()));

    if recommendations.is_empty() {
        recommendations = vec![
            "Conduct a thorough network assessment".to_string(),
            "Review network documentation and configurations".to_string(),
            "Consider consulting with a network specialist for further analysis".to_string(),
        ];
    }

    recommendations
}
