use serde::{Deserialize, Serialize};

/// Word count above which a query counts as complex.
const COMPLEX_QUERY_WORDS: usize = 10;

/// A single step of an agent plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Summarize traffic volume and protocol mix.
    AnalyzeNetworkTraffic,
    /// Scan traffic for anomalies.
    DetectAnomalies,
    /// Compile a traffic, health and anomaly report.
    GenerateReport,
    /// Check component health.
    CheckNetworkHealth,
    /// Forecast component failures.
    PredictFailures,
    /// Propose maintenance tasks.
    SuggestMaintenance,
    /// Match the query against known symptoms.
    DiagnoseIssue,
    /// Look the query up in the knowledge base.
    SearchKnowledgeBase,
    /// Collect remediation steps for the diagnosed issues.
    SuggestSolutions,
    /// Categorize the query.
    ClassifyQuery,
    /// Placeholder for narration; executes nothing.
    GenerateResponse,
    /// Run the multi-step analysis chain.
    UseAnalysisChain,
}

impl Step {
    /// Get the step name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::AnalyzeNetworkTraffic => "analyze_network_traffic",
            Step::DetectAnomalies => "detect_anomalies",
            Step::GenerateReport => "generate_report",
            Step::CheckNetworkHealth => "check_network_health",
            Step::PredictFailures => "predict_failures",
            Step::SuggestMaintenance => "suggest_maintenance",
            Step::DiagnoseIssue => "diagnose_issue",
            Step::SearchKnowledgeBase => "search_knowledge_base",
            Step::SuggestSolutions => "suggest_solutions",
            Step::ClassifyQuery => "classify_query",
            Step::GenerateResponse => "generate_response",
            Step::UseAnalysisChain => "use_analysis_chain",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analyze_network_traffic" => Ok(Step::AnalyzeNetworkTraffic),
            "detect_anomalies" => Ok(Step::DetectAnomalies),
            "generate_report" => Ok(Step::GenerateReport),
            "check_network_health" => Ok(Step::CheckNetworkHealth),
            "predict_failures" => Ok(Step::PredictFailures),
            "suggest_maintenance" => Ok(Step::SuggestMaintenance),
            "diagnose_issue" => Ok(Step::DiagnoseIssue),
            "search_knowledge_base" => Ok(Step::SearchKnowledgeBase),
            "suggest_solutions" => Ok(Step::SuggestSolutions),
            "classify_query" => Ok(Step::ClassifyQuery),
            "generate_response" => Ok(Step::GenerateResponse),
            "use_analysis_chain" => Ok(Step::UseAnalysisChain),
            _ => Err(format!("Unknown step: {}", s)),
        }
    }
}

/// Ordered steps chosen for one query.
pub type Plan = Vec<Step>;

/// Choose the steps for a query by keyword rules, first match wins.
///
/// `use_advanced_chain` must only be true when an analysis chain is
/// available to run [`Step::UseAnalysisChain`].
pub fn plan_for(query: &str, use_advanced_chain: bool) -> Plan {
    let query_lower = query.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| query_lower.contains(w));

    if use_advanced_chain
        && (query.split_whitespace().count() > COMPLEX_QUERY_WORDS || query.contains('?'))
    {
        return vec![Step::UseAnalysisChain];
    }

    if mentions(&["anomaly", "unusual"]) {
        return vec![
            Step::AnalyzeNetworkTraffic,
            Step::DetectAnomalies,
            Step::GenerateReport,
        ];
    }

    if mentions(&["maintenance", "prevent"]) {
        return vec![
            Step::CheckNetworkHealth,
            Step::PredictFailures,
            Step::SuggestMaintenance,
        ];
    }

    if mentions(&["troubleshoot", "problem", "issue"]) {
        return vec![
            Step::DiagnoseIssue,
            Step::SearchKnowledgeBase,
            Step::SuggestSolutions,
        ];
    }

    vec![
        Step::ClassifyQuery,
        Step::SearchKnowledgeBase,
        Step::GenerateResponse,
    ]
}
