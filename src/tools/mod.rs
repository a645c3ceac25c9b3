//! Network tools used by the agent.
//!
//! [`NetworkTools`] bundles the static knowledge base with a
//! [`TelemetrySource`]. Live-data operations delegate to the telemetry
//! capability; knowledge operations are pure lookups. Every operation returns
//! a record stamped with the current time and never fails.

mod classify;
mod diagnosis;
mod report;

pub use classify::*;
pub use diagnosis::*;
pub use report::*;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::config::NetworkToolsConfig;
use crate::knowledge::{load_knowledge_base, KnowledgeEntry};
use crate::telemetry::{
    AnomalyReport, FailureForecast, HealthReport, MockTelemetry, TelemetrySource,
    TrafficAnalysis,
};

/// Facade over the knowledge base and the telemetry capability.
pub struct NetworkTools {
    knowledge_base: Arc<[KnowledgeEntry]>,
    telemetry: Arc<dyn TelemetrySource>,
    /// Drives the probabilistic routine maintenance tasks.
    routine_rng: Mutex<StdRng>,
}

impl NetworkTools {
    /// Create tools from configuration, using mock telemetry.
    pub fn new(config: &NetworkToolsConfig) -> Self {
        let entries = load_knowledge_base(config.knowledge_base_path.as_deref());
        let telemetry = Arc::new(MockTelemetry::new(config.anomaly_detection.clone()));
        let tools = Self::with_telemetry(entries, telemetry);
        info!(
            entries = tools.knowledge_base.len(),
            sensitivity = %config.anomaly_detection.sensitivity,
            "NetworkTools initialized"
        );
        tools
    }

    /// Create reproducible tools: mock telemetry and routine tasks share `seed`.
    pub fn seeded(config: &NetworkToolsConfig, seed: u64) -> Self {
        let entries = load_knowledge_base(config.knowledge_base_path.as_deref());
        let telemetry = Arc::new(MockTelemetry::with_seed(
            seed,
            config.anomaly_detection.clone(),
        ));
        Self::with_telemetry(entries, telemetry).with_seed(seed)
    }

    /// Create tools over explicit entries and a telemetry backend.
    pub fn with_telemetry(
        knowledge_base: Vec<KnowledgeEntry>,
        telemetry: Arc<dyn TelemetrySource>,
    ) -> Self {
        Self {
            knowledge_base: knowledge_base.into(),
            telemetry,
            routine_rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reseed the routine maintenance sampler
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            routine_rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// The loaded knowledge base entries
    pub fn knowledge_base(&self) -> &[KnowledgeEntry] {
        &self.knowledge_base
    }

    /// Summarize traffic volume and protocol mix.
    pub fn analyze_traffic(&self) -> TrafficAnalysis {
        self.telemetry.analyze_traffic()
    }

    /// Scan traffic for anomalies.
    pub fn detect_anomalies(&self) -> AnomalyReport {
        self.telemetry.detect_anomalies()
    }

    /// Check component health.
    pub fn check_health(&self) -> HealthReport {
        self.telemetry.check_health()
    }

    /// Forecast component failures.
    pub fn predict_failures(&self) -> FailureForecast {
        self.telemetry.predict_failures()
    }

    fn routine_rng(&self) -> MutexGuard<'_, StdRng> {
        self.routine_rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Output of any tool, as stored in plan results.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Traffic(TrafficAnalysis),
    Anomalies(AnomalyReport),
    Health(HealthReport),
    Failures(FailureForecast),
    Diagnosis(Diagnosis),
    Search(KnowledgeSearch),
    Solutions(SolutionSuggestions),
    Report(NetworkReport),
    Maintenance(MaintenancePlan),
    Classification(Classification),
    Recommendations(RecommendationSet),
}

/// A bare list of recommendations with its timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSet {
    pub timestamp: DateTime<Utc>,
    pub recommendations: Vec<String>,
}

impl ToolOutput {
    /// Recommendations carried by the record; empty when it has none.
    pub fn recommendations(&self) -> &[String] {
        match self {
            ToolOutput::Traffic(_) => &[],
            ToolOutput::Anomalies(r) => &r.recommendations,
            ToolOutput::Health(r) => &r.recommendations,
            ToolOutput::Failures(r) => &r.recommendations,
            ToolOutput::Diagnosis(r) => &r.recommendations,
            ToolOutput::Search(r) => &r.recommendations,
            ToolOutput::Solutions(r) => &r.recommendations,
            ToolOutput::Report(r) => &r.recommendations,
            ToolOutput::Maintenance(r) => &r.recommendations,
            ToolOutput::Classification(r) => &r.recommendations,
            ToolOutput::Recommendations(r) => &r.recommendations,
        }
    }
}
