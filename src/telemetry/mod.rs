//! Live network data capability.
//!
//! [`TelemetrySource`] is the seam between the tool layer and whatever
//! produces traffic, anomaly, health and failure data. [`MockTelemetry`]
//! synthesizes plausible values from a random source; a monitoring-system
//! backend can implement the same trait without touching the agent.

mod mock;

pub use mock::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Producer of live network observations.
pub trait TelemetrySource: Send + Sync {
    /// Summarize current traffic volume and protocol mix.
    fn analyze_traffic(&self) -> TrafficAnalysis;
    /// Look for traffic anomalies.
    fn detect_anomalies(&self) -> AnomalyReport;
    /// Report per-component health.
    fn check_health(&self) -> HealthReport;
    /// Forecast component failures.
    fn predict_failures(&self) -> FailureForecast;
}

/// Traffic volume and protocol breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficAnalysis {
    pub timestamp: DateTime<Utc>,
    pub total_bandwidth_mbps: u32,
    /// Display form of the bandwidth, e.g. "512 Mbps"
    pub total_traffic: String,
    pub top_protocols: Vec<ProtocolShare>,
    pub unusual_patterns: bool,
}

/// Share of traffic carried by one protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolShare {
    pub protocol: String,
    pub percentage: u32,
}

/// Outcome of an anomaly scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub timestamp: DateTime<Utc>,
    pub anomalies_detected: bool,
    pub anomalies: Vec<Anomaly>,
    pub recommendations: Vec<String>,
}

/// A single detected anomaly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    pub confidence: f64,
    pub details: String,
}

/// Kinds of anomaly the scanner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    #[serde(rename = "traffic spike")]
    TrafficSpike,
    #[serde(rename = "new connection pattern")]
    NewConnectionPattern,
}

/// Anomaly severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

/// Health of the monitored components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub overall_status: HealthStatus,
    pub components: Vec<ComponentHealth>,
    pub recommendations: Vec<String>,
}

/// Status of one network component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
}

/// Component or overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
}

/// Predicted component failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureForecast {
    pub timestamp: DateTime<Utc>,
    pub predictions: Vec<FailurePrediction>,
    pub recommendations: Vec<String>,
}

/// A forecast failure of one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailurePrediction {
    pub component: String,
    pub probability: f64,
    pub estimated_time: String,
    pub indicators: Vec<String>,
}

impl AnomalyKind {
    /// Get the anomaly kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::TrafficSpike => "traffic spike",
            AnomalyKind::NewConnectionPattern => "new connection pattern",
        }
    }
}

impl AnomalySeverity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Low => "low",
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
        }
    }
}

impl HealthStatus {
    /// Whether the status needs attention
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
        }
    }
}

impl HealthReport {
    /// Components whose status is not healthy.
    pub fn unhealthy_components(&self) -> impl Iterator<Item = &ComponentHealth> {
        self.components.iter().filter(|c| !c.status.is_healthy())
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
