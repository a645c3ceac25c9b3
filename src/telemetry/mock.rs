use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{
    Anomaly, AnomalyKind, AnomalyReport, AnomalySeverity, ComponentHealth, FailureForecast,
    FailurePrediction, HealthReport, HealthStatus, ProtocolShare, TelemetrySource,
    TrafficAnalysis,
};
use crate::config::{AnomalyDetectionConfig, Sensitivity};

/// Monitored components and the probability each reports healthy.
const COMPONENTS: [(&str, f64); 4] = [
    ("Core Router", 0.75),
    ("Edge Switches", 0.75),
    ("Firewall", 1.0),
    ("DNS Server", 0.75),
];

/// Protocols in the traffic breakdown with their percentage ranges.
const PROTOCOLS: [(&str, u32, u32); 3] = [("HTTP/HTTPS", 40, 60), ("DNS", 5, 15), ("SMTP", 5, 10)];

const SEVERITIES: [AnomalySeverity; 3] = [
    AnomalySeverity::Low,
    AnomalySeverity::Medium,
    AnomalySeverity::High,
];

const FAILURE_PROBABILITY: f64 = 0.3;

/// Anomaly thresholds `(traffic_spike, connection_pattern)` for a detector config.
///
/// An anomaly fires when a uniform draw in `[0, 1)` exceeds its threshold.
pub fn anomaly_thresholds(config: &AnomalyDetectionConfig) -> (f64, f64) {
    match config.sensitivity {
        Sensitivity::Low => (0.3, 0.8),
        Sensitivity::High => (0.6, 0.3),
        Sensitivity::Medium => (config.threshold, config.threshold),
    }
}

/// Random-sampling telemetry used when no monitoring backend is attached.
pub struct MockTelemetry {
    rng: Mutex<StdRng>,
    anomaly_detection: AnomalyDetectionConfig,
}

impl MockTelemetry {
    /// Create a mock seeded from OS entropy
    pub fn new(anomaly_detection: AnomalyDetectionConfig) -> Self {
        Self::from_rng(StdRng::from_entropy(), anomaly_detection)
    }

    /// Create a reproducible mock
    pub fn with_seed(seed: u64, anomaly_detection: AnomalyDetectionConfig) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), anomaly_detection)
    }

    fn from_rng(rng: StdRng, anomaly_detection: AnomalyDetectionConfig) -> Self {
        Self {
            rng: Mutex::new(rng),
            anomaly_detection,
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // A panic while sampling leaves the generator usable.
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sample_anomaly(rng: &mut StdRng, kind: AnomalyKind) -> Anomaly {
        let details = match kind {
            AnomalyKind::TrafficSpike => "Unusual increase in outbound traffic",
            AnomalyKind::NewConnectionPattern => "Multiple connection attempts to unusual ports",
        };
        Anomaly {
            kind,
            severity: *SEVERITIES.choose(rng).unwrap_or(&AnomalySeverity::Medium),
            confidence: rng.gen_range(0.5..=0.95),
            details: details.to_string(),
        }
    }
}

impl TelemetrySource for MockTelemetry {
    fn analyze_traffic(&self) -> TrafficAnalysis {
        let mut rng = self.rng();
        let total: u32 = rng.gen_range(100..=1000);
        let top_protocols = PROTOCOLS
            .iter()
            .map(|(protocol, low, high)| ProtocolShare {
                protocol: protocol.to_string(),
                percentage: rng.gen_range(*low..=*high),
            })
            .collect();

        TrafficAnalysis {
            timestamp: Utc::now(),
            total_bandwidth_mbps: total,
            total_traffic: format!("{} Mbps", total),
            top_protocols,
            unusual_patterns: rng.gen_bool(0.5),
        }
    }

    fn detect_anomalies(&self) -> AnomalyReport {
        let (spike_threshold, pattern_threshold) = anomaly_thresholds(&self.anomaly_detection);
        let mut rng = self.rng();
        let mut anomalies = Vec::new();

        if rng.gen::<f64>() > spike_threshold {
            anomalies.push(Self::sample_anomaly(&mut rng, AnomalyKind::TrafficSpike));
        }
        if rng.gen::<f64>() > pattern_threshold {
            anomalies.push(Self::sample_anomaly(
                &mut rng,
                AnomalyKind::NewConnectionPattern,
            ));
        }

        debug!(
            sensitivity = %self.anomaly_detection.sensitivity,
            spike_threshold,
            pattern_threshold,
            detected = anomalies.len(),
            "Anomaly scan completed"
        );

        let recommendations = if anomalies.is_empty() {
            Vec::new()
        } else {
            vec![
                "Monitor the affected systems closely".to_string(),
                "Check for unauthorized access".to_string(),
                "Review firewall rules".to_string(),
            ]
        };

        AnomalyReport {
            timestamp: Utc::now(),
            anomalies_detected: !anomalies.is_empty(),
            anomalies,
            recommendations,
        }
    }

    fn check_health(&self) -> HealthReport {
        let mut rng = self.rng();
        let components: Vec<ComponentHealth> = COMPONENTS
            .iter()
            .map(|(name, healthy_probability)| ComponentHealth {
                name: name.to_string(),
                status: if rng.gen_bool(*healthy_probability) {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Warning
                },
            })
            .collect();

        let recommendations: Vec<String> = components
            .iter()
            .filter(|c| !c.status.is_healthy())
            .map(|c| format!("Check {} for potential issues", c.name))
            .collect();

        HealthReport {
            timestamp: Utc::now(),
            overall_status: if recommendations.is_empty() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Warning
            },
            components,
            recommendations,
        }
    }

    fn predict_failures(&self) -> FailureForecast {
        let mut rng = self.rng();
        let mut predictions = Vec::new();

        if rng.gen_bool(FAILURE_PROBABILITY) {
            predictions.push(FailurePrediction {
                component: "Switch 3".to_string(),
                probability: rng.gen_range(0.6..=0.9),
                estimated_time: "24-48 hours".to_string(),
                indicators: vec![
                    "increasing error rate".to_string(),
                    "intermittent connectivity".to_string(),
                ],
            });
        }

        let recommendations = predictions
            .iter()
            .map(|p| {
                format!(
                    "Schedule maintenance for {} within {}",
                    p.component, p.estimated_time
                )
            })
            .collect();

        FailureForecast {
            timestamp: Utc::now(),
            predictions,
            recommendations,
        }
    }
}
