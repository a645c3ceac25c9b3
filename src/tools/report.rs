use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::NetworkTools;
use crate::telemetry::{AnomalyReport, HealthReport, HealthStatus, TrafficAnalysis};

/// Combined traffic, health and anomaly report.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub timestamp: DateTime<Utc>,
    pub report_sections: Vec<ReportSection>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// A titled report section.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub data: ReportData,
}

/// Data carried by a report section.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Traffic(TrafficAnalysis),
    Health(HealthReport),
    Anomalies(AnomalyReport),
}

/// Prioritized maintenance tasks.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenancePlan {
    pub timestamp: DateTime<Utc>,
    pub maintenance_tasks: Vec<MaintenanceTask>,
    pub recommendations: Vec<String>,
}

/// One maintenance task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub priority: TaskPriority,
    pub task: String,
    pub deadline: String,
}

/// Maintenance task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Sort rank; lower runs first.
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
        }
    }

    /// Get the priority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

const FIRMWARE_UPDATE_PROBABILITY: f64 = 0.5;
const CONFIG_REVIEW_PROBABILITY: f64 = 0.3;

impl NetworkTools {
    /// Generate a network status report from traffic, health and anomaly data.
    pub fn generate_report(&self) -> NetworkReport {
        let traffic = self.analyze_traffic();
        let health = self.check_health();
        let anomalies = self.detect_anomalies();

        let warnings = health.unhealthy_components().count();
        let summary = match (warnings, anomalies.anomalies.len()) {
            (0, 0) => format!(
                "Network is operating normally at {} with all components healthy.",
                traffic.total_traffic
            ),
            (w, a) => format!(
                "Network is operating at {} with {} component warning(s) and {} anomaly(ies) to address.",
                traffic.total_traffic, w, a
            ),
        };

        let mut recommendations = Vec::new();
        if health.overall_status == HealthStatus::Warning {
            recommendations.push("Address warning status components".to_string());
        }
        recommendations.push(if anomalies.anomalies_detected {
            "Investigate detected anomalies".to_string()
        } else {
            "Continue regular monitoring".to_string()
        });

        NetworkReport {
            timestamp: Utc::now(),
            report_sections: vec![
                ReportSection {
                    title: "Traffic Analysis".to_string(),
                    data: ReportData::Traffic(traffic),
                },
                ReportSection {
                    title: "Network Health".to_string(),
                    data: ReportData::Health(health),
                },
                ReportSection {
                    title: "Anomaly Detection".to_string(),
                    data: ReportData::Anomalies(anomalies),
                },
            ],
            summary,
            recommendations,
        }
    }

    /// Suggest maintenance tasks from component health and failure forecasts.
    pub fn suggest_maintenance(&self) -> MaintenancePlan {
        let health = self.check_health();
        let forecast = self.predict_failures();

        let mut tasks: Vec<MaintenanceTask> = health
            .unhealthy_components()
            .map(|component| MaintenanceTask {
                priority: TaskPriority::Medium,
                task: format!("Inspect and troubleshoot {}", component.name),
                deadline: "Within 48 hours".to_string(),
            })
            .collect();

        tasks.extend(forecast.predictions.iter().map(|p| MaintenanceTask {
            priority: TaskPriority::High,
            task: format!("Preventive maintenance for {}", p.component),
            deadline: p.estimated_time.clone(),
        }));

        {
            let mut rng = self.routine_rng();
            if rng.gen_bool(FIRMWARE_UPDATE_PROBABILITY) {
                tasks.push(MaintenanceTask {
                    priority: TaskPriority::Low,
                    task: "Update firmware on network devices".to_string(),
                    deadline: "Within 2 weeks".to_string(),
                });
            }
            if rng.gen_bool(CONFIG_REVIEW_PROBABILITY) {
                tasks.push(MaintenanceTask {
                    priority: TaskPriority::Low,
                    task: "Review and optimize network configuration".to_string(),
                    deadline: "Within 1 month".to_string(),
                });
            }
        }

        tasks.sort_by_key(|t| t.priority.rank());

        let recommendations = tasks
            .iter()
            .map(|t| format!("{} ({} priority)", t.task, t.priority.as_str()))
            .collect();

        MaintenancePlan {
            timestamp: Utc::now(),
            maintenance_tasks: tasks,
            recommendations,
        }
    }
}
