//! Static network troubleshooting knowledge base.
//!
//! Entries describe a known issue together with its symptom phrases, likely
//! causes and remediation steps. The base is loaded once, never mutated, and
//! shared between tools through an `Arc`.
//!
//! Files may be a bare JSON array of entries or an object with an `entries`
//! array (optionally carrying `version` and `last_updated`). Any failure while
//! reading a file falls back to [`default_entries`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KnowledgeBaseError, KnowledgeBaseResult};

/// One known network issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Issue name, lower-case (e.g. "packet loss").
    pub issue: String,
    /// Symptom phrases matched as substrings of user descriptions.
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

/// Issue severity as recorded in the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A knowledge base document with its optional metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub entries: Vec<KnowledgeEntry>,
}

impl KnowledgeEntry {
    /// Create an entry from borrowed phrase lists.
    pub fn new(issue: &str, symptoms: &[&str], causes: &[&str], solutions: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            issue: issue.to_string(),
            symptoms: owned(symptoms),
            causes: owned(causes),
            solutions: owned(solutions),
            severity: None,
            tags: BTreeSet::new(),
        }
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Add tags
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }
}

impl KnowledgeBase {
    /// Parse a knowledge base document from JSON text.
    pub fn from_json(raw: &str) -> KnowledgeBaseResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        match value {
            serde_json::Value::Array(_) => Ok(Self {
                entries: serde_json::from_value(value)?,
                ..Self::default()
            }),
            serde_json::Value::Object(ref map) if map.contains_key("entries") => {
                Ok(serde_json::from_value(value)?)
            }
            other => Err(KnowledgeBaseError::UnrecognizedShape {
                message: format!(
                    "expected an array or an object with 'entries', got {}",
                    json_kind(&other)
                ),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object without 'entries'",
    }
}

/// Read and parse a knowledge base file.
pub fn read_knowledge_base(path: &Path) -> KnowledgeBaseResult<KnowledgeBase> {
    let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    KnowledgeBase::from_json(&raw)
}

/// Load knowledge base entries, falling back to the built-in set on any failure.
pub fn load_knowledge_base(path: Option<&Path>) -> Vec<KnowledgeEntry> {
    let Some(path) = path else {
        debug!("No knowledge base path configured, using built-in entries");
        return default_entries();
    };

    match read_knowledge_base(path) {
        Ok(kb) => {
            if kb.entries.is_empty() {
                warn!(path = %path.display(), "Knowledge base file has no entries");
            }
            info!(
                path = %path.display(),
                entries = kb.entries.len(),
                version = kb.version.as_deref().unwrap_or("unversioned"),
                "Knowledge base loaded"
            );
            kb.entries
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to load knowledge base, using built-in entries"
            );
            default_entries()
        }
    }
}

/// Built-in knowledge base used when no file is available.
pub fn default_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "high latency",
            &[
                "high latency",
                "slow response time",
                "packet delay",
                "timeout",
            ],
            &[
                "network congestion",
                "insufficient bandwidth",
                "routing issues",
            ],
            &[
                "Check for bandwidth-intensive applications",
                "Implement QoS (Quality of Service) policies",
                "Optimize routing tables",
                "Upgrade saturated uplinks",
            ],
        )
        .with_severity(Severity::Medium)
        .with_tags(&["performance", "latency"]),
        KnowledgeEntry::new(
            "packet loss",
            &[
                "packet loss",
                "connection drops",
                "retransmissions",
                "poor quality",
            ],
            &[
                "network congestion",
                "hardware failure",
                "signal interference",
            ],
            &[
                "Check physical connections",
                "Replace faulty hardware",
                "Reduce network congestion",
                "Inspect interface error counters",
            ],
        )
        .with_severity(Severity::High)
        .with_tags(&["performance", "reliability"]),
        KnowledgeEntry::new(
            "dns resolution failure",
            &[
                "cannot resolve domain names",
                "name resolution error",
                "dns lookup failed",
            ],
            &["dns server issues", "misconfiguration", "connectivity problems"],
            &[
                "Check DNS server settings",
                "Flush DNS cache",
                "Verify network connectivity to DNS servers",
                "Try an alternate DNS resolver",
                "Review DNS server logs for errors",
            ],
        )
        .with_severity(Severity::High)
        .with_tags(&["dns", "connectivity"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries() {
        let entries = default_entries();
        let issues: Vec<&str> = entries.iter().map(|e| e.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec!["high latency", "packet loss", "dns resolution failure"]
        );
        assert_eq!(entries[2].solutions.len(), 5);
    }

    #[test]
    fn test_default_symptoms_are_lowercase() {
        for entry in default_entries() {
            for symptom in &entry.symptoms {
                assert_eq!(symptom, &symptom.to_lowercase());
            }
        }
    }

    #[test]
    fn test_from_json_bare_array() {
        let raw = r#"[{"issue": "x", "symptoms": ["a"], "causes": [], "solutions": ["s"]}]"#;
        let kb = KnowledgeBase::from_json(raw).unwrap();
        assert_eq!(kb.entries.len(), 1);
        assert!(kb.version.is_none());
        assert!(kb.entries[0].severity.is_none());
        assert!(kb.entries[0].tags.is_empty());
    }

    #[test]
    fn test_from_json_wrapped_entries() {
        let raw = r#"{
            "version": "1.2",
            "last_updated": "2024-03-01",
            "entries": [{
                "issue": "x",
                "symptoms": ["a"],
                "causes": ["c"],
                "solutions": ["s"],
                "severity": "critical",
                "tags": ["wan", "bgp"]
            }]
        }"#;
        let kb = KnowledgeBase::from_json(raw).unwrap();
        assert_eq!(kb.version.as_deref(), Some("1.2"));
        assert_eq!(kb.entries[0].severity, Some(Severity::Critical));
        assert!(kb.entries[0].tags.contains("bgp"));
    }

    #[test]
    fn test_from_json_unrecognized_shape() {
        let err = KnowledgeBase::from_json(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::UnrecognizedShape { .. }));

        let err = KnowledgeBase::from_json("42").unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = KnowledgeBase::from_json("[{").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse(_)));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(load_knowledge_base(None), default_entries());
    }
}
