use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::NetworkTools;
use crate::knowledge::KnowledgeEntry;

/// Maximum number of candidate issues returned by a diagnosis.
pub const MAX_POSSIBLE_ISSUES: usize = 2;

/// Maximum number of solutions returned by [`NetworkTools::suggest_solutions`].
pub const MAX_SOLUTIONS: usize = 5;

/// Queries shorter than this only match phrases they contain.
const MIN_PARTIAL_QUERY_LEN: usize = 3;

/// Result of matching a description against known symptoms.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub timestamp: DateTime<Utc>,
    pub possible_issues: Vec<PossibleIssue>,
    pub recommendations: Vec<String>,
}

/// A knowledge base issue matching a description.
#[derive(Debug, Clone, Serialize)]
pub struct PossibleIssue {
    pub issue: String,
    pub matching_symptoms: Vec<String>,
    pub confidence: f64,
}

/// Knowledge base search hits.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeSearch {
    pub timestamp: DateTime<Utc>,
    pub results: Vec<KnowledgeEntry>,
    pub recommendations: Vec<String>,
}

/// Solutions collected for a described issue.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSuggestions {
    pub timestamp: DateTime<Utc>,
    pub solutions: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Confidence for `matches` of `total` symptoms, in `[0.3, 1.0]`.
pub fn symptom_confidence(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.3;
    }
    let ratio = (matches as f64 / total as f64).min(1.0);
    ratio * 0.7 + 0.3
}

impl NetworkTools {
    /// Diagnose an issue from a free-text description.
    pub fn diagnose_issue(&self, description: &str) -> Diagnosis {
        let description = description.to_lowercase();

        let mut matches: Vec<PossibleIssue> = self
            .knowledge_base
            .iter()
            .filter_map(|entry| {
                let symptoms: Vec<&String> =
                    entry.symptoms.iter().filter(|s| !is_blank(s)).collect();
                let matching: Vec<String> = symptoms
                    .iter()
                    .filter(|s| description.contains(s.trim().to_lowercase().as_str()))
                    .map(|s| (*s).clone())
                    .collect();
                if matching.is_empty() {
                    return None;
                }
                Some(PossibleIssue {
                    issue: entry.issue.clone(),
                    confidence: symptom_confidence(matching.len(), symptoms.len()),
                    matching_symptoms: matching,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(MAX_POSSIBLE_ISSUES);

        debug!(matches = matches.len(), "Diagnosis completed");

        Diagnosis {
            timestamp: Utc::now(),
            possible_issues: matches,
            recommendations: vec![
                "Run a network diagnostic tool".to_string(),
                "Check system logs for errors".to_string(),
            ],
        }
    }

    /// Search the knowledge base by issue name or symptom.
    pub fn search_knowledge_base(&self, query: &str) -> KnowledgeSearch {
        let query = query.trim().to_lowercase();

        let results: Vec<KnowledgeEntry> = if query.is_empty() {
            Vec::new()
        } else {
            self.knowledge_base
                .iter()
                .filter(|entry| {
                    phrase_matches(&query, &entry.issue)
                        || entry.symptoms.iter().any(|s| phrase_matches(&query, s))
                })
                .cloned()
                .collect()
        };

        let recommendations = results
            .iter()
            .flat_map(|entry| entry.solutions.iter().cloned())
            .collect();

        KnowledgeSearch {
            timestamp: Utc::now(),
            results,
            recommendations,
        }
    }

    /// Suggest solutions for a described issue.
    pub fn suggest_solutions(&self, issue_description: &str) -> SolutionSuggestions {
        let diagnosis = self.diagnose_issue(issue_description);

        let solutions: Vec<String> = diagnosis
            .possible_issues
            .iter()
            .filter_map(|possible| {
                self.knowledge_base
                    .iter()
                    .find(|entry| entry.issue == possible.issue)
            })
            .flat_map(|entry| entry.solutions.iter().cloned())
            .take(MAX_SOLUTIONS)
            .collect();

        SolutionSuggestions {
            timestamp: Utc::now(),
            recommendations: solutions.iter().take(3).cloned().collect(),
            solutions,
        }
    }
}

fn is_blank(phrase: &str) -> bool {
    phrase.trim().is_empty()
}

/// Case-insensitive containment in either direction; `query` is lower-case.
/// Blank phrases never match.
fn phrase_matches(query: &str, phrase: &str) -> bool {
    if is_blank(phrase) {
        return false;
    }
    let phrase = phrase.trim().to_lowercase();
    query.contains(phrase.as_str())
        || (query.len() >= MIN_PARTIAL_QUERY_LEN && phrase.contains(query))
}
