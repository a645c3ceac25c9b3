use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NetworkTools;

/// Score every category starts from.
const BASE_SCORE: f64 = 0.1;
/// Score added once when any of a category's keywords appears.
const KEYWORD_BOOST: f64 = 0.3;

/// Keyword sets for the scored categories.
const CATEGORY_KEYWORDS: [(QueryCategory, &[&str]); 4] = [
    (
        QueryCategory::Troubleshooting,
        &["problem", "issue", "error", "troubleshoot", "fix"],
    ),
    (
        QueryCategory::Monitoring,
        &["monitor", "watch", "track", "observe", "status"],
    ),
    (
        QueryCategory::Maintenance,
        &["maintain", "update", "upgrade", "prevent"],
    ),
    (
        QueryCategory::Configuration,
        &["configure", "setup", "install", "change"],
    ),
];

/// Arg-max precedence; earlier categories win ties.
const TIE_ORDER: [QueryCategory; 5] = [
    QueryCategory::General,
    QueryCategory::Troubleshooting,
    QueryCategory::Monitoring,
    QueryCategory::Maintenance,
    QueryCategory::Configuration,
];

/// Category of a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    Troubleshooting,
    Monitoring,
    Maintenance,
    Configuration,
    General,
}

impl QueryCategory {
    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Troubleshooting => "troubleshooting",
            QueryCategory::Monitoring => "monitoring",
            QueryCategory::Maintenance => "maintenance",
            QueryCategory::Configuration => "configuration",
            QueryCategory::General => "general",
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized category scores for a query.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub timestamp: DateTime<Utc>,
    /// Scores per category, summing to 1
    pub categories: BTreeMap<QueryCategory, f64>,
    pub top_category: QueryCategory,
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl NetworkTools {
    /// Classify a query into troubleshooting, monitoring, maintenance,
    /// configuration or general.
    pub fn classify_query(&self, query: &str) -> Classification {
        classify(query)
    }
}

fn classify(query: &str) -> Classification {
    let query = query.to_lowercase();

    let mut raw: BTreeMap<QueryCategory, f64> = CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let hit = keywords.iter().any(|k| query.contains(k));
            (
                *category,
                if hit {
                    BASE_SCORE + KEYWORD_BOOST
                } else {
                    BASE_SCORE
                },
            )
        })
        .collect();
    raw.insert(QueryCategory::General, BASE_SCORE);

    let total: f64 = raw.values().sum();
    let categories: BTreeMap<QueryCategory, f64> =
        raw.into_iter().map(|(k, v)| (k, v / total)).collect();

    let mut top_category = TIE_ORDER[0];
    let mut confidence = categories[&top_category];
    for category in &TIE_ORDER[1..] {
        let score = categories[category];
        if score > confidence {
            top_category = *category;
            confidence = score;
        }
    }

    let recommendations = if top_category == QueryCategory::General {
        vec!["Provide more specific details about your network issue".to_string()]
    } else {
        Vec::new()
    };

    Classification {
        timestamp: Utc::now(),
        categories,
        top_category,
        confidence,
        recommendations,
    }
}
