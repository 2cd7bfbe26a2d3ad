use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical shape of one bucket after alias resolution and coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub versioning: bool,
    pub last: Option<DateTime<Utc>>,
    pub last_raw: String,
    pub department: String,
    pub monthly_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub versioning: bool,
    pub department: String,
    pub last_accessed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LargeUnusedRow {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub last_accessed: String,
    /// `None` when the bucket has no usable access timestamp.
    pub unused_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionCost {
    pub region: String,
    pub total_monthly_cost_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionDepartmentCost {
    pub region: String,
    pub department: String,
    pub total_monthly_cost_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupRecommendation {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletionCandidate {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub unused_days: Option<i64>,
    pub monthly_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivalSuggestion {
    pub name: String,
    pub region: String,
    pub size_gb: f64,
    pub suggestion: String,
}
