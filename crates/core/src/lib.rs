pub mod config;
pub mod dates;
pub mod input;
pub mod normalize;
pub mod report;
pub mod rules;
pub mod types;

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    normalize::normalize,
    report::AuditResults,
    rules::{classify, DEFAULT_RATE_PER_GB},
    types::NormalizedRecord,
};

#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// USD per GB-month applied to buckets without an explicit monthly cost.
    pub rate: f64,
    /// Reference time for idle-day calculations; `None` means the current time.
    pub now: Option<DateTime<Utc>>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE_PER_GB,
            now: None,
        }
    }
}

pub fn normalize_all(raw: &[Value], rate: f64) -> Vec<NormalizedRecord> {
    raw.iter().map(|r| normalize(r, rate)).collect()
}

/// Normalize and classify an in-memory bucket listing.
pub fn audit(raw: &[Value], opts: AuditOptions) -> AuditResults {
    let now = opts.now.unwrap_or_else(Utc::now);
    let records = normalize_all(raw, opts.rate);
    let results = classify(&records, now);

    tracing::info!(
        records = results.summary.len(),
        large_unused = results.large_unused_90plus.len(),
        deletion_queue = results.deletion_queue.len(),
        archival = results.archival_suggestions.len(),
        rate = opts.rate,
        "bucket audit complete"
    );

    results
}

pub fn audit_file(input: &Path, opts: AuditOptions) -> anyhow::Result<AuditResults> {
    let raw = input::load_buckets(input)
        .with_context(|| format!("failed to read bucket listing at {}", input.display()))?;
    Ok(audit(&raw, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn audit_uses_injected_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let raw = vec![json!({"name": "fresh", "size_gb": 200, "last_accessed": "2024-05-30"})];
        let results = audit(
            &raw,
            AuditOptions {
                now: Some(now),
                ..AuditOptions::default()
            },
        );

        assert_eq!(results.generated_at, now);
        assert!(results.deletion_queue.is_empty());
        assert!(results.large_unused_90plus.is_empty());
        assert_eq!(results.cleanup_recommendations.len(), 1);
    }

    #[test]
    fn audit_applies_custom_rate() {
        let raw = vec![json!({"name": "a", "size_gb": 100})];
        let results = audit(
            &raw,
            AuditOptions {
                rate: 0.01,
                now: None,
            },
        );
        assert_eq!(results.cost_by_region[0].total_monthly_cost_usd, 1.0);
    }
}
