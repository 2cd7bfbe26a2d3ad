use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::{
    dates::days_since,
    report::AuditResults,
    types::{
        ArchivalSuggestion, CleanupRecommendation, DeletionCandidate, LargeUnusedRow,
        NormalizedRecord, RegionCost, RegionDepartmentCost, SummaryRow,
    },
};

pub const LARGE_GB: f64 = 80.0;
pub const UNUSED_DAYS_LONG: i64 = 90;
pub const CLEANUP_GB: f64 = 50.0;
pub const DELETE_GB: f64 = 100.0;
pub const DELETE_UNUSED_DAYS: i64 = 20;
pub const DEFAULT_RATE_PER_GB: f64 = 0.023;

pub const ARCHIVE_SUGGESTION: &str = "Move to Glacier";

/// Round to 4 decimal places from the exact binary value, not from `x * 10^4`.
pub fn round4(x: f64) -> f64 {
    format!("{x:.4}").parse().unwrap_or(x)
}

/// `true` when the bucket has no timestamp or has been idle for at least `min_days`.
fn unused_for(days: Option<i64>, min_days: i64) -> bool {
    days.map_or(true, |d| d >= min_days)
}

/// Single pass over the normalized records producing every result set.
pub fn classify(records: &[NormalizedRecord], now: DateTime<Utc>) -> AuditResults {
    let summary = records
        .iter()
        .map(|n| SummaryRow {
            name: n.name.clone(),
            region: n.region.clone(),
            size_gb: n.size_gb,
            versioning: n.versioning,
            department: n.department.clone(),
            last_accessed: n.last_raw.clone(),
        })
        .collect();

    let mut large_unused_90plus = Vec::new();
    let mut cleanup_recommendations = Vec::new();
    let mut deletion_queue: Vec<DeletionCandidate> = Vec::new();
    let mut archival_suggestions = Vec::new();

    let mut region_totals = OrderedTotals::default();
    let mut region_dept_totals = OrderedTotals::default();

    // Names queued for deletion so far in this pass; archival only checks these.
    let mut queued: HashSet<&str> = HashSet::new();

    for n in records {
        let days = days_since(n.last, now);

        if n.size_gb > LARGE_GB && unused_for(days, UNUSED_DAYS_LONG) {
            large_unused_90plus.push(LargeUnusedRow {
                name: n.name.clone(),
                region: n.region.clone(),
                size_gb: n.size_gb,
                last_accessed: n.last_raw.clone(),
                unused_days: days,
            });
        }

        region_totals.add((n.region.clone(), None), n.monthly_cost);
        region_dept_totals.add(
            (n.region.clone(), Some(n.department.clone())),
            n.monthly_cost,
        );

        if n.size_gb > CLEANUP_GB {
            cleanup_recommendations.push(CleanupRecommendation {
                name: n.name.clone(),
                region: n.region.clone(),
                size_gb: n.size_gb,
                reason: format!("size>{CLEANUP_GB}"),
            });
        }

        if n.size_gb > DELETE_GB && unused_for(days, DELETE_UNUSED_DAYS) {
            deletion_queue.push(DeletionCandidate {
                name: n.name.clone(),
                region: n.region.clone(),
                size_gb: n.size_gb,
                unused_days: days,
                monthly_cost: n.monthly_cost,
            });
            queued.insert(n.name.as_str());
        }

        if n.size_gb > CLEANUP_GB
            && unused_for(days, UNUSED_DAYS_LONG)
            && !queued.contains(n.name.as_str())
        {
            archival_suggestions.push(ArchivalSuggestion {
                name: n.name.clone(),
                region: n.region.clone(),
                size_gb: n.size_gb,
                suggestion: ARCHIVE_SUGGESTION.to_string(),
            });
        }
    }

    let cost_by_region = region_totals
        .into_rows()
        .map(|((region, _), total)| RegionCost {
            region,
            total_monthly_cost_usd: total,
        })
        .collect();

    let cost_by_region_department = region_dept_totals
        .into_rows()
        .map(|((region, department), total)| RegionDepartmentCost {
            region,
            department: department.unwrap_or_default(),
            total_monthly_cost_usd: total,
        })
        .collect();

    let final_deletion_list = deletion_queue.clone();

    AuditResults {
        generated_at: now,
        summary,
        large_unused_90plus,
        cost_by_region,
        cost_by_region_department,
        cleanup_recommendations,
        deletion_queue,
        archival_suggestions,
        final_deletion_list,
    }
}

type GroupKey = (String, Option<String>);

/// Running sums that remember the order in which each key was first seen.
#[derive(Default)]
struct OrderedTotals {
    index: HashMap<GroupKey, usize>,
    rows: Vec<(GroupKey, f64)>,
}

impl OrderedTotals {
    fn add(&mut self, key: GroupKey, amount: f64) {
        match self.index.get(&key) {
            Some(&i) => self.rows[i].1 += amount,
            None => {
                self.index.insert(key.clone(), self.rows.len());
                self.rows.push((key, amount));
            }
        }
    }

    fn into_rows(self) -> impl Iterator<Item = (GroupKey, f64)> {
        self.rows
            .into_iter()
            .map(|(key, total)| (key, round4(total)))
    }
}
