use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    rules::{CLEANUP_GB, DELETE_GB, DELETE_UNUSED_DAYS, LARGE_GB, UNUSED_DAYS_LONG},
    types::{
        ArchivalSuggestion, CleanupRecommendation, DeletionCandidate, LargeUnusedRow, RegionCost,
        RegionDepartmentCost, SummaryRow,
    },
};

pub const REPORT_FILE_NAME: &str = "report.txt";

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditResults {
    pub generated_at: DateTime<Utc>,
    pub summary: Vec<SummaryRow>,
    pub large_unused_90plus: Vec<LargeUnusedRow>,
    pub cost_by_region: Vec<RegionCost>,
    pub cost_by_region_department: Vec<RegionDepartmentCost>,
    pub cleanup_recommendations: Vec<CleanupRecommendation>,
    pub deletion_queue: Vec<DeletionCandidate>,
    pub archival_suggestions: Vec<ArchivalSuggestion>,
    pub final_deletion_list: Vec<DeletionCandidate>,
}

impl AuditResults {
    /// Render the plain-text audit report: one pipe-delimited line per row,
    /// `None` for empty sections.
    pub fn to_text(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "Comprehensive S3 Bucket Audit - {}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        s.push_str(&"=".repeat(RULE_WIDTH));
        s.push_str("\n\n");

        section(
            &mut s,
            "SUMMARY (name | region | size(GB) | versioning | dept | last_accessed)",
            &self.summary,
            |r| {
                format!(
                    "{} | {} | {} GB | {} | {} | {}",
                    r.name,
                    r.region,
                    num(r.size_gb),
                    r.versioning,
                    r.department,
                    r.last_accessed
                )
            },
        );

        section(
            &mut s,
            &format!("BUCKETS > {LARGE_GB}GB AND UNUSED >= {UNUSED_DAYS_LONG} days"),
            &self.large_unused_90plus,
            |r| {
                format!(
                    "{} | {} | {} GB | last={} | unused_days={}",
                    r.name,
                    r.region,
                    num(r.size_gb),
                    r.last_accessed,
                    days(r.unused_days)
                )
            },
        );

        section(&mut s, "COST BY REGION", &self.cost_by_region, |r| {
            format!("{} : ${}", r.region, num(r.total_monthly_cost_usd))
        });

        section(
            &mut s,
            "COST BY REGION+DEPARTMENT",
            &self.cost_by_region_department,
            |r| {
                format!(
                    "{}/{} : ${}",
                    r.region,
                    r.department,
                    num(r.total_monthly_cost_usd)
                )
            },
        );

        section(
            &mut s,
            &format!("CLEANUP RECOMMENDATIONS (size>{CLEANUP_GB} GB)"),
            &self.cleanup_recommendations,
            |r| {
                format!(
                    "{} | {} | {} GB | reason: {}",
                    r.name,
                    r.region,
                    num(r.size_gb),
                    r.reason
                )
            },
        );

        section(
            &mut s,
            &format!("DELETION QUEUE (size>{DELETE_GB} & unused>={DELETE_UNUSED_DAYS} days)"),
            &self.deletion_queue,
            |r| {
                format!(
                    "{} | {} | {} GB | unused_days={} | monthly_cost=${}",
                    r.name,
                    r.region,
                    num(r.size_gb),
                    days(r.unused_days),
                    num(r.monthly_cost)
                )
            },
        );

        section(
            &mut s,
            "ARCHIVAL SUGGESTIONS (Move to Glacier)",
            &self.archival_suggestions,
            |r| {
                format!(
                    "{} | {} | {} GB | {}",
                    r.name,
                    r.region,
                    num(r.size_gb),
                    r.suggestion
                )
            },
        );

        section(
            &mut s,
            "FINAL DELETION LIST",
            &self.final_deletion_list,
            |r| format!("{} | {} | {} GB", r.name, r.region, num(r.size_gb)),
        );

        // Sections are separated by a blank line; drop the trailing one.
        if s.ends_with("\n\n") {
            s.pop();
        }
        s
    }
}

fn section<T>(s: &mut String, title: &str, rows: &[T], line: impl Fn(&T) -> String) {
    s.push_str(title);
    s.push('\n');
    if rows.is_empty() {
        s.push_str("None\n");
    } else {
        for r in rows {
            s.push_str(&line(r));
            s.push('\n');
        }
    }
    s.push('\n');
}

/// Shortest round-trip form, always with a fractional part for whole numbers.
fn num(x: f64) -> String {
    format!("{x:?}")
}

fn days(d: Option<i64>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

pub fn write_report(path: &Path, results: &AuditResults) -> anyhow::Result<()> {
    std::fs::write(path, results.to_text())
        .with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
