use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use bucket_audit_core::{audit, audit_file, AuditOptions};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn opts() -> AuditOptions {
    AuditOptions {
        now: Some(fixed_now()),
        ..AuditOptions::default()
    }
}

fn names<'a>(rows: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    rows.into_iter().collect()
}

#[test]
fn sample_fixture_classifies_every_set() {
    let input = Path::new("../../fixtures/buckets_sample.json");
    let results = audit_file(input, opts()).expect("audit_file ok");

    assert_eq!(results.summary.len(), 5);
    assert_eq!(results.summary[1].name, "ml-artifacts");
    assert_eq!(results.summary[1].department, "ml");
    assert!(results.summary[1].versioning);
    assert_eq!(results.summary[3].name, "web-assets");

    assert_eq!(
        names(results.large_unused_90plus.iter().map(|r| r.name.as_str())),
        vec!["raw-dumps", "ml-artifacts"]
    );
    assert_eq!(
        names(results.deletion_queue.iter().map(|r| r.name.as_str())),
        vec!["raw-dumps", "ml-artifacts", "backups"]
    );
    assert_eq!(results.deletion_queue[2].unused_days, Some(61));
    assert_eq!(results.deletion_queue[2].monthly_cost, 27.6);
    assert_eq!(
        names(results.archival_suggestions.iter().map(|r| r.name.as_str())),
        vec!["old-logs"]
    );
    assert_eq!(results.final_deletion_list, results.deletion_queue);

    let regions: Vec<_> = results
        .cost_by_region
        .iter()
        .map(|r| (r.region.as_str(), r.total_monthly_cost_usd))
        .collect();
    assert_eq!(regions, vec![("us-east-1", 34.5), ("eu-west-1", 1.88)]);
    assert_eq!(results.cost_by_region_department.len(), 5);
}

#[test]
fn sample_fixture_report_lines() {
    let input = Path::new("../../fixtures/buckets_sample.json");
    let text = audit_file(input, opts()).unwrap().to_text();

    assert!(text.starts_with(
        "Comprehensive S3 Bucket Audit - 2024-06-01T00:00:00Z\n\
         ================================================================================\n\n"
    ));
    assert!(text.contains("raw-dumps | us-east-1 | 150.0 GB | false | data | \n"));
    assert!(text.contains("backups | us-east-1 | 1200.0 GB | false | ops | 1711929600\n"));
    assert!(text.contains("ml-artifacts | us-east-1 | 150.0 GB | last= | unused_days=\n"));
    assert!(text.contains("us-east-1/ops : $27.6\n"));
    assert!(text.contains("eu-west-1/web : $0.5\n"));
    assert!(text.contains(
        "backups | us-east-1 | 1200.0 GB | unused_days=61 | monthly_cost=$27.6\n"
    ));
    assert!(text.contains("old-logs | eu-west-1 | 60.0 GB | Move to Glacier\n"));
    assert!(text.ends_with("FINAL DELETION LIST\nraw-dumps | us-east-1 | 150.0 GB\nml-artifacts | us-east-1 | 150.0 GB\nbackups | us-east-1 | 1200.0 GB\n"));
}

#[test]
fn missing_file_is_an_error() {
    let err = audit_file(Path::new("does-not-exist.json"), opts()).unwrap_err();
    assert!(format!("{:#}", err).contains("does-not-exist.json"));
}

#[test]
fn two_large_undated_buckets_go_to_deletion_not_archival() {
    let raw = vec![
        serde_json::json!({"name": "a", "size_gb": 150}),
        serde_json::json!({"name": "b", "size_gb": 150}),
    ];
    let results = audit(&raw, opts());

    assert_eq!(results.summary.len(), 2);
    for set in [
        names(results.large_unused_90plus.iter().map(|r| r.name.as_str())),
        names(results.cleanup_recommendations.iter().map(|r| r.name.as_str())),
        names(results.deletion_queue.iter().map(|r| r.name.as_str())),
        names(results.final_deletion_list.iter().map(|r| r.name.as_str())),
    ] {
        assert_eq!(set, vec!["a", "b"]);
    }
    assert!(results.deletion_queue.iter().all(|r| r.monthly_cost == 3.45));
    assert!(results.archival_suggestions.is_empty());
}

#[test]
fn mid_size_stale_bucket_is_archived() {
    let last = (fixed_now() - chrono::Duration::days(95)).to_rfc3339();
    let raw = vec![serde_json::json!({"name": "mid", "size_gb": 60, "last_accessed": last})];
    let results = audit(&raw, opts());

    assert_eq!(results.cleanup_recommendations.len(), 1);
    assert_eq!(results.archival_suggestions.len(), 1);
    assert!(results.deletion_queue.is_empty());
}

#[test]
fn empty_listing_prints_none_everywhere() {
    let results = audit(&[], opts());
    assert!(results.cost_by_region.is_empty());
    assert!(results.cost_by_region_department.is_empty());

    let text = results.to_text();
    let body: Vec<&str> = text.lines().skip(3).filter(|l| !l.is_empty()).collect();
    assert_eq!(body.len(), 16);
    for pair in body.chunks(2) {
        assert_eq!(pair[1], "None", "section {} should be empty", pair[0]);
    }
}

#[test]
fn minute_precision_access_time_is_recent() {
    let raw = vec![serde_json::json!({
        "name": "hot",
        "size_gb": 500,
        "last_accessed": "2024-05-31T12:30",
    })];
    let results = audit(&raw, opts());

    assert!(results.deletion_queue.is_empty());
    assert!(results.large_unused_90plus.is_empty());
    assert_eq!(results.cleanup_recommendations.len(), 1);
}

#[test]
fn basic_format_date_is_recent() {
    let raw = vec![serde_json::json!({"name": "hot", "size_gb": 500, "last_modified": "20240531"})];
    let results = audit(&raw, opts());
    assert!(results.deletion_queue.is_empty());
}
