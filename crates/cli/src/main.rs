use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bucket_audit_core::config::Config;
use bucket_audit_core::report::{write_report, AuditResults, REPORT_FILE_NAME};
use bucket_audit_core::rules::DEFAULT_RATE_PER_GB;
use bucket_audit_core::{audit_file, AuditOptions};

#[derive(Parser, Debug)]
#[command(
    name = "bucket-audit",
    version,
    about = "Compact S3 bucket audit -> single report.txt"
)]
struct Cli {
    /// Buckets JSON file
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// USD per GB-month [default: 0.023]
    #[arg(long, short = 'r')]
    rate: Option<f64>,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference time (RFC 3339) for idle-day calculations
    #[arg(long)]
    now: Option<String>,

    /// Also write the result sets as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

struct Style {
    bold: &'static str,
    red: &'static str,
    yellow: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    red: "\x1b[31m",
    yellow: "\x1b[33m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    red: "",
    yellow: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            ExitCode::from(1)
        }
    }
}

// Diagnostics go to stderr; stdout carries only the run counters.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!(
                "{}{}warning:{} failed to load config {}: {:#}",
                style().bold,
                style().yellow,
                style().reset,
                p.display(),
                e
            );
            Config::default()
        }),
        None => Config::discover().unwrap_or_default(),
    }
}

fn resolve_rate(flag: Option<f64>, cfg: &Config) -> f64 {
    flag.or(cfg.rate).unwrap_or(DEFAULT_RATE_PER_GB)
}

fn parse_now(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid --now {raw:?}, expected RFC 3339"))?;
    Ok(dt.with_timezone(&Utc))
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if !cli.file.exists() {
        println!("File not found: {}", cli.file.display());
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = load_config(cli.config.as_deref());
    let opts = AuditOptions {
        rate: resolve_rate(cli.rate, &cfg),
        now: cli.now.as_deref().map(parse_now).transpose()?,
    };
    tracing::debug!(rate = opts.rate, file = %cli.file.display(), "starting audit");

    let results = audit_file(&cli.file, opts)?;

    write_report(Path::new(REPORT_FILE_NAME), &results)?;
    if let Some(json_path) = &cli.json {
        write_json(json_path, &results)?;
    }

    println!("Processed: {}", results.summary.len());
    println!("Large & unused(90d): {}", results.large_unused_90plus.len());
    println!("Deletion queue: {}", results.deletion_queue.len());
    println!("Report -> {}", REPORT_FILE_NAME);

    Ok(ExitCode::SUCCESS)
}

fn write_json(path: &Path, results: &AuditResults) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(results).context("serialize results json")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
