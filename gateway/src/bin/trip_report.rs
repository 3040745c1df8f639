use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use shared::{normalize, try_normalize, TierProgress, TransportMode, TripMetrics};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print distance, CO2 savings, points and reward tier for a stored path"
)]
struct Args {
    /// Path as JSON text, or `@file` to read it from a file
    #[arg(long)]
    path: String,

    /// Transport mode: "a pie", "bicicleta" or "colectivo" (English aliases accepted)
    #[arg(long, default_value = "a pie")]
    mode: String,

    /// Current point total, to project the tier after this trip
    #[arg(long)]
    points: Option<i64>,

    /// Fail on the first malformed coordinate instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    points_in_path: usize,
    #[serde(flatten)]
    metrics: TripMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<TierProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<TierProgress>,
}

fn read_path_arg(arg: &str) -> Result<String, std::io::Error> {
    match arg.strip_prefix('@') {
        Some(file) => std::fs::read_to_string(PathBuf::from(file)),
        None => Ok(arg.to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mode: TransportMode = args.mode.parse()?;
    let raw: Value = serde_json::from_str(&read_path_arg(&args.path)?)?;

    let path = if args.strict {
        try_normalize(&raw)?
    } else {
        normalize(&raw)
    };
    if path.is_empty() {
        tracing::warn!("path has no usable coordinates");
    }

    let metrics = TripMetrics::for_path(&path, mode);
    tracing::info!("{} points, {} m", path.len(), metrics.distance_m);

    let before = args.points.map(TierProgress::evaluate);
    let after = args
        .points
        .map(|p| TierProgress::evaluate(p.saturating_add(i64::from(metrics.points))));

    let report = Report {
        points_in_path: path.len(),
        metrics,
        before,
        after,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
