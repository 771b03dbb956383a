use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use errandflow_core::{resolve_drafts, FlexibleOrdering, GeoPoint, Planner, TaskDraft, TimingPolicy};

use super::load_config;
use crate::render;

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file holding an array of tasks ("-" reads stdin)
    #[arg(long)]
    tasks: PathBuf,

    /// Starting point as "LAT,LNG"
    #[arg(long, allow_hyphen_values = true)]
    origin: String,

    /// Start time (RFC3339, defaults to now)
    #[arg(long)]
    start: Option<String>,

    /// Timing policy: forward or backward (overrides config)
    #[arg(long)]
    policy: Option<TimingPolicy>,

    /// Flexible ordering: anchor or chained (overrides config)
    #[arg(long)]
    ordering: Option<FlexibleOrdering>,

    /// Print the itinerary as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: PlanArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let origin = parse_origin(&args.origin)?;
    let start = match &args.start {
        Some(s) => parse_start(s)?,
        None => Utc::now(),
    };
    let drafts = read_drafts(&args.tasks)?;
    tracing::debug!(count = drafts.len(), "loaded task drafts");

    let resolver = config.location_resolver()?;
    let resolved = resolve_drafts(drafts, resolver.as_ref()).await;

    let mut settings = config.schedule_settings();
    if let Some(policy) = args.policy {
        settings.timing_policy = policy;
    }
    if let Some(ordering) = args.ordering {
        settings.flexible_ordering = ordering;
    }

    let planner = Planner::new(settings, config.travel_oracle()?);
    let mut itinerary = planner.plan(&resolved.tasks, origin, start).await?;

    let mut warnings = resolved.warnings;
    warnings.append(&mut itinerary.warnings);
    itinerary.warnings = warnings;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&itinerary)?);
    } else {
        print!("{}", render::itinerary(&itinerary));
    }
    Ok(())
}

fn parse_origin(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("origin must be LAT,LNG, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

    let point = GeoPoint::new(lat, lng);
    if !point.is_valid() {
        return Err(format!("origin out of range: {lat},{lng}"));
    }
    Ok(point)
}

fn parse_start(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid start time '{s}': {e}"))
}

fn read_drafts(path: &Path) -> Result<Vec<TaskDraft>, Box<dyn std::error::Error>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };
    Ok(serde_json::from_str(&raw)?)
}
