//! Plain-text itinerary output.

use chrono::{DateTime, Utc};
use errandflow_core::{Itinerary, ScheduleEntry, TimingPolicy};

fn hm(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Backward arrivals are targets, so slack is only shown for forward plans.
fn status_label(entry: &ScheduleEntry, policy: TimingPolicy) -> String {
    match (entry.status, policy) {
        (Some(status), TimingPolicy::Forward) => match entry.slack() {
            Some(slack) => format!("{status} ({:+}m)", slack.num_minutes()),
            None => status.to_string(),
        },
        (Some(status), TimingPolicy::Backward) => status.to_string(),
        (None, _) => "flexible".to_string(),
    }
}

pub fn itinerary(itinerary: &Itinerary) -> String {
    let policy = match itinerary.policy {
        TimingPolicy::Forward => "forward",
        TimingPolicy::Backward => "backward",
    };

    let mut out = format!(
        "Itinerary from {:.5},{:.5} starting {} UTC ({policy})\n",
        itinerary.origin.lat,
        itinerary.origin.lng,
        itinerary.start_time.format("%Y-%m-%d %H:%M"),
    );

    if itinerary.is_empty() {
        out.push_str("  no stops\n");
    }

    for (i, entry) in itinerary.entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<28} arrive {}  depart {}  travel {:>3}m  {}\n",
            i + 1,
            entry.title,
            hm(entry.arrive_time),
            hm(entry.depart_time),
            entry.travel_minutes,
            status_label(entry, itinerary.policy),
        ));
    }

    let summary = &itinerary.summary;
    out.push_str(&format!(
        "{} stops ({} fixed), {} min travel, {} late, {} tight\n",
        summary.stops, summary.fixed_stops, summary.total_travel_minutes, summary.late, summary.tight,
    ));
    if let Some(finish) = summary.finish_time {
        out.push_str(&format!("done by {} UTC\n", finish.format("%H:%M")));
    }

    for warning in &itinerary.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out
}
