//! Planner output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::schedule::TimingPolicy;
use crate::task::DataWarning;
use crate::timeline::{DeadlineStatus, RouteLeg, ScheduleEntry};

/// Aggregate figures over a schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItinerarySummary {
    pub stops: usize,
    pub fixed_stops: usize,
    pub late: usize,
    pub tight: usize,
    pub total_travel_minutes: i64,
    /// Departure from the last stop; forward policy only
    pub finish_time: Option<DateTime<Utc>>,
}

impl ItinerarySummary {
    pub fn from_entries(entries: &[ScheduleEntry], policy: TimingPolicy) -> Self {
        let count = |status: DeadlineStatus| {
            entries
                .iter()
                .filter(|e| e.status == Some(status))
                .count()
        };

        let finish_time = match policy {
            TimingPolicy::Forward => entries.last().and_then(|e| e.depart_time),
            TimingPolicy::Backward => None,
        };

        Self {
            stops: entries.len(),
            fixed_stops: entries.iter().filter(|e| e.is_fixed).count(),
            late: count(DeadlineStatus::Late),
            tight: count(DeadlineStatus::Tight),
            total_travel_minutes: entries.iter().map(|e| e.travel_minutes).sum(),
            finish_time,
        }
    }

    /// Every fixed stop is reached with at least the tight threshold of slack
    pub fn all_on_time(&self) -> bool {
        self.late == 0 && self.tight == 0
    }
}

/// A complete scheduling run: order, legs, timestamps and warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub origin: GeoPoint,
    pub start_time: DateTime<Utc>,
    pub policy: TimingPolicy,
    /// Task ids in visit order
    pub order: Vec<String>,
    /// `legs[i]` arrives at `entries[i]`
    pub legs: Vec<RouteLeg>,
    pub entries: Vec<ScheduleEntry>,
    pub warnings: Vec<DataWarning>,
    pub summary: ItinerarySummary,
}

impl Itinerary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
