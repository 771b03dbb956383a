//! Realized per-stop timing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deadline classification of a fixed stop.
///
/// A fixed stop has no status until a timeline run computes one; once
/// computed it never changes. A new run produces new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineStatus {
    /// At least the tight threshold of slack before the deadline
    OnTime,
    /// Reached by the deadline, but with less slack than the threshold
    Tight,
    /// Reached after the deadline
    Late,
}

impl DeadlineStatus {
    /// Classify an arrival against a deadline.
    ///
    /// Comparison is exact; no rounding is applied to either timestamp.
    pub fn classify(arrive: DateTime<Utc>, deadline: DateTime<Utc>, tight_threshold: Duration) -> Self {
        if arrive > deadline {
            DeadlineStatus::Late
        } else if deadline - arrive < tight_threshold {
            DeadlineStatus::Tight
        } else {
            DeadlineStatus::OnTime
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "on time",
            Self::Tight => "tight",
            Self::Late => "late",
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task's realized timing in a schedule.
///
/// Under the forward policy `arrive_time`/`depart_time` are the arrival at and
/// departure from the stop. Under the backward policy they are the target
/// arrival and the latest departure from the previous stop; both are `None`
/// for stops without a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_id: String,
    pub title: String,
    pub arrive_time: Option<DateTime<Utc>>,
    pub depart_time: Option<DateTime<Utc>>,
    /// Minutes of the leg consumed to reach this stop
    pub travel_minutes: i64,
    pub service_minutes: f64,
    pub is_fixed: bool,
    pub deadline: Option<DateTime<Utc>>,
    /// Only set for fixed stops
    pub status: Option<DeadlineStatus>,
}

impl ScheduleEntry {
    pub fn is_late(&self) -> bool {
        self.status == Some(DeadlineStatus::Late)
    }

    pub fn is_tight(&self) -> bool {
        self.status == Some(DeadlineStatus::Tight)
    }

    /// Time between arrival and deadline; negative when late.
    pub fn slack(&self) -> Option<Duration> {
        Some(self.deadline? - self.arrive_time?)
    }
}
