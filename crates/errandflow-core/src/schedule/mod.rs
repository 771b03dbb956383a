//! Scheduling settings shared by the sequencer and timeline builder.

use serde::{Deserialize, Serialize};

/// How timestamps are derived for each stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingPolicy {
    /// Arrive as soon as possible: a running clock from the start time
    #[default]
    Forward,
    /// Latest safe departure: each fixed stop counted back from its deadline
    Backward,
}

impl std::str::FromStr for TimingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(TimingPolicy::Forward),
            "backward" => Ok(TimingPolicy::Backward),
            other => Err(format!("unknown timing policy '{other}' (expected forward|backward)")),
        }
    }
}

/// How flexible tasks are ordered after the fixed block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexibleOrdering {
    /// Single static sort by distance to one anchor point
    #[default]
    Anchor,
    /// Nearest-neighbour walk starting at the anchor point
    Chained,
}

impl std::str::FromStr for FlexibleOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anchor" => Ok(FlexibleOrdering::Anchor),
            "chained" => Ok(FlexibleOrdering::Chained),
            other => Err(format!("unknown ordering '{other}' (expected anchor|chained)")),
        }
    }
}

/// Numeric knobs for a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Service time for tasks that do not state one
    pub default_duration_minutes: f64,
    /// Safety margin subtracted from a deadline under the backward policy
    pub arrival_buffer_minutes: i64,
    /// Slack below which a fixed stop is classified tight
    pub tight_threshold_minutes: i64,
    pub timing_policy: TimingPolicy,
    pub flexible_ordering: FlexibleOrdering,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            default_duration_minutes: 30.0,
            arrival_buffer_minutes: 5,
            tight_threshold_minutes: 5,
            timing_policy: TimingPolicy::Forward,
            flexible_ordering: FlexibleOrdering::Anchor,
        }
    }
}
