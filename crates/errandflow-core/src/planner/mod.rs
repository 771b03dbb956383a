//! End-to-end planning: sequence, look up legs, build the timeline.
//!
//! The planner is the only place that awaits: it queries the travel oracle
//! for each consecutive pair in the final order, then hands the resolved legs
//! to the synchronous timeline builder.

mod itinerary;

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::{OracleError, Result};
use crate::geo::GeoPoint;
use crate::oracle::TravelOracle;
use crate::schedule::{ScheduleSettings, TimingPolicy};
use crate::sequencer::Sequencer;
use crate::task::Task;
use crate::timeline::{RouteLeg, TimelineBuilder};

pub use itinerary::{Itinerary, ItinerarySummary};

/// Stateless planning service; safe to share across concurrent requests.
#[derive(Clone)]
pub struct Planner {
    settings: ScheduleSettings,
    oracle: Arc<dyn TravelOracle>,
}

impl Planner {
    pub fn new(settings: ScheduleSettings, oracle: Arc<dyn TravelOracle>) -> Self {
        Self { settings, oracle }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Override the timing policy from settings
    pub fn with_policy(mut self, policy: TimingPolicy) -> Self {
        self.settings.timing_policy = policy;
        self
    }

    /// One leg per stop: origin to the first stop, then stop to stop.
    ///
    /// # Errors
    ///
    /// Returns the first oracle failure.
    pub async fn legs_for(
        &self,
        origin: GeoPoint,
        ordered: &[Task],
    ) -> Result<Vec<RouteLeg>, OracleError> {
        let mut legs = Vec::with_capacity(ordered.len());
        let mut from = origin;

        for task in ordered {
            let to = task.point();
            legs.push(self.oracle.leg(from, to).await?);
            from = to;
        }

        Ok(legs)
    }

    /// Plan a full itinerary for `tasks` leaving `origin` at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error when a travel lookup fails or the timeline builder
    /// rejects the input (e.g. a negative duration).
    pub async fn plan(
        &self,
        tasks: &[Task],
        origin: GeoPoint,
        start: DateTime<Utc>,
    ) -> Result<Itinerary> {
        let sequence = Sequencer::with_ordering(self.settings.flexible_ordering).sequence(tasks, origin);

        let legs = if sequence.is_empty() {
            Vec::new()
        } else {
            self.legs_for(origin, &sequence.order).await?
        };

        let entries = TimelineBuilder::with_settings(self.settings).build(&sequence.order, &legs, start)?;
        let summary = ItinerarySummary::from_entries(&entries, self.settings.timing_policy);

        tracing::info!(
            oracle = self.oracle.name(),
            stops = summary.stops,
            late = summary.late,
            tight = summary.tight,
            travel_minutes = summary.total_travel_minutes,
            "planned itinerary"
        );

        Ok(Itinerary {
            origin,
            start_time: start,
            policy: self.settings.timing_policy,
            order: sequence.order.iter().map(|t| t.id.clone()).collect(),
            legs,
            entries,
            warnings: sequence.warnings,
            summary,
        })
    }
}
