//! Timeline building: turn an ordered stop list plus legs into timestamps.
//!
//! The per-stop arithmetic is exposed as pure functions of
//! `(task, leg, reference_time)` so each policy can be exercised on its own.

use chrono::{DateTime, Duration, Utc};

use super::entry::{DeadlineStatus, ScheduleEntry};
use super::leg::RouteLeg;
use crate::error::ValidationError;
use crate::schedule::{ScheduleSettings, TimingPolicy};
use crate::task::Task;

fn out_of_range(task: &Task) -> ValidationError {
    ValidationError::TimeOutOfRange {
        task_id: task.id.clone(),
    }
}

/// Exact (millisecond) duration for a fractional minute count.
fn minutes_to_duration(minutes: f64) -> Option<Duration> {
    let millis = (minutes * 60_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

fn whole_minutes(task: &Task, minutes: i64) -> Result<Duration, ValidationError> {
    Duration::try_minutes(minutes).ok_or_else(|| out_of_range(task))
}

/// Travel minutes for the leg and the matching duration.
fn checked_travel(task: &Task, leg: &RouteLeg) -> Result<(i64, Duration), ValidationError> {
    if !leg.is_valid() {
        return Err(ValidationError::InvalidTravel {
            task_id: task.id.clone(),
            seconds: leg.duration_seconds,
        });
    }
    if leg.duration_seconds / 60.0 >= i64::MAX as f64 {
        return Err(out_of_range(task));
    }
    let minutes = leg.travel_minutes();
    Ok((minutes, whole_minutes(task, minutes)?))
}

/// Forward accumulation for one stop.
///
/// `clock` is the departure time from the previous stop (or the start time).
/// The next stop's clock is the returned entry's `depart_time`.
///
/// # Errors
///
/// Returns an error for an invalid leg, a negative/non-finite duration, or
/// timestamps outside the representable range.
pub fn forward_entry(
    task: &Task,
    leg: &RouteLeg,
    clock: DateTime<Utc>,
    settings: &ScheduleSettings,
) -> Result<ScheduleEntry, ValidationError> {
    let (travel_minutes, travel) = checked_travel(task, leg)?;
    let service = task.service_minutes(settings.default_duration_minutes)?;
    let threshold = whole_minutes(task, settings.tight_threshold_minutes)?;

    let arrive = clock
        .checked_add_signed(travel)
        .ok_or_else(|| out_of_range(task))?;
    let depart = minutes_to_duration(service)
        .and_then(|d| arrive.checked_add_signed(d))
        .ok_or_else(|| out_of_range(task))?;

    let deadline = task.deadline();
    let status = deadline.map(|deadline| DeadlineStatus::classify(arrive, deadline, threshold));

    Ok(ScheduleEntry {
        task_id: task.id.clone(),
        title: task.title.clone(),
        arrive_time: Some(arrive),
        depart_time: Some(depart),
        travel_minutes,
        service_minutes: service,
        is_fixed: deadline.is_some(),
        deadline,
        status,
    })
}

/// Backward-from-deadline computation for one stop.
///
/// For a fixed stop the target arrival is the deadline minus the arrival
/// buffer, and the departure is that minus the leg's travel. Stops without a
/// deadline get no timestamps.
///
/// The status reflects leaving at `reference` (usually "now") and travelling
/// the leg directly.
///
/// # Errors
///
/// Returns an error for an invalid leg, a negative/non-finite duration, or
/// timestamps outside the representable range.
pub fn backward_entry(
    task: &Task,
    leg: &RouteLeg,
    reference: DateTime<Utc>,
    settings: &ScheduleSettings,
) -> Result<ScheduleEntry, ValidationError> {
    let (travel_minutes, travel) = checked_travel(task, leg)?;
    let service = task.service_minutes(settings.default_duration_minutes)?;
    let deadline = task.deadline();

    let (arrive, depart, status) = match deadline {
        Some(deadline) => {
            let buffer = whole_minutes(task, settings.arrival_buffer_minutes)?;
            let threshold = whole_minutes(task, settings.tight_threshold_minutes)?;

            let arrive = deadline
                .checked_sub_signed(buffer)
                .ok_or_else(|| out_of_range(task))?;
            let depart = arrive
                .checked_sub_signed(travel)
                .ok_or_else(|| out_of_range(task))?;
            let earliest = reference
                .checked_add_signed(travel)
                .ok_or_else(|| out_of_range(task))?;

            let status = DeadlineStatus::classify(earliest, deadline, threshold);
            (Some(arrive), Some(depart), Some(status))
        }
        None => (None, None, None),
    };

    Ok(ScheduleEntry {
        task_id: task.id.clone(),
        title: task.title.clone(),
        arrive_time: arrive,
        depart_time: depart,
        travel_minutes,
        service_minutes: service,
        is_fixed: deadline.is_some(),
        deadline,
        status,
    })
}

/// Builds a schedule for an already-ordered stop list.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    settings: ScheduleSettings,
}

impl TimelineBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom settings
    pub fn with_settings(settings: ScheduleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Build using the configured timing policy.
    ///
    /// `legs[i]` is the leg arriving at `ordered[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LegCountMismatch`] when the slices differ in
    /// length, or any per-stop validation error.
    pub fn build(
        &self,
        ordered: &[Task],
        legs: &[RouteLeg],
        start: DateTime<Utc>,
    ) -> Result<Vec<ScheduleEntry>, ValidationError> {
        self.build_with_policy(ordered, legs, start, self.settings.timing_policy)
    }

    /// Build with an explicit timing policy.
    pub fn build_with_policy(
        &self,
        ordered: &[Task],
        legs: &[RouteLeg],
        start: DateTime<Utc>,
        policy: TimingPolicy,
    ) -> Result<Vec<ScheduleEntry>, ValidationError> {
        if ordered.len() != legs.len() {
            return Err(ValidationError::LegCountMismatch {
                tasks: ordered.len(),
                legs: legs.len(),
            });
        }

        match policy {
            TimingPolicy::Forward => self.forward(ordered, legs, start),
            TimingPolicy::Backward => ordered
                .iter()
                .zip(legs)
                .map(|(task, leg)| backward_entry(task, leg, start, &self.settings))
                .collect(),
        }
    }

    fn forward(
        &self,
        ordered: &[Task],
        legs: &[RouteLeg],
        start: DateTime<Utc>,
    ) -> Result<Vec<ScheduleEntry>, ValidationError> {
        let mut clock = start;
        let mut entries = Vec::with_capacity(ordered.len());

        for (task, leg) in ordered.iter().zip(legs) {
            let entry = forward_entry(task, leg, clock, &self.settings)?;
            if let Some(depart) = entry.depart_time {
                clock = depart;
            }
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// Build a forward schedule with default settings.
pub fn build_timeline(
    ordered: &[Task],
    legs: &[RouteLeg],
    start: DateTime<Utc>,
) -> Result<Vec<ScheduleEntry>, ValidationError> {
    TimelineBuilder::new().build(ordered, legs, start)
}
