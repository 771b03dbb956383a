//! Errand task model.
//!
//! A task is a unit of work at a resolved location. It is either *fixed*
//! (carries a hard `must_arrive_by` deadline) or *flexible* (visit whenever).
//!
//! The upstream extractor is expected to keep `fixed_time` and
//! `must_arrive_by` consistent. When it does not, the task is still schedulable:
//! it is treated as flexible and a [`DataWarning`] is reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::geo::{GeoPoint, Location};

/// A unit of work to perform at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, stable identifier
    pub id: String,
    /// Free-text label
    pub title: String,
    /// Resolved location of the errand
    pub location: Location,
    /// Service time at the location (null for the configured default)
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// Whether the task has a hard arrival deadline
    #[serde(default)]
    pub fixed_time: bool,
    /// Hard deadline; must be set when `fixed_time` is true
    #[serde(default)]
    pub must_arrive_by: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a flexible task with a fresh id and default duration.
    pub fn new(title: impl Into<String>, location: Location) -> Self {
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            location,
            duration_minutes: None,
            fixed_time: false,
            must_arrive_by: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Make this a fixed task that must be reached by `deadline`.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.fixed_time = true;
        self.must_arrive_by = Some(deadline);
        self
    }

    pub fn point(&self) -> GeoPoint {
        self.location.point
    }

    /// The usable hard deadline, if any.
    ///
    /// Only a task that is flagged fixed *and* carries a deadline has one.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        if self.fixed_time {
            self.must_arrive_by
        } else {
            None
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.deadline().is_some()
    }

    /// Inconsistency between `fixed_time` and `must_arrive_by`, if any.
    pub fn data_warning(&self) -> Option<DataWarning> {
        match (self.fixed_time, self.must_arrive_by) {
            (true, None) => Some(DataWarning::FixedWithoutDeadline {
                task_id: self.id.clone(),
            }),
            (false, Some(deadline)) => Some(DataWarning::DeadlineWithoutFixedFlag {
                task_id: self.id.clone(),
                deadline,
            }),
            _ => None,
        }
    }

    /// Service time in minutes, falling back to `default_minutes` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite durations.
    pub fn service_minutes(&self, default_minutes: f64) -> Result<f64, ValidationError> {
        let minutes = self.duration_minutes.unwrap_or(default_minutes);
        if !minutes.is_finite() {
            return Err(ValidationError::NonFiniteDuration {
                task_id: self.id.clone(),
            });
        }
        if minutes < 0.0 {
            return Err(ValidationError::NegativeDuration {
                task_id: self.id.clone(),
                minutes,
            });
        }
        Ok(minutes)
    }
}

/// A recoverable data-quality problem reported alongside a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// Flagged fixed but no deadline; scheduled as flexible
    FixedWithoutDeadline { task_id: String },
    /// Deadline present without the fixed flag; deadline ignored
    DeadlineWithoutFixedFlag {
        task_id: String,
        deadline: DateTime<Utc>,
    },
    /// Draft whose location could not be resolved; dropped before scheduling
    Unresolved { title: String, query: String },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::FixedWithoutDeadline { task_id } => write!(
                f,
                "task '{task_id}' is marked fixed but has no deadline; treated as flexible"
            ),
            DataWarning::DeadlineWithoutFixedFlag { task_id, deadline } => write!(
                f,
                "task '{task_id}' has deadline {} but is not marked fixed; deadline ignored",
                deadline.to_rfc3339()
            ),
            DataWarning::Unresolved { title, query } => {
                write!(f, "could not resolve location '{query}' for '{title}'; skipped")
            }
        }
    }
}
