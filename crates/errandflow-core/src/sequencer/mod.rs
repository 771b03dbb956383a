//! Visit-order sequencing for errands.
//!
//! Produces one total visit order from an unordered task list:
//! - Fixed tasks first, sorted by deadline (never reordered for geography)
//! - Flexible tasks after, ordered by proximity to an anchor point
//! - The anchor is the last fixed stop, or the origin when there is none
//!
//! Ties always resolve to input order, so the output is deterministic.

mod proximity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::schedule::FlexibleOrdering;
use crate::task::{DataWarning, Task};

pub use proximity::{order_by_anchor, order_by_chain};

/// Result of a sequencing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// All input tasks in visit order
    pub order: Vec<Task>,
    /// Number of leading entries in `order` that are fixed stops
    pub fixed_count: usize,
    /// Data-quality problems found while partitioning
    pub warnings: Vec<DataWarning>,
}

impl Sequence {
    /// Task ids in visit order
    pub fn ids(&self) -> Vec<&str> {
        self.order.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Orders tasks into a fixed-first, proximity-second itinerary.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    ordering: FlexibleOrdering,
}

impl Sequencer {
    /// Create a sequencer using the single-anchor proximity sort
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit flexible-ordering strategy
    pub fn with_ordering(ordering: FlexibleOrdering) -> Self {
        Self { ordering }
    }

    pub fn ordering(&self) -> FlexibleOrdering {
        self.ordering
    }

    /// Compute the visit order for `tasks` starting from `origin`.
    pub fn sequence(&self, tasks: &[Task], origin: GeoPoint) -> Sequence {
        if tasks.is_empty() {
            return Sequence::default();
        }

        // 1. Partition, collecting contract warnings as we go
        let mut warnings = Vec::new();
        let mut fixed: Vec<(DateTime<Utc>, &Task)> = Vec::new();
        let mut flexible: Vec<&Task> = Vec::new();

        for task in tasks {
            if let Some(warning) = task.data_warning() {
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
            match task.deadline() {
                Some(deadline) => fixed.push((deadline, task)),
                None => flexible.push(task),
            }
        }

        // 2. Fixed block by deadline; stable sort keeps input order on ties
        fixed.sort_by_key(|(deadline, _)| *deadline);

        // 3. Flexible block by proximity to the anchor
        let anchor = fixed.last().map(|(_, task)| task.point()).unwrap_or(origin);
        tracing::debug!(
            fixed = fixed.len(),
            flexible = flexible.len(),
            anchor_lat = anchor.lat,
            anchor_lng = anchor.lng,
            "partitioned tasks"
        );

        let flexible = match self.ordering {
            FlexibleOrdering::Anchor => order_by_anchor(flexible, anchor),
            FlexibleOrdering::Chained => order_by_chain(flexible, anchor),
        };

        // 4. Fixed block always leads
        let fixed_count = fixed.len();
        let order = fixed
            .into_iter()
            .map(|(_, task)| task)
            .chain(flexible)
            .cloned()
            .collect();

        Sequence {
            order,
            fixed_count,
            warnings,
        }
    }
}

/// Sequence with the default single-anchor strategy.
pub fn sequence(tasks: &[Task], origin: GeoPoint) -> Sequence {
    Sequencer::new().sequence(tasks, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Location;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0).unwrap()
    }

    fn flexible(id: &str, lat: f64, lng: f64) -> Task {
        Task::new(id, Location::new(GeoPoint::new(lat, lng))).with_id(id)
    }

    fn fixed(id: &str, lat: f64, lng: f64, deadline: DateTime<Utc>) -> Task {
        flexible(id, lat, lng).with_deadline(deadline)
    }

    const ORIGIN: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

    #[test]
    fn empty_input_yields_empty_sequence() {
        let seq = sequence(&[], ORIGIN);
        assert!(seq.is_empty());
        assert!(seq.warnings.is_empty());
    }

    #[test]
    fn fixed_task_precedes_closer_flexible_task() {
        let tasks = vec![flexible("a", 0.001, 0.0), fixed("b", 1.0, 1.0, at(9, 0))];
        let seq = sequence(&tasks, ORIGIN);
        assert_eq!(seq.ids(), vec!["b", "a"]);
        assert_eq!(seq.fixed_count, 1);
    }

    #[test]
    fn fixed_tasks_sorted_by_deadline() {
        let tasks = vec![fixed("nine", 0.0, 0.1, at(9, 0)), fixed("half-eight", 0.0, 0.2, at(8, 30))];
        let seq = sequence(&tasks, ORIGIN);
        assert_eq!(seq.ids(), vec!["half-eight", "nine"]);
    }

    #[test]
    fn equal_deadlines_keep_input_order() {
        let tasks = vec![
            fixed("first", 0.0, 0.5, at(9, 0)),
            fixed("second", 0.0, 0.1, at(9, 0)),
        ];
        assert_eq!(sequence(&tasks, ORIGIN).ids(), vec!["first", "second"]);
    }

    #[test]
    fn single_fixed_task_is_the_whole_order() {
        let tasks = vec![fixed("only", 0.0, 0.3, at(10, 0))];
        assert_eq!(sequence(&tasks, ORIGIN).ids(), vec!["only"]);
    }

    #[test]
    fn flexible_tasks_sorted_by_distance_to_origin() {
        let tasks = vec![
            flexible("far", 0.0, 0.3),
            flexible("near", 0.0, 0.1),
            flexible("mid", 0.0, 0.2),
        ];
        assert_eq!(sequence(&tasks, ORIGIN).ids(), vec!["near", "mid", "far"]);
    }

    #[test]
    fn flexible_tasks_anchor_on_last_fixed_stop() {
        // Last fixed stop sits at lng 1.0; "east" is closest to it even though
        // "west" is closest to the origin.
        let tasks = vec![
            flexible("west", 0.0, -0.1),
            flexible("east", 0.0, 0.9),
            fixed("early", 0.0, 0.5, at(8, 0)),
            fixed("late", 0.0, 1.0, at(9, 0)),
        ];
        assert_eq!(sequence(&tasks, ORIGIN).ids(), vec!["early", "late", "east", "west"]);
    }

    #[test]
    fn malformed_tasks_are_flexible_and_reported() {
        let mut no_deadline = flexible("no-deadline", 0.0, 0.1);
        no_deadline.fixed_time = true;
        let mut no_flag = flexible("no-flag", 0.0, 0.2);
        no_flag.must_arrive_by = Some(at(7, 0));
        let tasks = vec![no_flag, no_deadline, fixed("real", 0.0, 5.0, at(9, 0))];

        let seq = sequence(&tasks, ORIGIN);
        assert_eq!(seq.fixed_count, 1);
        assert_eq!(seq.order[0].id, "real");
        assert_eq!(seq.order.len(), 3);
        assert_eq!(seq.warnings.len(), 2);
    }

    #[test]
    fn chained_ordering_walks_nearest_neighbours() {
        // Anchor sort from origin: b (0.2 away) before c (0.25). A chained walk
        // goes origin -> a -> c -> b because c is next to a.
        let tasks = vec![
            flexible("a", 0.0, 0.1),
            flexible("b", 0.2, 0.0),
            flexible("c", 0.0, 0.25),
        ];
        let anchored = Sequencer::new().sequence(&tasks, ORIGIN);
        assert_eq!(anchored.ids(), vec!["a", "b", "c"]);

        let chained = Sequencer::with_ordering(FlexibleOrdering::Chained).sequence(&tasks, ORIGIN);
        assert_eq!(chained.ids(), vec!["a", "c", "b"]);
    }
}
