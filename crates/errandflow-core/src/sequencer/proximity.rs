//! Proximity ordering for flexible tasks.
//!
//! Distances are great-circle and only ever used for ranking, never for
//! travel-time estimates.

use crate::geo::GeoPoint;
use crate::task::Task;

/// Sort by straight-line distance to a single anchor.
///
/// One static sort, O(n log n). Equal distances keep input order.
pub fn order_by_anchor(tasks: Vec<&Task>, anchor: GeoPoint) -> Vec<&Task> {
    let mut keyed: Vec<(f64, &Task)> = tasks
        .into_iter()
        .map(|task| (anchor.distance_to(&task.point()), task))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, task)| task).collect()
}

/// Greedy nearest-neighbour walk starting at `anchor`.
///
/// Each step moves to the closest unvisited task from the current position.
/// O(n^2); the first candidate in input order wins a tie.
pub fn order_by_chain(mut tasks: Vec<&Task>, anchor: GeoPoint) -> Vec<&Task> {
    let mut ordered = Vec::with_capacity(tasks.len());
    let mut current = anchor;

    while !tasks.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, task) in tasks.iter().enumerate() {
            let distance = current.distance_to(&task.point());
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        // `remove` (not `swap_remove`) keeps the remaining input order intact
        let next = tasks.remove(best);
        current = next.point();
        ordered.push(next);
    }

    ordered
}
