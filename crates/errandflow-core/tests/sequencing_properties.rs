//! Property tests for sequencing and timeline building.

use chrono::{DateTime, Duration, TimeZone, Utc};
use errandflow_core::{
    build_timeline, sequence, FlexibleOrdering, GeoPoint, Location, RouteLeg, Sequencer, Task,
};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 7, 0, 0).unwrap()
}

/// (lat, lng, deadline offset in minutes if fixed)
fn task_shape() -> impl Strategy<Value = (f64, f64, Option<i64>)> {
    (-60.0f64..60.0, -170.0f64..170.0, proptest::option::of(0i64..600))
}

fn build_tasks(shapes: &[(f64, f64, Option<i64>)]) -> Vec<Task> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, (lat, lng, offset))| {
            let task = Task::new(format!("t{i}"), Location::new(GeoPoint::new(*lat, *lng)))
                .with_id(format!("t{i}"));
            match offset {
                Some(minutes) => task.with_deadline(base() + Duration::minutes(*minutes)),
                None => task,
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn sequence_is_a_permutation(shapes in prop::collection::vec(task_shape(), 0..25)) {
        let tasks = build_tasks(&shapes);
        let seq = sequence(&tasks, GeoPoint::new(0.0, 0.0));

        let mut input: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        let mut output: Vec<_> = seq.order.iter().map(|t| t.id.clone()).collect();
        input.sort();
        output.sort();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn fixed_block_leads_in_deadline_order(
        shapes in prop::collection::vec(task_shape(), 0..25),
        chained in any::<bool>(),
    ) {
        let tasks = build_tasks(&shapes);
        let ordering = if chained { FlexibleOrdering::Chained } else { FlexibleOrdering::Anchor };
        let seq = Sequencer::with_ordering(ordering).sequence(&tasks, GeoPoint::new(10.0, 10.0));

        let fixed_count = tasks.iter().filter(|t| t.is_fixed()).count();
        prop_assert_eq!(seq.fixed_count, fixed_count);
        prop_assert!(seq.order[..fixed_count].iter().all(Task::is_fixed));
        prop_assert!(seq.order[fixed_count..].iter().all(|t| !t.is_fixed()));

        let deadlines: Vec<_> = seq.order[..fixed_count]
            .iter()
            .filter_map(Task::deadline)
            .collect();
        prop_assert!(deadlines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sequence_is_deterministic(shapes in prop::collection::vec(task_shape(), 0..20)) {
        let tasks = build_tasks(&shapes);
        let origin = GeoPoint::new(-5.0, 3.0);
        prop_assert_eq!(sequence(&tasks, origin), sequence(&tasks, origin));
    }

    #[test]
    fn travel_minutes_never_underestimate(seconds in 0.0f64..100_000.0) {
        let minutes = RouteLeg::new(seconds).travel_minutes();
        prop_assert!(minutes as f64 * 60.0 >= seconds);
        prop_assert!((minutes as f64 - 1.0) * 60.0 < seconds || minutes == 0);
    }

    #[test]
    fn forward_timeline_is_monotonic(
        shapes in prop::collection::vec(task_shape(), 1..15),
        leg_seconds in prop::collection::vec(0.0f64..3_600.0, 15),
    ) {
        let tasks = build_tasks(&shapes);
        let seq = sequence(&tasks, GeoPoint::new(0.0, 0.0));
        let legs: Vec<_> = leg_seconds[..seq.order.len()]
            .iter()
            .map(|s| RouteLeg::new(*s))
            .collect();

        let entries = build_timeline(&seq.order, &legs, base()).unwrap();
        prop_assert_eq!(entries.len(), seq.order.len());

        let mut clock = base();
        for entry in &entries {
            let arrive = entry.arrive_time.unwrap();
            let depart = entry.depart_time.unwrap();
            prop_assert!(arrive >= clock);
            prop_assert!(depart >= arrive);
            prop_assert_eq!(entry.is_fixed, entry.status.is_some());
            clock = depart;
        }
    }
}
