//! Timeline building for an ordered errand list.
//!
//! This module provides:
//! - Route legs and ceiling travel-minute conversion
//! - Schedule entries with deadline classification
//! - Forward ("arrive ASAP") and backward ("latest safe departure") policies

mod builder;
mod entry;
mod leg;

pub use builder::{backward_entry, build_timeline, forward_entry, TimelineBuilder};
pub use entry::{DeadlineStatus, ScheduleEntry};
pub use leg::{travel_minutes, RouteLeg};
