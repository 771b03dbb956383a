//! # errandflow Core Library
//!
//! Turns a set of errands, each with a location and either a hard deadline
//! or flexible timing, into one ordered itinerary with arrival/departure
//! timestamps and travel estimates between stops.
//!
//! ## Architecture
//!
//! - **Sequencer**: fixed (deadline) stops first in deadline order, then
//!   flexible stops by proximity. Pure and synchronous.
//! - **Timeline Builder**: walks the order with one travel leg per stop and
//!   produces timestamps plus on-time/tight/late classification. Pure and
//!   synchronous.
//! - **Collaborators**: travel oracles and location resolvers are async
//!   traits; they are queried before the pure core runs, never inside it.
//! - **Planner**: glue that sequences, queries legs, and builds the timeline.
//!
//! ## Key Components
//!
//! - [`Sequencer`]: visit ordering
//! - [`TimelineBuilder`]: timestamp computation
//! - [`Planner`]: end-to-end planning against a [`TravelOracle`]
//! - [`Config`]: application configuration management

pub mod error;
pub mod geo;
pub mod oracle;
pub mod planner;
pub mod resolve;
pub mod schedule;
pub mod sequencer;
pub mod storage;
pub mod task;
pub mod timeline;

pub use error::{ConfigError, CoreError, OracleError, ResolverError, ValidationError};
pub use geo::{haversine_meters, GeoPoint, Location};
pub use oracle::{FallbackOracle, GreatCircleOracle, OsrmOracle, TravelOracle};
pub use planner::{Itinerary, ItinerarySummary, Planner};
pub use resolve::{
    resolve_drafts, ChainedResolver, GazetteerResolver, LocationResolver, NominatimResolver,
    Resolved, TaskDraft,
};
pub use schedule::{FlexibleOrdering, ScheduleSettings, TimingPolicy};
pub use sequencer::{sequence, Sequence, Sequencer};
pub use storage::Config;
pub use task::{DataWarning, Task};
pub use timeline::{
    backward_entry, build_timeline, forward_entry, travel_minutes, DeadlineStatus, RouteLeg,
    ScheduleEntry, TimelineBuilder,
};
