//! Location resolution for task drafts.
//!
//! Drafts arrive from the extraction step with an address, coordinates, or
//! both. Resolution happens entirely before sequencing: drafts that cannot be
//! placed on the map are dropped here and reported as warnings, so the
//! scheduling core only ever sees tasks with concrete coordinates.

mod chain;
mod gazetteer;
mod nominatim;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ResolverError;
use crate::geo::{GeoPoint, Location};
use crate::task::{DataWarning, Task};

pub use chain::ChainedResolver;
pub use gazetteer::GazetteerResolver;
pub use nominatim::NominatimResolver;

/// Turns a free-text place query into a location.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn resolve(&self, query: &str) -> Result<Location, ResolverError>;
}

/// A task as produced by upstream extraction, before location resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Keeps an existing id; a fresh one is minted otherwise
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub point: Option<GeoPoint>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub fixed_time: bool,
    #[serde(default)]
    pub must_arrive_by: Option<DateTime<Utc>>,
}

impl TaskDraft {
    fn into_task(self, location: Location) -> Task {
        let mut task = Task::new(self.title, location);
        if let Some(id) = self.id {
            task.id = id;
        }
        task.duration_minutes = self.duration_minutes;
        task.fixed_time = self.fixed_time;
        task.must_arrive_by = self.must_arrive_by;
        task
    }
}

/// Output of [`resolve_drafts`].
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub tasks: Vec<Task>,
    pub warnings: Vec<DataWarning>,
}

/// Resolve every draft, keeping input order.
///
/// Valid coordinates on a draft are used as-is; otherwise the address is
/// looked up through `resolver`. Drafts with neither are dropped with a
/// [`DataWarning::Unresolved`].
pub async fn resolve_drafts(drafts: Vec<TaskDraft>, resolver: &dyn LocationResolver) -> Resolved {
    let mut resolved = Resolved::default();

    for draft in drafts {
        if let Some(point) = draft.point.filter(GeoPoint::is_valid) {
            let mut location = Location::new(point);
            location.address = draft.address.clone();
            resolved.tasks.push(draft.into_task(location));
            continue;
        }

        let query = draft.address.clone().unwrap_or_default();
        if query.trim().is_empty() {
            let warning = DataWarning::Unresolved {
                title: draft.title,
                query,
            };
            tracing::warn!("{warning}");
            resolved.warnings.push(warning);
            continue;
        }

        match resolver.resolve(&query).await {
            Ok(location) => resolved.tasks.push(draft.into_task(location)),
            Err(e) => {
                tracing::warn!(resolver = resolver.name(), "lookup for '{query}' failed: {e}");
                let warning = DataWarning::Unresolved {
                    title: draft.title,
                    query,
                };
                resolved.warnings.push(warning);
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn gazetteer() -> GazetteerResolver {
        let mut places = BTreeMap::new();
        places.insert("Central Library".to_string(), GeoPoint::new(40.7532, -73.9822));
        GazetteerResolver::new(places)
    }

    #[tokio::test]
    async fn coordinates_skip_lookup() {
        let draft = TaskDraft {
            id: Some("keep-me".into()),
            title: "Coffee".into(),
            address: Some("somewhere unknown".into()),
            point: Some(GeoPoint::new(1.0, 2.0)),
            ..Default::default()
        };
        let resolved = resolve_drafts(vec![draft], &gazetteer()).await;
        assert_eq!(resolved.tasks.len(), 1);
        assert_eq!(resolved.tasks[0].id, "keep-me");
        assert_eq!(resolved.tasks[0].location.address.as_deref(), Some("somewhere unknown"));
        assert!(resolved.warnings.is_empty());
    }

    #[tokio::test]
    async fn address_is_looked_up() {
        let draft = TaskDraft {
            title: "Return books".into(),
            address: Some("central library".into()),
            duration_minutes: Some(10.0),
            ..Default::default()
        };
        let resolved = resolve_drafts(vec![draft], &gazetteer()).await;
        let task = &resolved.tasks[0];
        assert_eq!(task.location.point, GeoPoint::new(40.7532, -73.9822));
        assert_eq!(task.duration_minutes, Some(10.0));
        assert!(task.id.starts_with("task-"));
    }

    #[tokio::test]
    async fn unresolvable_drafts_are_dropped_with_warnings() {
        let drafts = vec![
            TaskDraft {
                title: "Nowhere".into(),
                ..Default::default()
            },
            TaskDraft {
                title: "Unknown".into(),
                address: Some("atlantis".into()),
                ..Default::default()
            },
            TaskDraft {
                title: "Bad coords".into(),
                point: Some(GeoPoint::new(120.0, 0.0)),
                ..Default::default()
            },
        ];
        let resolved = resolve_drafts(drafts, &gazetteer()).await;
        assert!(resolved.tasks.is_empty());
        assert_eq!(resolved.warnings.len(), 3);
        assert!(matches!(
            &resolved.warnings[1],
            DataWarning::Unresolved { query, .. } if query == "atlantis"
        ));
    }

    #[tokio::test]
    async fn fixed_fields_carry_over() {
        let deadline = Utc::now();
        let draft = TaskDraft {
            title: "Pick up parcel".into(),
            point: Some(GeoPoint::new(10.0, 10.0)),
            fixed_time: true,
            must_arrive_by: Some(deadline),
            ..Default::default()
        };
        let resolved = resolve_drafts(vec![draft], &gazetteer()).await;
        assert_eq!(resolved.tasks[0].deadline(), Some(deadline));
    }
}
