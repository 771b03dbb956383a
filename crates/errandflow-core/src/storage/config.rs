//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Scheduling constants (default duration, arrival buffer, tight threshold)
//! - Timing policy and flexible-task ordering
//! - Travel estimation (average speed, routing service)
//! - Geocoding (lookup service, named places)
//!
//! Configuration is stored at `~/.config/errandflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::geo::GeoPoint;
use crate::oracle::{FallbackOracle, GreatCircleOracle, OsrmOracle, TravelOracle};
use crate::resolve::{ChainedResolver, GazetteerResolver, LocationResolver, NominatimResolver};
use crate::schedule::{FlexibleOrdering, ScheduleSettings, TimingPolicy};

/// Scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: f64,
    #[serde(default = "default_5")]
    pub arrival_buffer_minutes: i64,
    #[serde(default = "default_5")]
    pub tight_threshold_minutes: i64,
    #[serde(default)]
    pub timing_policy: TimingPolicy,
    #[serde(default)]
    pub flexible_ordering: FlexibleOrdering,
}

/// Travel-time estimation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    #[serde(default = "default_speed_kmh")]
    pub average_speed_kmh: f64,
    #[serde(default = "default_detour_factor")]
    pub detour_factor: f64,
    /// OSRM-compatible routing service; geometric estimates only when unset.
    #[serde(default)]
    pub routing_url: Option<String>,
    #[serde(default = "default_routing_profile")]
    pub routing_profile: String,
}

/// Place lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim-compatible search service; named places only when unset.
    #[serde(default)]
    pub nominatim_url: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Fallback gazetteer: place name -> coordinates
    #[serde(default)]
    pub places: BTreeMap<String, GeoPoint>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/errandflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub travel: TravelConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
}

/// Upper bound for minute-valued schedule settings (one week)
const MAX_SETTING_MINUTES: i64 = 7 * 24 * 60;

// Default functions
fn default_duration_minutes() -> f64 {
    30.0
}
fn default_5() -> i64 {
    5
}
fn default_speed_kmh() -> f64 {
    30.0
}
fn default_detour_factor() -> f64 {
    1.3
}
fn default_routing_profile() -> String {
    "driving".into()
}
fn default_user_agent() -> String {
    concat!("errandflow/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
            arrival_buffer_minutes: default_5(),
            tight_threshold_minutes: default_5(),
            timing_policy: TimingPolicy::default(),
            flexible_ordering: FlexibleOrdering::default(),
        }
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: default_speed_kmh(),
            detour_factor: default_detour_factor(),
            routing_url: None,
            routing_profile: default_routing_profile(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: None,
            user_agent: default_user_agent(),
            places: BTreeMap::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/errandflow"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if no file exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Reject values the scheduling core cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        let s = &self.schedule;
        let in_range = |minutes: f64| (0.0..=MAX_SETTING_MINUTES as f64).contains(&minutes);
        if !in_range(s.default_duration_minutes) {
            return Err(invalid("schedule.default_duration_minutes", "must be between 0 and 10080"));
        }
        if !(0..=MAX_SETTING_MINUTES).contains(&s.arrival_buffer_minutes) {
            return Err(invalid("schedule.arrival_buffer_minutes", "must be between 0 and 10080"));
        }
        if !(0..=MAX_SETTING_MINUTES).contains(&s.tight_threshold_minutes) {
            return Err(invalid("schedule.tight_threshold_minutes", "must be between 0 and 10080"));
        }

        let t = &self.travel;
        if !(t.average_speed_kmh.is_finite() && t.average_speed_kmh > 0.0) {
            return Err(invalid("travel.average_speed_kmh", "must be > 0"));
        }
        if !(t.detour_factor.is_finite() && t.detour_factor >= 1.0) {
            return Err(invalid("travel.detour_factor", "must be >= 1.0"));
        }

        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Does not persist; call [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the resulting config fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Scheduling knobs for the core.
    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            default_duration_minutes: self.schedule.default_duration_minutes,
            arrival_buffer_minutes: self.schedule.arrival_buffer_minutes,
            tight_threshold_minutes: self.schedule.tight_threshold_minutes,
            timing_policy: self.schedule.timing_policy,
            flexible_ordering: self.schedule.flexible_ordering,
        }
    }

    /// Geometric oracle, fronted by the routing service when one is configured.
    pub fn travel_oracle(&self) -> Result<Arc<dyn TravelOracle>, CoreError> {
        let geometric =
            GreatCircleOracle::new(self.travel.average_speed_kmh, self.travel.detour_factor)?;

        Ok(match &self.travel.routing_url {
            Some(url) => {
                let routed = OsrmOracle::new(url, self.travel.routing_profile.clone())?;
                Arc::new(FallbackOracle::new(Box::new(routed), Box::new(geometric)))
            }
            None => Arc::new(geometric),
        })
    }

    /// Named-place gazetteer, behind the lookup service when one is configured.
    pub fn location_resolver(&self) -> Result<Box<dyn LocationResolver>, CoreError> {
        let gazetteer = GazetteerResolver::new(self.geocoding.places.clone());

        Ok(match &self.geocoding.nominatim_url {
            Some(url) => {
                let primary = NominatimResolver::new(url, self.geocoding.user_agent.clone())?;
                Box::new(ChainedResolver::new(Box::new(primary), Box::new(gazetteer)))
            }
            None => Box::new(gazetteer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.schedule.default_duration_minutes, 30.0);
        assert_eq!(parsed.travel.routing_profile, "driving");
        assert!(parsed.travel.routing_url.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [schedule]
            timing_policy = "backward"

            [geocoding.places]
            home = { lat = 1.5, lng = 2.5 }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.schedule.timing_policy, TimingPolicy::Backward);
        assert_eq!(parsed.schedule.arrival_buffer_minutes, 5);
        assert_eq!(parsed.travel.average_speed_kmh, 30.0);
        assert_eq!(parsed.geocoding.places["home"], GeoPoint::new(1.5, 2.5));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.arrival_buffer_minutes").as_deref(), Some("5"));
        assert_eq!(cfg.get("schedule.timing_policy").as_deref(), Some("forward"));
        assert_eq!(cfg.get("travel.routing_profile").as_deref(), Some("driving"));
        assert!(cfg.get("travel.missing_key").is_none());
    }

    #[test]
    fn set_updates_numbers_enums_and_optionals() {
        let mut cfg = Config::default();
        cfg.set("schedule.default_duration_minutes", "45").unwrap();
        cfg.set("schedule.timing_policy", "backward").unwrap();
        cfg.set("travel.routing_url", "http://localhost:5000").unwrap();
        cfg.set("travel.detour_factor", "1.5").unwrap();

        assert_eq!(cfg.schedule.default_duration_minutes, 45.0);
        assert_eq!(cfg.schedule.timing_policy, TimingPolicy::Backward);
        assert_eq!(cfg.travel.routing_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(cfg.travel.detour_factor, 1.5);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("schedule.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_without_mutating() {
        let mut cfg = Config::default();
        assert!(cfg.set("schedule.arrival_buffer_minutes", "soon").is_err());
        assert!(cfg.set("schedule.timing_policy", "sideways").is_err());
        assert!(cfg.set("travel.average_speed_kmh", "0").is_err());
        assert_eq!(cfg.schedule.arrival_buffer_minutes, 5);
        assert_eq!(cfg.travel.average_speed_kmh, 30.0);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.schedule.tight_threshold_minutes, 5);
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("schedule.flexible_ordering", "chained").unwrap();
        cfg.geocoding
            .places
            .insert("Gym".into(), GeoPoint::new(10.0, 20.0));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.schedule.flexible_ordering, FlexibleOrdering::Chained);
        assert_eq!(loaded.geocoding.places["Gym"], GeoPoint::new(10.0, 20.0));
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[travel]\ndetour_factor = 0.2\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn minute_settings_are_bounded() {
        let mut cfg = Config::default();
        assert!(cfg.set("schedule.arrival_buffer_minutes", "1000000000000000").is_err());
        assert!(cfg.set("schedule.tight_threshold_minutes", "10081").is_err());
        assert!(cfg.set("schedule.default_duration_minutes", "1e13").is_err());
        assert_eq!(cfg.schedule.arrival_buffer_minutes, 5);

        cfg.set("schedule.arrival_buffer_minutes", "10080").unwrap();
        assert_eq!(cfg.schedule.arrival_buffer_minutes, 10080);
    }

    #[test]
    fn schedule_settings_mirror_config() {
        let mut cfg = Config::default();
        cfg.set("schedule.tight_threshold_minutes", "8").unwrap();
        let settings = cfg.schedule_settings();
        assert_eq!(settings.tight_threshold_minutes, 8);
        assert_eq!(settings.arrival_buffer_minutes, 5);
    }

    #[test]
    fn oracle_and_resolver_follow_configured_services() {
        let mut cfg = Config::default();
        assert_eq!(cfg.travel_oracle().unwrap().name(), "great_circle");
        assert_eq!(cfg.location_resolver().unwrap().name(), "gazetteer");

        cfg.set("travel.routing_url", "http://localhost:5000").unwrap();
        cfg.set("geocoding.nominatim_url", "http://localhost:8080").unwrap();
        assert_eq!(cfg.travel_oracle().unwrap().name(), "fallback");
        assert_eq!(cfg.location_resolver().unwrap().name(), "chained");
    }
}
