//! Detector settings loaded from a TOML file.
//!
//! Every table is optional; missing tables and keys fall back to the
//! library defaults. Station and ingress tables, when present, replace the
//! per-body presets for every body. The `[events]` table only selects which
//! bodies and detectors the combined stream runs; the detector tables above
//! apply to it as they do to the single-detector commands.
//!
//! ```toml
//! [stationary]
//! step_size_days = 0.5
//!
//! [lunar_phase.eclipse]
//! solar_deg = 17.0
//!
//! [void]
//! step_size_days = 0.02
//! tracked_bodies = ["sun", "mercury", "venus", "mars", "jupiter", "saturn"]
//!
//! [events]
//! station_bodies = ["mercury", "mars"]
//! include_lunar_phases = false
//! ```

use std::path::Path;

use gochara_core::Body;
use gochara_search::{
    EventSearchConfig, IngressConfig, LunarPhaseConfig, StationaryConfig, VoidConfig,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub stationary: Option<StationaryConfig>,
    pub ingress: Option<IngressConfig>,
    pub lunar_phase: LunarPhaseConfig,
    #[serde(rename = "void")]
    pub void_of_course: VoidConfig,
    pub events: EventsTable,
}

/// Detector selection for the `events` command. Unset keys keep the
/// library defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsTable {
    pub station_bodies: Option<Vec<Body>>,
    pub ingress_bodies: Option<Vec<Body>>,
    pub include_lunar_phases: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::parse(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn stationary_for(&self, body: Body) -> StationaryConfig {
        self.stationary
            .unwrap_or_else(|| StationaryConfig::for_body(body))
    }

    pub fn ingress_for(&self, body: Body) -> IngressConfig {
        self.ingress.unwrap_or_else(|| IngressConfig::for_body(body))
    }

    /// Event-stream settings: the `[events]` selection combined with the
    /// detector tables.
    pub fn events(&self) -> EventSearchConfig {
        let defaults = EventSearchConfig::default();
        EventSearchConfig {
            station_bodies: self
                .events
                .station_bodies
                .clone()
                .unwrap_or(defaults.station_bodies),
            ingress_bodies: self
                .events
                .ingress_bodies
                .clone()
                .unwrap_or(defaults.ingress_bodies),
            include_lunar_phases: self
                .events
                .include_lunar_phases
                .unwrap_or(defaults.include_lunar_phases),
            stationary: self.stationary,
            ingress: self.ingress,
            lunar_phase: self.lunar_phase,
        }
    }
}
