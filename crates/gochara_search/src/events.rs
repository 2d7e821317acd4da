//! Combined event stream: stations, ingresses and lunar phases in one
//! time-ordered list.

use gochara_core::{Body, PositionOracle};
use tracing::debug;

use crate::error::SearchError;
use crate::ingress::search_ingresses;
use crate::ingress_types::{IngressConfig, IngressEvent};
use crate::lunar_phase::search_lunar_phases;
use crate::lunar_phase_types::{LunarPhase, LunarPhaseConfig, LunarPhaseEvent};
use crate::stationary::search_stationary;
use crate::stationary_types::{StationType, StationaryConfig, StationaryEvent};

/// One detected event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AstroEvent {
    StationRetrograde(StationaryEvent),
    StationDirect(StationaryEvent),
    Ingress(IngressEvent),
    NewMoon(LunarPhaseEvent),
    FullMoon(LunarPhaseEvent),
}

impl AstroEvent {
    /// Event time as Julian Date.
    pub fn jd(&self) -> f64 {
        match self {
            Self::StationRetrograde(e) | Self::StationDirect(e) => e.jd,
            Self::Ingress(e) => e.jd,
            Self::NewMoon(e) | Self::FullMoon(e) => e.jd,
        }
    }

    /// Record tag, matching the serialized `type` field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StationRetrograde(_) => "station_retrograde",
            Self::StationDirect(_) => "station_direct",
            Self::Ingress(_) => "ingress",
            Self::NewMoon(_) => "new_moon",
            Self::FullMoon(_) => "full_moon",
        }
    }

    /// The body the event belongs to; `None` for lunar phases.
    pub fn body(&self) -> Option<Body> {
        match self {
            Self::StationRetrograde(e) | Self::StationDirect(e) => Some(e.body),
            Self::Ingress(e) => Some(e.body),
            Self::NewMoon(_) | Self::FullMoon(_) => None,
        }
    }
}

impl From<StationaryEvent> for AstroEvent {
    fn from(e: StationaryEvent) -> Self {
        match e.station_type {
            StationType::StationRetrograde => Self::StationRetrograde(e),
            StationType::StationDirect => Self::StationDirect(e),
        }
    }
}

impl From<IngressEvent> for AstroEvent {
    fn from(e: IngressEvent) -> Self {
        Self::Ingress(e)
    }
}

impl From<LunarPhaseEvent> for AstroEvent {
    fn from(e: LunarPhaseEvent) -> Self {
        match e.phase {
            LunarPhase::NewMoon => Self::NewMoon(e),
            LunarPhase::FullMoon => Self::FullMoon(e),
        }
    }
}

/// Which detectors `search_events` runs, and with what settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventSearchConfig {
    /// Bodies searched for stations. Sun and Moon are rejected.
    pub station_bodies: Vec<Body>,
    /// Bodies searched for sign ingresses.
    pub ingress_bodies: Vec<Body>,
    pub include_lunar_phases: bool,
    /// Overrides the per-body station preset when set.
    pub stationary: Option<StationaryConfig>,
    /// Overrides the per-body ingress preset when set.
    pub ingress: Option<IngressConfig>,
    pub lunar_phase: LunarPhaseConfig,
}

impl Default for EventSearchConfig {
    fn default() -> Self {
        Self {
            station_bodies: vec![
                Body::Mercury,
                Body::Venus,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Uranus,
                Body::Neptune,
                Body::Pluto,
            ],
            ingress_bodies: vec![
                Body::Sun,
                Body::Moon,
                Body::Mercury,
                Body::Venus,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Uranus,
                Body::Neptune,
                Body::Pluto,
            ],
            include_lunar_phases: true,
            stationary: None,
            ingress: None,
            lunar_phase: LunarPhaseConfig::default(),
        }
    }
}

impl EventSearchConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self
            .station_bodies
            .iter()
            .any(|b| matches!(b, Body::Sun | Body::Moon))
        {
            return Err("station_bodies must not include the Sun or Moon");
        }
        if let Some(c) = &self.stationary {
            c.validate()?;
        }
        if let Some(c) = &self.ingress {
            c.validate()?;
        }
        self.lunar_phase.validate()
    }

    fn stationary_for(&self, body: Body) -> StationaryConfig {
        self.stationary
            .unwrap_or_else(|| StationaryConfig::for_body(body))
    }

    fn ingress_for(&self, body: Body) -> IngressConfig {
        self.ingress.unwrap_or_else(|| IngressConfig::for_body(body))
    }
}

/// Run every configured detector over `[jd_start, jd_end]` and merge the
/// results in time order.
pub fn search_events<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd_start: f64,
    jd_end: f64,
    config: &EventSearchConfig,
) -> Result<Vec<AstroEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let mut events: Vec<AstroEvent> = Vec::new();
    if jd_end <= jd_start {
        return Ok(events);
    }

    for &body in &config.station_bodies {
        let found = search_stationary(oracle, body, jd_start, jd_end, &config.stationary_for(body))?;
        debug!(body = body.name(), count = found.len(), "stations collected");
        events.extend(found.into_iter().map(AstroEvent::from));
    }

    for &body in &config.ingress_bodies {
        let found = search_ingresses(oracle, body, jd_start, jd_end, &config.ingress_for(body))?;
        debug!(body = body.name(), count = found.len(), "ingresses collected");
        events.extend(found.into_iter().map(AstroEvent::from));
    }

    if config.include_lunar_phases {
        let found = search_lunar_phases(oracle, jd_start, jd_end, &config.lunar_phase)?;
        debug!(count = found.len(), "lunar phases collected");
        events.extend(found.into_iter().map(AstroEvent::from));
    }

    events.sort_by(|a, b| a.jd().total_cmp(&b.jd()));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{CelestialSample, FnOracle};

    /// Sun t deg/day, Moon 13t, Mars oscillating with stations at 10 and 30.
    fn oracle() -> impl PositionOracle {
        FnOracle::new(|body, t| {
            let (lon, speed) = match body {
                Body::Sun => (t, 1.0),
                Body::Moon => (13.0 * t, 13.0),
                _ => {
                    // speed = (t - 10)(t - 30) / 100, longitude its integral
                    let speed = (t - 10.0) * (t - 30.0) / 100.0;
                    let lon = (t * t * t / 3.0 - 20.0 * t * t + 300.0 * t) / 100.0 + 100.0;
                    (lon, speed)
                }
            };
            Ok(CelestialSample::new(body, t, lon, speed))
        })
    }

    fn config() -> EventSearchConfig {
        EventSearchConfig {
            station_bodies: vec![Body::Mars],
            ingress_bodies: vec![Body::Sun],
            ..EventSearchConfig::default()
        }
    }

    #[test]
    fn merges_in_time_order() {
        let events = search_events(&oracle(), 0.5, 40.0, &config()).unwrap();
        assert!(events.windows(2).all(|w| w[0].jd() <= w[1].jd()));

        let kinds: Vec<&str> = events.iter().map(AstroEvent::kind).collect();
        assert!(kinds.contains(&"station_retrograde"));
        assert!(kinds.contains(&"station_direct"));
        assert!(kinds.contains(&"ingress"));
        assert!(kinds.contains(&"new_moon"));
        assert!(kinds.contains(&"full_moon"));
    }

    #[test]
    fn station_events_land_on_roots() {
        let events = search_events(&oracle(), 0.5, 40.0, &config()).unwrap();
        let stations: Vec<&AstroEvent> = events
            .iter()
            .filter(|e| e.kind().starts_with("station"))
            .collect();
        assert_eq!(stations.len(), 2);
        assert!((stations[0].jd() - 10.0).abs() < 1e-6);
        assert!(matches!(stations[0], AstroEvent::StationRetrograde(_)));
        assert!((stations[1].jd() - 30.0).abs() < 1e-6);
        assert!(matches!(stations[1], AstroEvent::StationDirect(_)));
        assert_eq!(stations[0].body(), Some(Body::Mars));
    }

    #[test]
    fn lunar_phases_can_be_disabled() {
        let cfg = EventSearchConfig {
            include_lunar_phases: false,
            ..config()
        };
        let events = search_events(&oracle(), 0.5, 40.0, &cfg).unwrap();
        assert!(events.iter().all(|e| e.body().is_some()));
    }

    #[test]
    fn rejects_luminary_stations() {
        let cfg = EventSearchConfig {
            station_bodies: vec![Body::Moon],
            ..config()
        };
        let err = search_events(&oracle(), 0.0, 10.0, &cfg);
        assert!(matches!(err, Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn empty_range() {
        assert!(search_events(&oracle(), 5.0, 5.0, &config()).unwrap().is_empty());
    }
}
