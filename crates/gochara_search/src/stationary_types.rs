//! Types for stationary point search.

use gochara_core::Body;

use crate::search_util::{DEFAULT_MAX_ITERATIONS, ScanConfig};

/// Station type: retrograde or direct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StationType {
    /// Longitude speed crosses from non-negative to negative (starts retrograde).
    StationRetrograde,
    /// Longitude speed crosses from negative to non-negative (ends retrograde).
    StationDirect,
}

impl StationType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::StationRetrograde => "station_retrograde",
            Self::StationDirect => "station_direct",
        }
    }
}

/// A stationary point: the body's longitude speed crosses zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StationaryEvent {
    /// Event time as Julian Date.
    #[cfg_attr(feature = "serde", serde(rename = "time"))]
    pub jd: f64,
    /// Which body.
    pub body: Body,
    /// Whether retrograde or direct station. Carried by the record tag.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub station_type: StationType,
    /// Ecliptic longitude at station in degrees [0, 360).
    pub longitude_deg: f64,
    /// Sign index at station, 0 = Aries.
    #[cfg_attr(feature = "serde", serde(rename = "sign"))]
    pub sign_index: u8,
    /// Degrees within the sign [0, 30).
    pub degree_in_sign: f64,
}

/// Configuration for stationary searches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StationaryConfig {
    /// Coarse scan step size in days.
    pub step_size_days: f64,
    /// Bisection passes per bracket (default 32).
    pub max_iterations: u32,
}

impl Default for StationaryConfig {
    fn default() -> Self {
        Self::inner_planet()
    }
}

impl StationaryConfig {
    /// Default config for inner planets (Mercury, Venus, Mars): 1-day step.
    pub fn inner_planet() -> Self {
        Self {
            step_size_days: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Default config for outer planets (Jupiter .. Pluto): 2-day step.
    pub fn outer_planet() -> Self {
        Self {
            step_size_days: 2.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Preset matching how fast the body moves.
    pub fn for_body(body: Body) -> Self {
        match body {
            Body::Mercury | Body::Venus | Body::Mars => Self::inner_planet(),
            _ => Self::outer_planet(),
        }
    }

    pub(crate) fn scan(&self) -> ScanConfig {
        ScanConfig::new(self.step_size_days, self.max_iterations)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        self.scan().validate()
    }
}
