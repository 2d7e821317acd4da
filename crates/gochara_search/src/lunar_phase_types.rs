//! Types for new/full moon search.

use crate::eclipse::{EclipseInfo, EclipseThresholds};
use crate::search_util::DEFAULT_MAX_ITERATIONS;

/// Lunar phase type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LunarPhase {
    /// Moon-Sun elongation crosses 0 deg.
    NewMoon,
    /// Moon-Sun elongation crosses 180 deg.
    FullMoon,
}

impl LunarPhase {
    /// Target elongation (Moon minus Sun) in degrees.
    pub const fn target_deg(self) -> f64 {
        match self {
            Self::NewMoon => 0.0,
            Self::FullMoon => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "new_moon",
            Self::FullMoon => "full_moon",
        }
    }
}

/// A new or full moon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LunarPhaseEvent {
    /// Event time as Julian Date.
    #[cfg_attr(feature = "serde", serde(rename = "time"))]
    pub jd: f64,
    /// New or full. Carried by the record tag.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub phase: LunarPhase,
    /// Moon longitude at the event, degrees [0, 360).
    pub moon_longitude_deg: f64,
    /// Sun longitude at the event, degrees [0, 360).
    pub sun_longitude_deg: f64,
    /// Moon's sign index, 0 = Aries.
    pub moon_sign: u8,
    /// Sun's sign index, 0 = Aries.
    pub sun_sign: u8,
    /// Present only when the luminaries are within the eclipse limits.
    pub eclipse: Option<EclipseInfo>,
}

/// Configuration for lunar phase searches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LunarPhaseConfig {
    /// Coarse scan step in days. Elongation advances ~12 deg/day, so 0.5
    /// day steps stay well inside the wrap-detection window.
    pub step_size_days: f64,
    /// Bisection passes per bracket.
    pub max_iterations: u32,
    /// Query the mean node and classify eclipses at each phase.
    pub classify_eclipses: bool,
    /// Node-distance limits for eclipse classification.
    pub eclipse: EclipseThresholds,
}

impl Default for LunarPhaseConfig {
    fn default() -> Self {
        Self {
            step_size_days: 0.5,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            classify_eclipses: true,
            eclipse: EclipseThresholds::default(),
        }
    }
}

impl LunarPhaseConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_size_days.is_finite() || self.step_size_days <= 0.0 {
            return Err("step_size_days must be positive");
        }
        // Wider steps can jump over the 300/60 deg wrap window entirely.
        if self.step_size_days > 2.0 {
            return Err("step_size_days must be <= 2 days for lunar phases");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        self.eclipse.validate()
    }
}
