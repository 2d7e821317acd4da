//! Eclipse proximity classifier.
//!
//! A new or full moon is an eclipse candidate when the luminaries stand
//! close enough to the lunar node axis. For a new moon the Sun's distance
//! to the nearer node is used, for a full moon the Moon's. The axis is
//! symmetric, so the node and antinode are interchangeable.
//!
//! This is a proximity test on longitudes only, not shadow geometry; it
//! flags the eclipse season, not magnitude or visibility.

use crate::lunar_phase_types::LunarPhase;
use crate::search_util::angular_distance;

/// Solar or lunar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EclipseKind {
    Solar,
    Lunar,
}

/// Eclipse flag attached to a lunar phase.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EclipseInfo {
    pub kind: EclipseKind,
    /// Shorter-arc distance to the nearer of node/antinode, degrees.
    pub distance_to_node_deg: f64,
}

/// Node-distance limits for eclipse candidacy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EclipseThresholds {
    /// Sun-to-node limit at new moon (default 18.5 deg).
    pub solar_deg: f64,
    /// Moon-to-node limit at full moon (default 12.0 deg).
    pub lunar_deg: f64,
}

impl Default for EclipseThresholds {
    fn default() -> Self {
        Self {
            solar_deg: 18.5,
            lunar_deg: 12.0,
        }
    }
}

impl EclipseThresholds {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.solar_deg.is_finite() || !(0.0..=180.0).contains(&self.solar_deg) {
            return Err("solar_deg must be within [0, 180]");
        }
        if !self.lunar_deg.is_finite() || !(0.0..=180.0).contains(&self.lunar_deg) {
            return Err("lunar_deg must be within [0, 180]");
        }
        Ok(())
    }
}

/// Distance from `lon` to the nearer end of the node axis.
pub fn node_axis_distance(lon_deg: f64, node_deg: f64) -> f64 {
    let to_node = angular_distance(lon_deg, node_deg);
    let to_antinode = angular_distance(lon_deg, node_deg + 180.0);
    to_node.min(to_antinode)
}

/// Classify a lunar phase instant as an eclipse candidate.
///
/// All longitudes in degrees, taken at the exact phase instant.
pub fn classify_eclipse(
    phase: LunarPhase,
    sun_lon_deg: f64,
    moon_lon_deg: f64,
    node_lon_deg: f64,
    thresholds: &EclipseThresholds,
) -> Option<EclipseInfo> {
    let (kind, distance, limit) = match phase {
        LunarPhase::NewMoon => (
            EclipseKind::Solar,
            node_axis_distance(sun_lon_deg, node_lon_deg),
            thresholds.solar_deg,
        ),
        LunarPhase::FullMoon => (
            EclipseKind::Lunar,
            node_axis_distance(moon_lon_deg, node_lon_deg),
            thresholds.lunar_deg,
        ),
    };

    (distance <= limit).then_some(EclipseInfo {
        kind,
        distance_to_node_deg: distance,
    })
}
