//! Types for sign ingress search.

use gochara_core::Body;

use crate::search_util::{DEFAULT_MAX_ITERATIONS, ScanConfig};

/// A body crossing from one zodiac sign into another.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IngressEvent {
    /// Event time as Julian Date.
    #[cfg_attr(feature = "serde", serde(rename = "time"))]
    pub jd: f64,
    /// Which body.
    pub body: Body,
    /// Sign index held just before the crossing.
    pub from_sign: u8,
    /// Sign index entered. Never equal to `from_sign`.
    pub to_sign: u8,
    /// Whether the body is retrograde at the crossing.
    pub retrograde: bool,
    /// Ecliptic longitude at the refined time in degrees [0, 360).
    pub longitude_deg: f64,
}

/// Configuration for ingress searches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IngressConfig {
    /// Coarse scan step size in days.
    pub step_size_days: f64,
    /// Bisection passes per bracket.
    pub max_iterations: u32,
    /// How far next/prev searches look before giving up, in days.
    pub max_scan_days: f64,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self::for_body(Body::Sun)
    }
}

impl IngressConfig {
    /// Preset tuned to the body's speed and longest stay in one sign.
    ///
    /// The step stays well below the shortest time a body can spend in a
    /// sign, including retrograde re-entries near a boundary.
    pub fn for_body(body: Body) -> Self {
        let (step_size_days, max_scan_days) = match body {
            Body::Moon => (0.25, 5.0),
            Body::Sun => (0.5, 40.0),
            Body::Mercury | Body::Venus => (0.5, 250.0),
            Body::Mars => (1.0, 400.0),
            Body::Jupiter => (2.0, 800.0),
            Body::MeanNode => (2.0, 800.0),
            Body::Saturn => (2.0, 1500.0),
            Body::Uranus => (2.0, 3500.0),
            Body::Neptune => (2.0, 6500.0),
            Body::Pluto => (2.0, 12_000.0),
        };
        Self {
            step_size_days,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_scan_days,
        }
    }

    pub(crate) fn scan(&self) -> ScanConfig {
        ScanConfig::new(self.step_size_days, self.max_iterations)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        self.scan().validate()?;
        if !self.max_scan_days.is_finite() || self.max_scan_days <= 0.0 {
            return Err("max_scan_days must be positive");
        }
        Ok(())
    }
}
