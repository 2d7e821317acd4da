//! Body catalogue and position-oracle contract.
//!
//! This crate defines the boundary between the event engine and whatever
//! computes celestial positions. Detectors in `gochara_search` only ever
//! see a [`PositionOracle`]: give it a body and a Julian Date, get back a
//! [`CelestialSample`] with ecliptic longitude and longitude speed.
//!
//! A low-precision analytic implementation, [`MeanElementsOracle`], is
//! provided for tooling and benchmarks.

use std::sync::Arc;

pub mod mean_elements;

pub use mean_elements::MeanElementsOracle;

/// Bodies the engine can ask an oracle about.
///
/// `MeanNode` is the Moon's mean ascending node; the descending node is
/// always `MeanNode + 180` and is not a separate body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
}

/// All bodies in catalogue order.
pub const ALL_BODIES: [Body; 11] = [
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
    Body::MeanNode,
];

impl Body {
    /// Lower-case English name, as used on the command line and in records.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
            Self::MeanNode => "mean_node",
        }
    }

    /// Parse a body name, case-insensitively. Accepts `node` for the mean node.
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "node" | "mean-node" => return Some(Self::MeanNode),
            _ => {}
        }
        ALL_BODIES.iter().copied().find(|b| b.name() == lower)
    }

    /// All bodies in catalogue order.
    pub const fn all() -> &'static [Body; 11] {
        &ALL_BODIES
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize an angle to [0, 360) degrees.
///
/// Uses the double remainder so that tiny negative inputs land on 0 rather
/// than on 360.
pub fn normalize_360(deg: f64) -> f64 {
    let r = ((deg % 360.0) + 360.0) % 360.0;
    if r >= 360.0 { 0.0 } else { r }
}

/// One oracle answer: a body's apparent ecliptic position at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialSample {
    /// Sample time as Julian Date.
    pub jd: f64,
    /// Which body.
    pub body: Body,
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Longitude speed in degrees per day. Negative means retrograde.
    pub speed_deg_per_day: f64,
    /// `speed_deg_per_day < 0`.
    pub retrograde: bool,
}

impl CelestialSample {
    /// Build a sample, normalizing the longitude and deriving `retrograde`.
    pub fn new(body: Body, jd: f64, longitude_deg: f64, speed_deg_per_day: f64) -> Self {
        Self {
            jd,
            body,
            longitude_deg: normalize_360(longitude_deg),
            speed_deg_per_day,
            retrograde: speed_deg_per_day < 0.0,
        }
    }
}

/// Oracle failures. Detectors never mask these; they propagate to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    /// The oracle has no data for this epoch.
    #[error("epoch out of range: {jd}")]
    EpochOutOfRange { jd: f64 },
    /// The oracle cannot compute this body.
    #[error("unsupported body: {0}")]
    UnsupportedBody(Body),
    #[error("internal oracle error: {0}")]
    Internal(String),
}

/// Source of body positions.
///
/// Implementations must be deterministic: the same `(body, jd)` always
/// yields the same sample. Detectors rely on this to bisect brackets and
/// may call `sample` many times for the same instant.
///
/// `Send + Sync` so one oracle can serve searches on several threads.
pub trait PositionOracle: Send + Sync {
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError>;
}

impl<T: PositionOracle + ?Sized> PositionOracle for &T {
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError> {
        (**self).sample(body, jd)
    }
}

impl<T: PositionOracle + ?Sized> PositionOracle for Box<T> {
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError> {
        (**self).sample(body, jd)
    }
}

impl<T: PositionOracle + ?Sized> PositionOracle for Arc<T> {
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError> {
        (**self).sample(body, jd)
    }
}

/// Adapter turning a closure into a [`PositionOracle`].
///
/// ```rust,ignore
/// let oracle = FnOracle::new(|body, jd| Ok(CelestialSample::new(body, jd, jd, 1.0)));
/// ```
pub struct FnOracle<F> {
    f: F,
}

impl<F> FnOracle<F>
where
    F: Fn(Body, f64) -> Result<CelestialSample, OracleError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnOracle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOracle").finish_non_exhaustive()
    }
}

impl<F> PositionOracle for FnOracle<F>
where
    F: Fn(Body, f64) -> Result<CelestialSample, OracleError> + Send + Sync,
{
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError> {
        (self.f)(body, jd)
    }
}
