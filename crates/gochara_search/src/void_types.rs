//! Types for void-of-course Moon detection.

use gochara_core::Body;

use crate::search_util::DEFAULT_MAX_ITERATIONS;

/// Major (Ptolemaic) aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Aspect {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

/// All major aspects, tightest angle first.
pub const MAJOR_ASPECTS: [Aspect; 5] = [
    Aspect::Conjunction,
    Aspect::Sextile,
    Aspect::Square,
    Aspect::Trine,
    Aspect::Opposition,
];

impl Aspect {
    /// Exact aspect angle in degrees.
    pub const fn angle_deg(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Offsets from the other body's longitude at which the aspect is exact.
    /// Conjunction and opposition have a single point.
    pub(crate) fn offsets(self) -> &'static [f64] {
        match self {
            Self::Conjunction => &[0.0],
            Self::Sextile => &[60.0, -60.0],
            Self::Square => &[90.0, -90.0],
            Self::Trine => &[120.0, -120.0],
            Self::Opposition => &[180.0],
        }
    }
}

/// The earliest aspect the Moon will perfect before leaving its sign.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AspectHit {
    pub body: Body,
    pub aspect: Aspect,
    /// Estimated days from the query time until the aspect is exact.
    pub days_until: f64,
}

/// Point-in-time void-of-course classification.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VoidStatus {
    /// Query time as Julian Date.
    pub jd: f64,
    pub is_void: bool,
    /// Moon's current sign index, 0 = Aries.
    pub moon_sign: u8,
    /// Days until the Moon leaves its sign. `None` when the Moon is not
    /// moving, which counts as void indefinitely.
    pub days_to_exit: Option<f64>,
    /// Earliest in-sign aspect perfection, `None` when void.
    pub next_aspect: Option<AspectHit>,
}

/// One void-of-course interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VoidPeriod {
    #[cfg_attr(feature = "serde", serde(rename = "startTime"))]
    pub start_jd: f64,
    #[cfg_attr(feature = "serde", serde(rename = "endTime"))]
    pub end_jd: f64,
    /// `(end_jd - start_jd) * 24`, never negative.
    pub duration_hours: f64,
    /// Sign the Moon is void in, 0 = Aries.
    pub moon_sign: u8,
    /// The Moon was already void at the start of the searched range.
    pub started_before_range_start: bool,
    /// The start could not be bracketed within the backward search cap.
    pub start_estimated: bool,
    /// The period was still open at range end and closed analytically.
    pub end_estimated: bool,
}

impl VoidPeriod {
    /// Build a period; an end before the start is clamped to the start.
    pub fn new(
        start_jd: f64,
        end_jd: f64,
        moon_sign: u8,
        started_before_range_start: bool,
        start_estimated: bool,
        end_estimated: bool,
    ) -> Self {
        let end_jd = end_jd.max(start_jd);
        Self {
            start_jd,
            end_jd,
            duration_hours: (end_jd - start_jd) * 24.0,
            moon_sign,
            started_before_range_start,
            start_estimated,
            end_estimated,
        }
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    /// True when `jd` falls inside `[start_jd, end_jd]`.
    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd <= self.end_jd
    }
}

/// Default tracked bodies: the Sun and the planets.
pub const DEFAULT_TRACKED_BODIES: [Body; 9] = [
    Body::Sun,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Configuration for void-of-course detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoidConfig {
    /// Coarse scan step in days (default 1 hour).
    pub step_size_days: f64,
    /// Bisection passes per bracket.
    pub max_iterations: u32,
    /// How far back to look for the onset of a period already in
    /// progress at range start (default 5 days).
    pub backward_search_days: f64,
    /// Fixed-point passes when projecting a moving body's aspect point
    /// (default 3). The projection is approximate; it assumes the tracked
    /// body moves much slower than the Moon until the aspect perfects.
    pub projection_passes: u32,
    /// Bodies the Moon can aspect.
    pub tracked_bodies: Vec<Body>,
    /// Aspects that end a void period.
    pub aspects: Vec<Aspect>,
}

impl Default for VoidConfig {
    fn default() -> Self {
        Self {
            step_size_days: 1.0 / 24.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            backward_search_days: 5.0,
            projection_passes: 3,
            tracked_bodies: DEFAULT_TRACKED_BODIES.to_vec(),
            aspects: MAJOR_ASPECTS.to_vec(),
        }
    }
}

impl VoidConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_size_days.is_finite() || self.step_size_days <= 0.0 {
            return Err("step_size_days must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.backward_search_days.is_finite() || self.backward_search_days < 0.0 {
            return Err("backward_search_days must be non-negative");
        }
        if self.projection_passes == 0 {
            return Err("projection_passes must be > 0");
        }
        if self.tracked_bodies.contains(&Body::Moon) {
            return Err("tracked_bodies must not include the Moon");
        }
        Ok(())
    }
}
