//! Low-precision analytic oracle from mean orbital elements.
//!
//! Sun, Moon and the Moon's mean node move at their mean rates. Planets
//! ride circular, coplanar heliocentric orbits and are projected to a
//! geocentric longitude; the longitude rate is the analytic derivative of
//! that projection, so inner and outer planets show genuine retrograde
//! loops around conjunction/opposition.
//!
//! Accuracy is a few degrees (eccentricity and inclination are ignored).
//! Good enough for tooling, demos and benchmarks, not for publication.
//!
//! Elements: J2000 mean longitudes and rates from the JPL "Approximate
//! Positions of the Planets" table; Moon and node from the standard mean
//! lunar argument polynomials truncated to the linear term.

use crate::{Body, CelestialSample, OracleError, PositionOracle, normalize_360};

/// J2000.0 epoch as Julian Date.
const J2000_JD: f64 = 2_451_545.0;

/// 1900-Jan-01 00:00.
const DEFAULT_MIN_JD: f64 = 2_415_020.5;

/// 2100-Jan-01 00:00.
const DEFAULT_MAX_JD: f64 = 2_488_069.5;

/// Earth-Moon barycenter: (mean longitude at J2000 deg, rate deg/day, a AU).
const EARTH: (f64, f64, f64) = (100.464_571_66, 0.985_609_102, 1.000_002_61);

const MOON_L0_DEG: f64 = 218.316_447_7;
const MOON_RATE_DEG_PER_DAY: f64 = 13.176_396_475;

const NODE_L0_DEG: f64 = 125.044_547_9;
const NODE_RATE_DEG_PER_DAY: f64 = -0.052_953_766;

/// Circular heliocentric elements for one planet.
fn planet_elements(body: Body) -> Option<(f64, f64, f64)> {
    match body {
        Body::Mercury => Some((252.250_323_50, 4.092_338_785, 0.387_099_27)),
        Body::Venus => Some((181.979_099_50, 1.602_130_469, 0.723_335_66)),
        Body::Mars => Some((355.446_567_95, 0.524_032_928, 1.523_710_34)),
        Body::Jupiter => Some((34.396_440_51, 0.083_086_821, 5.202_887_00)),
        Body::Saturn => Some((49.954_244_23, 0.033_470_051, 9.536_675_94)),
        Body::Uranus => Some((313.238_104_51, 0.011_731_199, 19.189_164_64)),
        Body::Neptune => Some((304.879_970_31, 0.005_981_094, 30.069_922_76)),
        Body::Pluto => Some((238.929_038_33, 0.003_975_573, 39.482_116_75)),
        _ => None,
    }
}

/// Heliocentric position and velocity on a circular orbit, in AU and AU/day.
fn circular_state(l0_deg: f64, rate_deg_per_day: f64, a_au: f64, d: f64) -> [f64; 4] {
    let l = (l0_deg + rate_deg_per_day * d).to_radians();
    let n = rate_deg_per_day.to_radians();
    let (sin_l, cos_l) = l.sin_cos();
    [a_au * cos_l, a_au * sin_l, -a_au * n * sin_l, a_au * n * cos_l]
}

/// Mean-elements oracle with a bounded validity range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElementsOracle {
    min_jd: f64,
    max_jd: f64,
}

impl Default for MeanElementsOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanElementsOracle {
    /// Oracle valid for 1900-2100.
    pub const fn new() -> Self {
        Self {
            min_jd: DEFAULT_MIN_JD,
            max_jd: DEFAULT_MAX_JD,
        }
    }

    /// Supported epoch range `(min_jd, max_jd)`, inclusive.
    pub const fn valid_range(&self) -> (f64, f64) {
        (self.min_jd, self.max_jd)
    }

    fn check_epoch(&self, jd: f64) -> Result<(), OracleError> {
        if !jd.is_finite() || jd < self.min_jd || jd > self.max_jd {
            return Err(OracleError::EpochOutOfRange { jd });
        }
        Ok(())
    }

    /// Geocentric longitude (deg) and longitude rate (deg/day) of a planet.
    fn planet_geocentric(elements: (f64, f64, f64), d: f64) -> (f64, f64) {
        let p = circular_state(elements.0, elements.1, elements.2, d);
        let e = circular_state(EARTH.0, EARTH.1, EARTH.2, d);
        let x = p[0] - e[0];
        let y = p[1] - e[1];
        let vx = p[2] - e[2];
        let vy = p[3] - e[3];
        let lon = y.atan2(x).to_degrees();
        let rate = ((x * vy - y * vx) / (x * x + y * y)).to_degrees();
        (lon, rate)
    }
}

impl PositionOracle for MeanElementsOracle {
    fn sample(&self, body: Body, jd: f64) -> Result<CelestialSample, OracleError> {
        self.check_epoch(jd)?;
        let d = jd - J2000_JD;

        let (lon, speed) = match body {
            // Geocentric Sun is the heliocentric Earth turned around.
            Body::Sun => (EARTH.0 + 180.0 + EARTH.1 * d, EARTH.1),
            Body::Moon => (MOON_L0_DEG + MOON_RATE_DEG_PER_DAY * d, MOON_RATE_DEG_PER_DAY),
            Body::MeanNode => (NODE_L0_DEG + NODE_RATE_DEG_PER_DAY * d, NODE_RATE_DEG_PER_DAY),
            other => {
                let elements = planet_elements(other).ok_or(OracleError::UnsupportedBody(other))?;
                Self::planet_geocentric(elements, d)
            }
        };

        Ok(CelestialSample::new(body, jd, normalize_360(lon), speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORACLE: MeanElementsOracle = MeanElementsOracle::new();

    #[test]
    fn sun_moves_about_one_degree_per_day() {
        let s = ORACLE.sample(Body::Sun, J2000_JD).unwrap();
        assert!((s.speed_deg_per_day - 0.9856).abs() < 1e-3);
        assert!((s.longitude_deg - 280.46).abs() < 0.01);
        assert!(!s.retrograde);
    }

    #[test]
    fn mean_node_is_always_retrograde() {
        for k in 0..10 {
            let s = ORACLE.sample(Body::MeanNode, J2000_JD + 100.0 * k as f64).unwrap();
            assert!(s.retrograde);
        }
    }

    #[test]
    fn moon_outpaces_sun() {
        let m = ORACLE.sample(Body::Moon, J2000_JD).unwrap();
        let s = ORACLE.sample(Body::Sun, J2000_JD).unwrap();
        assert!(m.speed_deg_per_day > 13.0 * s.speed_deg_per_day);
    }

    #[test]
    fn mars_goes_retrograde_within_a_synodic_period() {
        let retro = (0..800).any(|k| {
            ORACLE
                .sample(Body::Mars, J2000_JD + k as f64)
                .map(|s| s.retrograde)
                .unwrap_or(false)
        });
        assert!(retro);
    }

    #[test]
    fn planet_rate_matches_finite_difference() {
        let jd = J2000_JD + 1234.5;
        let h = 1e-3;
        let a = ORACLE.sample(Body::Venus, jd - h).unwrap();
        let b = ORACLE.sample(Body::Venus, jd + h).unwrap();
        let mid = ORACLE.sample(Body::Venus, jd).unwrap();
        let mut diff = b.longitude_deg - a.longitude_deg;
        if diff > 180.0 {
            diff -= 360.0;
        } else if diff < -180.0 {
            diff += 360.0;
        }
        assert!((diff / (2.0 * h) - mid.speed_deg_per_day).abs() < 1e-4);
    }

    #[test]
    fn rejects_epoch_outside_range() {
        let err = ORACLE.sample(Body::Sun, 2_000_000.0).unwrap_err();
        assert_eq!(err, OracleError::EpochOutOfRange { jd: 2_000_000.0 });
        assert!(ORACLE.sample(Body::Sun, f64::NAN).is_err());
    }

    #[test]
    fn longitudes_are_normalized() {
        for &body in Body::all() {
            let s = ORACLE.sample(body, J2000_JD + 5000.0).unwrap();
            assert!((0.0..360.0).contains(&s.longitude_deg), "{body}");
        }
    }
}
