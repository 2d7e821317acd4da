//! New moon / full moon search.
//!
//! Elongation `e(t) = normalize(moon_lon - sun_lon)` grows by ~12 deg/day.
//! A coarse step brackets a new moon when `e` wraps from above 300 deg to
//! below 60 deg (the step may skip the exact wrap instant), and a full moon
//! when `e` goes from below 180 deg to 180 deg or more.
//!
//! Refinement bisects on `deviation(t) = wrap180(e(t) - target)`. Across a
//! short bracket elongation is monotonic, so `deviation < 0` means "not yet
//! reached" and `deviation >= 0` means "passed".
//!
//! Each refined phase is handed to the eclipse classifier with the Sun,
//! Moon and mean node longitudes at that instant.

use gochara_core::{Body, OracleError, PositionOracle, normalize_360};
use tracing::debug;

use crate::eclipse::classify_eclipse;
use crate::error::SearchError;
use crate::lunar_phase_types::{LunarPhase, LunarPhaseConfig, LunarPhaseEvent};
use crate::search_util::{SearchDirection, bisect_transition, normalize_to_pm180};
use crate::sign::sign_index;

/// Next/prev searches give up after this many days (> one synodic month).
const MAX_PHASE_SCAN_DAYS: f64 = 40.0;

const NEW_MOON_WRAP_HIGH_DEG: f64 = 300.0;
const NEW_MOON_WRAP_LOW_DEG: f64 = 60.0;

/// A range-start sample this close past the target counts as the phase.
const EXACT_PHASE_TOL_DEG: f64 = 1e-9;

const ALL_PHASES: [LunarPhase; 2] = [LunarPhase::NewMoon, LunarPhase::FullMoon];

/// Moon-Sun elongation in degrees [0, 360).
pub fn elongation_at<O: PositionOracle + ?Sized>(oracle: &O, jd: f64) -> Result<f64, SearchError> {
    let moon = oracle.sample(Body::Moon, jd)?;
    let sun = oracle.sample(Body::Sun, jd)?;
    Ok(normalize_360(moon.longitude_deg - sun.longitude_deg))
}

/// Does the chronologically ordered sample pair bracket this phase?
fn crosses(phase: LunarPhase, e_early: f64, e_late: f64) -> bool {
    match phase {
        LunarPhase::NewMoon => e_early > NEW_MOON_WRAP_HIGH_DEG && e_late < NEW_MOON_WRAP_LOW_DEG,
        LunarPhase::FullMoon => e_early < 180.0 && e_late >= 180.0,
    }
}

fn refine_phase<O: PositionOracle + ?Sized>(
    oracle: &O,
    phase: LunarPhase,
    t_early: f64,
    t_late: f64,
    max_iterations: u32,
) -> Result<f64, SearchError> {
    let target = phase.target_deg();
    let passed = |t: f64| -> Result<bool, SearchError> {
        Ok(normalize_to_pm180(elongation_at(oracle, t)? - target) >= 0.0)
    };
    bisect_transition(t_early, t_late, &false, max_iterations, &passed)
}

fn build_event<O: PositionOracle + ?Sized>(
    oracle: &O,
    phase: LunarPhase,
    jd: f64,
    config: &LunarPhaseConfig,
) -> Result<LunarPhaseEvent, SearchError> {
    let moon = oracle.sample(Body::Moon, jd)?;
    let sun = oracle.sample(Body::Sun, jd)?;

    let eclipse = if config.classify_eclipses {
        let node = oracle.sample(Body::MeanNode, jd)?;
        classify_eclipse(
            phase,
            sun.longitude_deg,
            moon.longitude_deg,
            node.longitude_deg,
            &config.eclipse,
        )
    } else {
        None
    };

    debug!(
        phase = phase.name(),
        jd,
        eclipse = eclipse.is_some(),
        "lunar phase refined"
    );

    Ok(LunarPhaseEvent {
        jd,
        phase,
        moon_longitude_deg: moon.longitude_deg,
        sun_longitude_deg: sun.longitude_deg,
        moon_sign: sign_index(moon.longitude_deg),
        sun_sign: sign_index(sun.longitude_deg),
        eclipse,
    })
}

/// Search for all new and full moons in `[jd_start, jd_end]`, in time order.
///
/// The coarse scan starts one step before `jd_start` so that a phase
/// falling exactly on `jd_start` is still bracketed. When the oracle has no
/// data before `jd_start` the scan starts at `jd_start` and an exact-start
/// phase is read off the first sample instead. Returns an empty list when
/// `jd_end <= jd_start`.
pub fn search_lunar_phases<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd_start: f64,
    jd_end: f64,
    config: &LunarPhaseConfig,
) -> Result<Vec<LunarPhaseEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let mut events = Vec::new();
    if jd_end <= jd_start {
        return Ok(events);
    }

    let step = config.step_size_days;
    let (t0, e0) = match elongation_at(oracle, jd_start - step) {
        Ok(e) => (jd_start - step, e),
        Err(SearchError::Oracle(OracleError::EpochOutOfRange { .. })) => {
            debug!(jd_start, "no lookback sample, scanning from range start");
            let e = elongation_at(oracle, jd_start)?;
            for phase in ALL_PHASES {
                let dev = normalize_to_pm180(e - phase.target_deg());
                if (0.0..EXACT_PHASE_TOL_DEG).contains(&dev) {
                    events.push(build_event(oracle, phase, jd_start, config)?);
                }
            }
            (jd_start, e)
        }
        Err(e) => return Err(e),
    };
    let n_steps = ((jd_end - t0) / step).ceil() as u64;

    let mut t_prev = t0;
    let mut e_prev = e0;

    for k in 1..=n_steps {
        let t_curr = (t0 + k as f64 * step).min(jd_end);
        let e_curr = elongation_at(oracle, t_curr)?;

        for phase in ALL_PHASES {
            if crosses(phase, e_prev, e_curr) {
                debug!(phase = phase.name(), t_prev, t_curr, "lunar phase bracketed");
                let jd = refine_phase(oracle, phase, t_prev, t_curr, config.max_iterations)?;
                if jd >= jd_start && jd <= jd_end {
                    events.push(build_event(oracle, phase, jd, config)?);
                }
            }
        }

        t_prev = t_curr;
        e_prev = e_curr;
    }

    Ok(events)
}

/// Search for all new moons in `[jd_start, jd_end]`.
pub fn search_new_moons<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd_start: f64,
    jd_end: f64,
    config: &LunarPhaseConfig,
) -> Result<Vec<LunarPhaseEvent>, SearchError> {
    let mut events = search_lunar_phases(oracle, jd_start, jd_end, config)?;
    events.retain(|e| e.phase == LunarPhase::NewMoon);
    Ok(events)
}

/// Search for all full moons in `[jd_start, jd_end]`.
pub fn search_full_moons<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd_start: f64,
    jd_end: f64,
    config: &LunarPhaseConfig,
) -> Result<Vec<LunarPhaseEvent>, SearchError> {
    let mut events = search_lunar_phases(oracle, jd_start, jd_end, config)?;
    events.retain(|e| e.phase == LunarPhase::FullMoon);
    Ok(events)
}

// ---------------------------------------------------------------------------
// Next / previous phase
// ---------------------------------------------------------------------------

fn find_phase<O: PositionOracle + ?Sized>(
    oracle: &O,
    phase: LunarPhase,
    jd_start: f64,
    direction: SearchDirection,
    config: &LunarPhaseConfig,
) -> Result<Option<LunarPhaseEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let step = match direction {
        SearchDirection::Forward => config.step_size_days,
        SearchDirection::Backward => -config.step_size_days,
    };
    let max_steps = (MAX_PHASE_SCAN_DAYS / config.step_size_days).ceil() as u64;

    let mut t_prev = jd_start;
    let mut e_prev = elongation_at(oracle, jd_start)?;

    for k in 1..=max_steps {
        let t_curr = jd_start + k as f64 * step;
        let e_curr = elongation_at(oracle, t_curr)?;

        let (t_a, e_a, t_b, e_b) = if t_prev < t_curr {
            (t_prev, e_prev, t_curr, e_curr)
        } else {
            (t_curr, e_curr, t_prev, e_prev)
        };

        if crosses(phase, e_a, e_b) {
            let jd = refine_phase(oracle, phase, t_a, t_b, config.max_iterations)?;
            return Ok(Some(build_event(oracle, phase, jd, config)?));
        }

        t_prev = t_curr;
        e_prev = e_curr;
    }

    Ok(None)
}

/// Find the next new moon after `jd`.
pub fn next_new_moon<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &LunarPhaseConfig,
) -> Result<Option<LunarPhaseEvent>, SearchError> {
    find_phase(oracle, LunarPhase::NewMoon, jd, SearchDirection::Forward, config)
}

/// Find the previous new moon before `jd`.
pub fn prev_new_moon<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &LunarPhaseConfig,
) -> Result<Option<LunarPhaseEvent>, SearchError> {
    find_phase(oracle, LunarPhase::NewMoon, jd, SearchDirection::Backward, config)
}

/// Find the next full moon after `jd`.
pub fn next_full_moon<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &LunarPhaseConfig,
) -> Result<Option<LunarPhaseEvent>, SearchError> {
    find_phase(oracle, LunarPhase::FullMoon, jd, SearchDirection::Forward, config)
}

/// Find the previous full moon before `jd`.
pub fn prev_full_moon<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &LunarPhaseConfig,
) -> Result<Option<LunarPhaseEvent>, SearchError> {
    find_phase(oracle, LunarPhase::FullMoon, jd, SearchDirection::Backward, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclipse::EclipseKind;
    use gochara_core::{CelestialSample, FnOracle};

    /// Moon 13 deg/day, Sun 1 deg/day, both at 0 at t=0: synodic period 30 days.
    /// Node fixed at `node`.
    fn linear_oracle(node: f64) -> impl PositionOracle {
        FnOracle::new(move |body, t| {
            let (lon, speed) = match body {
                Body::Moon => (13.0 * t, 13.0),
                Body::Sun => (t, 1.0),
                _ => (node, 0.0),
            };
            Ok(CelestialSample::new(body, t, lon, speed))
        })
    }

    #[test]
    fn crossing_rules() {
        assert!(crosses(LunarPhase::NewMoon, 355.0, 3.0));
        assert!(!crosses(LunarPhase::NewMoon, 3.0, 15.0));
        assert!(!crosses(LunarPhase::NewMoon, 250.0, 3.0));
        assert!(crosses(LunarPhase::FullMoon, 175.0, 180.0));
        assert!(!crosses(LunarPhase::FullMoon, 180.0, 186.0));
    }

    #[test]
    fn phase_on_range_start_is_found() {
        let oracle = linear_oracle(90.0);
        let events = search_lunar_phases(&oracle, 0.0, 31.0, &LunarPhaseConfig::default()).unwrap();
        let new: Vec<_> = events.iter().filter(|e| e.phase == LunarPhase::NewMoon).collect();
        assert_eq!(new.len(), 2);
        assert!(new[0].jd.abs() < 1e-6);
        assert!((new[1].jd - 30.0).abs() < 1e-6);
        let full: Vec<_> = events.iter().filter(|e| e.phase == LunarPhase::FullMoon).collect();
        assert_eq!(full.len(), 1);
        assert!((full[0].jd - 15.0).abs() < 1e-6);
    }

    #[test]
    fn range_start_at_oracle_lower_limit() {
        // No data before t=0; the new moon at t=0 must still be reported.
        let oracle = FnOracle::new(|body, t| {
            if t < 0.0 {
                return Err(gochara_core::OracleError::EpochOutOfRange { jd: t });
            }
            let (lon, speed) = match body {
                Body::Moon => (13.0 * t, 13.0),
                Body::Sun => (t, 1.0),
                _ => (90.0, 0.0),
            };
            Ok(CelestialSample::new(body, t, lon, speed))
        });
        let events = search_lunar_phases(&oracle, 0.0, 31.0, &LunarPhaseConfig::default()).unwrap();
        let jds: Vec<f64> = events.iter().map(|e| e.jd).collect();
        assert_eq!(events.len(), 3, "{jds:?}");
        assert_eq!(events[0].phase, LunarPhase::NewMoon);
        assert!(events[0].jd.abs() < 1e-12);
        assert_eq!(events[1].phase, LunarPhase::FullMoon);
        assert!((events[1].jd - 15.0).abs() < 1e-6);
        assert!((events[2].jd - 30.0).abs() < 1e-6);

        let full = search_full_moons(&oracle, 0.0, 31.0, &LunarPhaseConfig::default()).unwrap();
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn other_oracle_errors_still_propagate() {
        let oracle = FnOracle::new(|body, _| Err(gochara_core::OracleError::UnsupportedBody(body)));
        let err = search_lunar_phases(&oracle, 0.0, 10.0, &LunarPhaseConfig::default());
        assert!(matches!(
            err,
            Err(SearchError::Oracle(gochara_core::OracleError::UnsupportedBody(_)))
        ));
    }

    #[test]
    fn events_are_time_ordered() {
        let oracle = linear_oracle(90.0);
        let events = search_lunar_phases(&oracle, 0.0, 95.0, &LunarPhaseConfig::default()).unwrap();
        for w in events.windows(2) {
            assert!(w[0].jd < w[1].jd);
        }
    }

    #[test]
    fn eclipse_flagged_near_node() {
        // New moon at t=30 with Sun at 30 deg; node at 35 -> solar eclipse.
        let oracle = linear_oracle(35.0);
        let ev = next_new_moon(&oracle, 20.0, &LunarPhaseConfig::default()).unwrap().unwrap();
        assert!((ev.jd - 30.0).abs() < 1e-6);
        let eclipse = ev.eclipse.unwrap();
        assert_eq!(eclipse.kind, EclipseKind::Solar);
        assert!((eclipse.distance_to_node_deg - 5.0).abs() < 1e-4);
        assert_eq!(ev.sun_sign, 1);
    }

    #[test]
    fn no_eclipse_far_from_node() {
        let oracle = linear_oracle(120.0);
        let ev = next_full_moon(&oracle, 1.0, &LunarPhaseConfig::default()).unwrap().unwrap();
        assert!((ev.jd - 15.0).abs() < 1e-6);
        assert!(ev.eclipse.is_none());
    }

    #[test]
    fn eclipse_classification_can_be_disabled() {
        // Oracle without node support still works when eclipses are off.
        let oracle = FnOracle::new(|body, t| match body {
            Body::Moon => Ok(CelestialSample::new(body, t, 13.0 * t, 13.0)),
            Body::Sun => Ok(CelestialSample::new(body, t, t, 1.0)),
            other => Err(gochara_core::OracleError::UnsupportedBody(other)),
        });
        let config = LunarPhaseConfig {
            classify_eclipses: false,
            ..LunarPhaseConfig::default()
        };
        let events = search_lunar_phases(&oracle, 1.0, 40.0, &config).unwrap();
        assert_eq!(events.len(), 2);

        let err = search_lunar_phases(&oracle, 1.0, 40.0, &LunarPhaseConfig::default());
        assert!(matches!(err, Err(SearchError::Oracle(_))));
    }

    #[test]
    fn prev_full_moon_looks_backward() {
        let oracle = linear_oracle(90.0);
        let ev = prev_full_moon(&oracle, 40.0, &LunarPhaseConfig::default()).unwrap().unwrap();
        assert!((ev.jd - 15.0).abs() < 1e-6);
        let ev = prev_new_moon(&oracle, 40.0, &LunarPhaseConfig::default()).unwrap().unwrap();
        assert!((ev.jd - 30.0).abs() < 1e-6);
    }

    #[test]
    fn filtered_searches() {
        let oracle = linear_oracle(90.0);
        let cfg = LunarPhaseConfig::default();
        assert_eq!(search_new_moons(&oracle, 1.0, 61.0, &cfg).unwrap().len(), 2);
        assert_eq!(search_full_moons(&oracle, 1.0, 61.0, &cfg).unwrap().len(), 2);
    }

    #[test]
    fn empty_range() {
        let oracle = linear_oracle(90.0);
        let events = search_lunar_phases(&oracle, 10.0, 10.0, &LunarPhaseConfig::default()).unwrap();
        assert!(events.is_empty());
    }
}
