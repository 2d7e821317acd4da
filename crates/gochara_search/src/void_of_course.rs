//! Void-of-course Moon detection.
//!
//! The Moon is void of course when it will not perfect any major aspect to
//! a tracked body before it leaves its current sign.
//!
//! **Point classification** (`void_status_at`): for each tracked body and
//! aspect, take the longitude(s) where the aspect would be exact against the
//! body's current position, then re-project the body forward by its own
//! speed over the Moon's estimated travel time, a fixed number of passes.
//! Aspect points that would need more than 180 deg of travel against the
//! Moon's direction of motion are ignored. If any aspect perfects within
//! the time left in the sign, and the Moon is still inside the sign at that
//! moment, the Moon is not void.
//!
//! **Intervals** (`find_void_periods`): coarse scan + bisection over the
//! state "void in sign N" / "not void". A change of sign while void closes
//! one period and opens the next. A period already running at range start
//! is traced back (bounded) to estimate its onset; a period still running
//! at range end is closed with the analytic time-to-sign-exit.

use gochara_core::{Body, CelestialSample, PositionOracle, normalize_360};
use tracing::debug;

use crate::error::SearchError;
use crate::search_util::{ScanConfig, bisect_transition, scan_transitions};
use crate::sign::{sign_index, sign_position};
use crate::void_types::{AspectHit, VoidConfig, VoidPeriod, VoidStatus};

/// Moon travel beyond this many degrees is "the wrong way round".
const MAX_FORWARD_TRAVEL_DEG: f64 = 180.0;

// ---------------------------------------------------------------------------
// Aspect projection
// ---------------------------------------------------------------------------

/// Days until a body at `degree_in_sign` leaves its sign at `speed` deg/day.
///
/// Direct motion exits through the upper boundary, retrograde through the
/// lower one. `None` for zero speed.
pub fn days_to_sign_exit(degree_in_sign: f64, speed_deg_per_day: f64) -> Option<f64> {
    if speed_deg_per_day > 0.0 {
        Some((30.0 - degree_in_sign) / speed_deg_per_day)
    } else if speed_deg_per_day < 0.0 {
        Some(degree_in_sign / -speed_deg_per_day)
    } else {
        None
    }
}

/// Degrees the Moon must travel, in its direction of motion, to reach `target`.
fn moon_travel_deg(moon_lon: f64, target: f64, moon_speed: f64) -> f64 {
    if moon_speed >= 0.0 {
        normalize_360(target - moon_lon)
    } else {
        normalize_360(moon_lon - target)
    }
}

/// Days until the Moon perfects the aspect at `offset_deg` from `other`.
///
/// Fixed-point iteration: the other body's longitude is pushed forward by
/// its speed over the current time estimate, then the Moon's travel is
/// recomputed. `None` if the aspect point lies behind the Moon.
fn days_until_aspect(
    moon: &CelestialSample,
    other: &CelestialSample,
    offset_deg: f64,
    passes: u32,
) -> Option<f64> {
    let moon_speed = moon.speed_deg_per_day.abs();
    if moon_speed == 0.0 {
        return None;
    }

    let mut target = normalize_360(other.longitude_deg + offset_deg);
    for _ in 0..passes {
        let travel = moon_travel_deg(moon.longitude_deg, target, moon.speed_deg_per_day);
        if travel > MAX_FORWARD_TRAVEL_DEG {
            return None;
        }
        let days = travel / moon_speed;
        target = normalize_360(other.longitude_deg + other.speed_deg_per_day * days + offset_deg);
    }

    let travel = moon_travel_deg(moon.longitude_deg, target, moon.speed_deg_per_day);
    if travel > MAX_FORWARD_TRAVEL_DEG {
        return None;
    }
    Some(travel / moon_speed)
}

// ---------------------------------------------------------------------------
// Point-in-time classification
// ---------------------------------------------------------------------------

fn classify_void<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &VoidConfig,
) -> Result<VoidStatus, SearchError> {
    let moon = oracle.sample(Body::Moon, jd)?;
    let pos = sign_position(moon.longitude_deg);
    let days_to_exit = days_to_sign_exit(pos.degree_in_sign, moon.speed_deg_per_day);

    let Some(exit) = days_to_exit else {
        return Ok(VoidStatus {
            jd,
            is_void: true,
            moon_sign: pos.sign_index,
            days_to_exit: None,
            next_aspect: None,
        });
    };

    let mut best: Option<AspectHit> = None;
    for &body in &config.tracked_bodies {
        let other = oracle.sample(body, jd)?;
        for &aspect in &config.aspects {
            for &offset in aspect.offsets() {
                let Some(days) = days_until_aspect(&moon, &other, offset, config.projection_passes)
                else {
                    continue;
                };
                if days > exit {
                    continue;
                }
                let lon_then = moon.longitude_deg + moon.speed_deg_per_day * days;
                if sign_index(lon_then) != pos.sign_index {
                    continue;
                }
                if best.is_none_or(|b| days < b.days_until) {
                    best = Some(AspectHit {
                        body,
                        aspect,
                        days_until: days,
                    });
                }
            }
        }
    }

    Ok(VoidStatus {
        jd,
        is_void: best.is_none(),
        moon_sign: pos.sign_index,
        days_to_exit,
        next_aspect: best,
    })
}

/// Classify the Moon at `jd`.
pub fn void_status_at<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &VoidConfig,
) -> Result<VoidStatus, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    classify_void(oracle, jd, config)
}

/// Whether the Moon is void of course at `jd`.
pub fn is_void_at<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &VoidConfig,
) -> Result<bool, SearchError> {
    Ok(void_status_at(oracle, jd, config)?.is_void)
}

/// Scan state: `Some(sign)` while void in that sign, `None` otherwise.
fn void_state<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    config: &VoidConfig,
) -> Result<Option<u8>, SearchError> {
    let status = classify_void(oracle, jd, config)?;
    Ok(status.is_void.then_some(status.moon_sign))
}

// ---------------------------------------------------------------------------
// Period search
// ---------------------------------------------------------------------------

/// Walk back from `jd` (void in `sign`) looking for a non-void sample.
///
/// Returns the onset time and whether it is only an estimate (no non-void
/// sample within `backward_search_days`).
fn find_void_onset<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd: f64,
    sign: u8,
    config: &VoidConfig,
) -> Result<(f64, bool), SearchError> {
    let cap = config.backward_search_days;
    let step = config.step_size_days;
    let in_period = |t: f64| -> Result<bool, SearchError> {
        Ok(void_state(oracle, t, config)? == Some(sign))
    };

    let n_steps = (cap / step).ceil() as u64;
    let mut t_void = jd;
    for k in 1..=n_steps {
        let t = (jd - k as f64 * step).max(jd - cap);
        if !in_period(t)? {
            let onset = bisect_transition(t, t_void, &false, config.max_iterations, &in_period)?;
            debug!(jd, onset, "void onset found before range start");
            return Ok((onset, false));
        }
        t_void = t;
    }

    debug!(jd, cap, "void onset not bracketed within backward search cap");
    Ok((t_void, true))
}

/// A period that has started but not yet ended.
struct OpenPeriod {
    start_jd: f64,
    moon_sign: u8,
    started_before_range_start: bool,
    start_estimated: bool,
}

impl OpenPeriod {
    fn close(self, end_jd: f64, end_estimated: bool) -> VoidPeriod {
        VoidPeriod::new(
            self.start_jd,
            end_jd,
            self.moon_sign,
            self.started_before_range_start,
            self.start_estimated,
            end_estimated,
        )
    }
}

/// Find all void-of-course periods overlapping `[jd_start, jd_end]`.
///
/// Periods come back in time order and do not overlap. Returns an empty
/// list when `jd_end <= jd_start`; a non-positive step is an
/// [`SearchError::InvalidConfig`].
pub fn find_void_periods<O: PositionOracle + ?Sized>(
    oracle: &O,
    jd_start: f64,
    jd_end: f64,
    config: &VoidConfig,
) -> Result<Vec<VoidPeriod>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let mut periods = Vec::new();
    if jd_end <= jd_start {
        return Ok(periods);
    }

    let state_at = |t: f64| void_state(oracle, t, config);

    let mut open = match state_at(jd_start)? {
        Some(sign) => {
            let (onset, estimated) = find_void_onset(oracle, jd_start, sign, config)?;
            Some(OpenPeriod {
                start_jd: onset,
                moon_sign: sign,
                started_before_range_start: onset < jd_start,
                start_estimated: estimated,
            })
        }
        None => None,
    };

    let scan = ScanConfig::new(config.step_size_days, config.max_iterations);
    for tr in scan_transitions(jd_start, jd_end, &scan, &state_at)? {
        if tr.before.is_some() {
            if let Some(p) = open.take() {
                periods.push(p.close(tr.jd, false));
            }
        }
        if let Some(sign) = tr.after {
            debug!(jd = tr.jd, sign, "void period opened");
            open = Some(OpenPeriod {
                start_jd: tr.jd,
                moon_sign: sign,
                started_before_range_start: false,
                start_estimated: false,
            });
        }
    }

    if let Some(p) = open {
        let status = classify_void(oracle, jd_end, config)?;
        let end_jd = status.days_to_exit.map_or(jd_end, |d| jd_end + d);
        debug!(jd_end, end_jd, "void period still open at range end");
        periods.push(p.close(end_jd, true));
    }

    Ok(periods)
}
