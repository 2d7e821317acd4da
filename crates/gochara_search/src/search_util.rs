//! Coarse scan + bisection over a piecewise-constant state of time.
//!
//! Every detector in this crate reduces to the same shape: sample some
//! discrete state (sign of speed, sign index, "void or not") on a regular
//! grid, and when two consecutive samples disagree, bisect the bracket to
//! locate the change.
//!
//! Bisection runs a fixed number of passes with no early exit, so a search
//! always terminates regardless of how the state behaves inside the bracket.
//! With a 2-day step, 32 passes shrink the bracket to ~4e-10 days.
//!
//! At most one change per coarse step is detected. Callers choose the step
//! smaller than the shortest plausible gap between events.

use crate::error::SearchError;

/// Default number of bisection passes.
pub const DEFAULT_MAX_ITERATIONS: u32 = 32;

// ---------------------------------------------------------------------------
// Scan configuration
// ---------------------------------------------------------------------------

/// Direction for next/previous searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Grid step and bisection budget for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Coarse scan step in days.
    pub step_size_days: f64,
    /// Bisection passes per bracket.
    pub max_iterations: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_size_days: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ScanConfig {
    pub const fn new(step_size_days: f64, max_iterations: u32) -> Self {
        Self {
            step_size_days,
            max_iterations,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_size_days.is_finite() || self.step_size_days <= 0.0 {
            return Err("step_size_days must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Generic bisection solver
// ---------------------------------------------------------------------------

/// A detected state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    /// Refined time: the earliest bisection point observed in the new state.
    pub jd: f64,
    /// State at the earlier coarse sample.
    pub before: S,
    /// State at the later coarse sample.
    pub after: S,
    /// The coarse bracket `(earlier, later)` that contained the change.
    pub bracket: (f64, f64),
}

/// Bisect `[t_low, t_high]` for the instant the state stops equalling `before`.
///
/// `before` must be the state at `t_low`. Returns the upper end of the final
/// bracket, i.e. a time at which the new state has actually been observed.
/// The result always lies in `[t_low, t_high]`.
pub fn bisect_transition<S, F>(
    t_low: f64,
    t_high: f64,
    before: &S,
    max_iter: u32,
    state_at: &F,
) -> Result<f64, SearchError>
where
    S: PartialEq,
    F: Fn(f64) -> Result<S, SearchError>,
{
    let mut lo = t_low;
    let mut hi = t_high;
    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        if state_at(mid)? == *before {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(hi)
}

// ---------------------------------------------------------------------------
// Coarse scan
// ---------------------------------------------------------------------------

/// Scan `[jd_start, jd_end]` and return every state change, in time order.
///
/// The grid is `jd_start + k * step`, with the final point clamped to
/// `jd_end`. Returns an empty list when `jd_end <= jd_start`.
pub fn scan_transitions<S, F>(
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
    state_at: F,
) -> Result<Vec<Transition<S>>, SearchError>
where
    S: PartialEq + Clone,
    F: Fn(f64) -> Result<S, SearchError>,
{
    config.validate().map_err(SearchError::InvalidConfig)?;
    let mut out = Vec::new();
    if jd_end <= jd_start {
        return Ok(out);
    }

    let step = config.step_size_days;
    let n_steps = ((jd_end - jd_start) / step).ceil().max(1.0) as u64;

    let mut t_prev = jd_start;
    let mut s_prev = state_at(jd_start)?;

    for k in 1..=n_steps {
        let t_curr = (jd_start + k as f64 * step).min(jd_end);
        let s_curr = state_at(t_curr)?;

        if s_curr != s_prev {
            let jd = bisect_transition(t_prev, t_curr, &s_prev, config.max_iterations, &state_at)?;
            out.push(Transition {
                jd,
                before: s_prev.clone(),
                after: s_curr.clone(),
                bracket: (t_prev, t_curr),
            });
        }

        t_prev = t_curr;
        s_prev = s_curr;
    }

    Ok(out)
}

/// Find the first state change after (or before) `jd_start`, looking at
/// most `max_scan_days` away.
///
/// For backward searches the returned `before`/`after` are still in
/// chronological order: `before` is the state earlier in time.
pub fn find_first_transition<S, F>(
    jd_start: f64,
    direction: SearchDirection,
    max_scan_days: f64,
    config: &ScanConfig,
    state_at: F,
) -> Result<Option<Transition<S>>, SearchError>
where
    S: PartialEq + Clone,
    F: Fn(f64) -> Result<S, SearchError>,
{
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !max_scan_days.is_finite() || max_scan_days <= 0.0 {
        return Err(SearchError::InvalidConfig("max_scan_days must be positive"));
    }

    let step = match direction {
        SearchDirection::Forward => config.step_size_days,
        SearchDirection::Backward => -config.step_size_days,
    };
    let max_steps = (max_scan_days / config.step_size_days).ceil() as u64;

    let mut t_prev = jd_start;
    let mut s_prev = state_at(jd_start)?;

    for k in 1..=max_steps {
        let t_curr = jd_start + k as f64 * step;
        let s_curr = state_at(t_curr)?;

        if s_curr != s_prev {
            // Bisection wants the earlier end first.
            let (t_a, s_a, t_b, s_b) = if t_prev < t_curr {
                (t_prev, s_prev, t_curr, s_curr)
            } else {
                (t_curr, s_curr, t_prev, s_prev)
            };
            let jd = bisect_transition(t_a, t_b, &s_a, config.max_iterations, &state_at)?;
            return Ok(Some(Transition {
                jd,
                before: s_a,
                after: s_b,
                bracket: (t_a, t_b),
            }));
        }

        t_prev = t_curr;
        s_prev = s_curr;
    }

    Ok(None)
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Shorter-arc distance between two longitudes, in [0, 180].
pub fn angular_distance(a_deg: f64, b_deg: f64) -> f64 {
    normalize_to_pm180(a_deg - b_deg).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_fn(edge: f64) -> impl Fn(f64) -> Result<bool, SearchError> {
        move |t| Ok(t >= edge)
    }

    #[test]
    fn bisect_converges_to_edge() {
        let f = step_fn(3.3);
        let t = bisect_transition(3.0, 4.0, &false, 32, &f).unwrap();
        assert!((t - 3.3).abs() < 1e-8);
        assert!(t >= 3.3);
    }

    #[test]
    fn bisect_stays_inside_bracket() {
        // Pathological predicate that never matches `before`.
        let f = |_t: f64| -> Result<bool, SearchError> { Ok(true) };
        let t = bisect_transition(1.0, 2.0, &false, 40, &f).unwrap();
        assert!((1.0..=2.0).contains(&t));
    }

    #[test]
    fn bisect_propagates_errors() {
        let f = |_t: f64| -> Result<bool, SearchError> { Err(SearchError::InvalidConfig("boom")) };
        assert!(bisect_transition(0.0, 1.0, &false, 10, &f).is_err());
    }

    #[test]
    fn scan_finds_each_change() {
        let f = |t: f64| -> Result<i32, SearchError> { Ok((t / 10.0).floor() as i32) };
        let out = scan_transitions(0.5, 35.0, &ScanConfig::new(1.0, 32), f).unwrap();
        assert_eq!(out.len(), 3);
        for (i, tr) in out.iter().enumerate() {
            let edge = 10.0 * (i + 1) as f64;
            assert!((tr.jd - edge).abs() < 1e-6);
            assert_eq!(tr.before, i as i32);
            assert_eq!(tr.after, i as i32 + 1);
            assert!(tr.bracket.0 <= tr.jd && tr.jd <= tr.bracket.1);
        }
    }

    #[test]
    fn scan_empty_range() {
        let out = scan_transitions(5.0, 5.0, &ScanConfig::default(), step_fn(1.0)).unwrap();
        assert!(out.is_empty());
        let out = scan_transitions(5.0, 1.0, &ScanConfig::default(), step_fn(1.0)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn scan_rejects_bad_step() {
        let err = scan_transitions(0.0, 1.0, &ScanConfig::new(0.0, 32), step_fn(0.5));
        assert!(matches!(err, Err(SearchError::InvalidConfig(_))));
        let err = scan_transitions(0.0, 1.0, &ScanConfig::new(f64::NAN, 32), step_fn(0.5));
        assert!(err.is_err());
    }

    #[test]
    fn scan_misses_double_flip_inside_one_step() {
        // true only on (2.2, 2.4): both flips fall in one 1-day step.
        let f = |t: f64| -> Result<bool, SearchError> { Ok(t > 2.2 && t < 2.4) };
        let out = scan_transitions(0.0, 5.0, &ScanConfig::new(1.0, 32), f).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn scan_clamps_last_step_to_end() {
        let out = scan_transitions(0.0, 2.5, &ScanConfig::new(1.0, 32), step_fn(2.25)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bracket, (2.0, 2.5));
    }

    #[test]
    fn find_forward_and_backward() {
        let cfg = ScanConfig::new(0.5, 32);
        let fwd = find_first_transition(0.0, SearchDirection::Forward, 10.0, &cfg, step_fn(4.2))
            .unwrap()
            .unwrap();
        assert!((fwd.jd - 4.2).abs() < 1e-6);
        assert!(!fwd.before && fwd.after);

        let bwd = find_first_transition(10.0, SearchDirection::Backward, 10.0, &cfg, step_fn(4.2))
            .unwrap()
            .unwrap();
        assert!((bwd.jd - 4.2).abs() < 1e-6);
        assert!(!bwd.before && bwd.after);
        assert!(bwd.bracket.0 < bwd.bracket.1);
    }

    #[test]
    fn find_gives_up_after_max_scan() {
        let cfg = ScanConfig::new(1.0, 32);
        let none = find_first_transition(0.0, SearchDirection::Forward, 5.0, &cfg, step_fn(50.0))
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn pm180_wrap() {
        assert!((normalize_to_pm180(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_to_pm180(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_to_pm180(180.0) - 180.0).abs() < 1e-12);
        assert!((normalize_to_pm180(-180.0) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn angular_distance_is_shorter_arc() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-12);
    }
}
