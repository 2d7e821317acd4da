//! Stationary point search engine.
//!
//! Finds when a body's ecliptic longitude speed changes sign (station
//! retrograde / station direct).
//!
//! Algorithm: coarse scan of the predicate `speed(t) >= 0`, bisection of
//! every bracket where it flips, then one more oracle sample at the refined
//! time for the reported longitude.

use gochara_core::{Body, PositionOracle};
use tracing::debug;

use crate::error::SearchError;
use crate::search_util::{SearchDirection, Transition, find_first_transition, scan_transitions};
use crate::sign::sign_position;
use crate::stationary_types::{StationType, StationaryConfig, StationaryEvent};

/// Maximum scan range in days (~800 days covers all synodic periods).
const MAX_SCAN_DAYS: f64 = 800.0;

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

/// Bodies that cannot have stationary points.
/// Sun and Moon always move eastward geocentrically.
fn validate_stationary_body(body: Body) -> Result<(), SearchError> {
    match body {
        Body::Sun | Body::Moon => Err(SearchError::InvalidConfig(
            "Sun and Moon do not have stationary points",
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Stationary point search
// ---------------------------------------------------------------------------

fn is_direct_at<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
) -> Result<bool, SearchError> {
    Ok(oracle.sample(body, jd)?.speed_deg_per_day >= 0.0)
}

/// Turn a refined direct/retrograde flip into an event.
fn build_event<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    tr: &Transition<bool>,
) -> Result<StationaryEvent, SearchError> {
    let sample = oracle.sample(body, tr.jd)?;
    let pos = sign_position(sample.longitude_deg);

    // direct -> retrograde = StationRetrograde, retrograde -> direct = StationDirect
    let station_type = if tr.before {
        StationType::StationRetrograde
    } else {
        StationType::StationDirect
    };

    debug!(
        body = body.name(),
        jd = tr.jd,
        kind = station_type.name(),
        "station refined"
    );

    Ok(StationaryEvent {
        jd: tr.jd,
        body,
        station_type,
        longitude_deg: sample.longitude_deg,
        sign_index: pos.sign_index,
        degree_in_sign: pos.degree_in_sign,
    })
}

fn find_stationary_event<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd_start: f64,
    direction: SearchDirection,
    config: &StationaryConfig,
) -> Result<Option<StationaryEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_stationary_body(body)?;

    let found = find_first_transition(jd_start, direction, MAX_SCAN_DAYS, &config.scan(), |t| {
        is_direct_at(oracle, body, t)
    })?;

    match found {
        Some(tr) => Ok(Some(build_event(oracle, body, &tr)?)),
        None => Ok(None),
    }
}

/// Find the next stationary point after `jd`.
pub fn next_stationary<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
    config: &StationaryConfig,
) -> Result<Option<StationaryEvent>, SearchError> {
    find_stationary_event(oracle, body, jd, SearchDirection::Forward, config)
}

/// Find the previous stationary point before `jd`.
pub fn prev_stationary<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
    config: &StationaryConfig,
) -> Result<Option<StationaryEvent>, SearchError> {
    find_stationary_event(oracle, body, jd, SearchDirection::Backward, config)
}

/// Search for all stationary points in `[jd_start, jd_end]`.
///
/// Returns an empty list when `jd_end <= jd_start`.
pub fn search_stationary<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &StationaryConfig,
) -> Result<Vec<StationaryEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_stationary_body(body)?;

    let transitions = scan_transitions(jd_start, jd_end, &config.scan(), |t| {
        is_direct_at(oracle, body, t)
    })?;

    transitions
        .iter()
        .map(|tr| build_event(oracle, body, tr))
        .collect()
}
