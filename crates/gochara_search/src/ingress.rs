//! Sign ingress search engine.
//!
//! Finds when a body's longitude crosses a 30-degree sign boundary, in
//! either direction (retrograde bodies re-enter the previous sign).
//!
//! The scanned state is the sign index itself. The entered sign is taken
//! from the coarse sample after the bracket, never from the refined-time
//! sample: at an exact 30-degree boundary floating-point noise can put the
//! refined longitude on the wrong side.

use gochara_core::{Body, PositionOracle};
use tracing::debug;

use crate::error::SearchError;
use crate::ingress_types::{IngressConfig, IngressEvent};
use crate::search_util::{SearchDirection, Transition, find_first_transition, scan_transitions};
use crate::sign::sign_index;

fn sign_at<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
) -> Result<u8, SearchError> {
    Ok(sign_index(oracle.sample(body, jd)?.longitude_deg))
}

fn build_event<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    tr: &Transition<u8>,
) -> Result<IngressEvent, SearchError> {
    let sample = oracle.sample(body, tr.jd)?;
    debug!(
        body = body.name(),
        jd = tr.jd,
        from = tr.before,
        to = tr.after,
        "ingress refined"
    );
    Ok(IngressEvent {
        jd: tr.jd,
        body,
        from_sign: tr.before,
        to_sign: tr.after,
        retrograde: sample.retrograde,
        longitude_deg: sample.longitude_deg,
    })
}

fn find_ingress_event<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd_start: f64,
    direction: SearchDirection,
    config: &IngressConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let found = find_first_transition(
        jd_start,
        direction,
        config.max_scan_days,
        &config.scan(),
        |t| sign_at(oracle, body, t),
    )?;

    match found {
        Some(tr) => Ok(Some(build_event(oracle, body, &tr)?)),
        None => Ok(None),
    }
}

/// Find the next sign ingress after `jd`.
pub fn next_ingress<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
    config: &IngressConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    find_ingress_event(oracle, body, jd, SearchDirection::Forward, config)
}

/// Find the previous sign ingress before `jd`.
pub fn prev_ingress<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd: f64,
    config: &IngressConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    find_ingress_event(oracle, body, jd, SearchDirection::Backward, config)
}

/// Search for all sign ingresses in `[jd_start, jd_end]`.
///
/// Returns an empty list when `jd_end <= jd_start`.
pub fn search_ingresses<O: PositionOracle + ?Sized>(
    oracle: &O,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &IngressConfig,
) -> Result<Vec<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let transitions =
        scan_transitions(jd_start, jd_end, &config.scan(), |t| sign_at(oracle, body, t))?;

    transitions
        .iter()
        .map(|tr| build_event(oracle, body, tr))
        .collect()
}
