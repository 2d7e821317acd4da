//! Transit event search engine: stations, sign ingresses, new and full
//! moons with eclipse flags, and void-of-course Moon periods.
//!
//! This crate provides:
//! - Zodiac sign classification of ecliptic longitudes
//! - Stationary point search (retrograde/direct stations)
//! - Sign ingress search for any body
//! - New/full moon search with node-proximity eclipse classification
//! - Void-of-course Moon status and interval search
//! - A combined, time-ordered event stream
//!
//! All detectors share one pattern: coarse scan of a discrete state on a
//! fixed grid, then bisection of each bracket where the state changes.
//! Positions come from any [`gochara_core::PositionOracle`].

pub mod eclipse;
pub mod error;
pub mod events;
pub mod ingress;
pub mod ingress_types;
pub mod lunar_phase;
pub mod lunar_phase_types;
pub mod search_util;
pub mod sign;
pub mod stationary;
pub mod stationary_types;
pub mod void_of_course;
pub mod void_types;

pub use eclipse::{
    EclipseInfo, EclipseKind, EclipseThresholds, classify_eclipse, node_axis_distance,
};
pub use error::SearchError;
pub use events::{AstroEvent, EventSearchConfig, search_events};
pub use ingress::{next_ingress, prev_ingress, search_ingresses};
pub use ingress_types::{IngressConfig, IngressEvent};
pub use lunar_phase::{
    elongation_at, next_full_moon, next_new_moon, prev_full_moon, prev_new_moon,
    search_full_moons, search_lunar_phases, search_new_moons,
};
pub use lunar_phase_types::{LunarPhase, LunarPhaseConfig, LunarPhaseEvent};
pub use search_util::{
    ScanConfig, SearchDirection, Transition, angular_distance, bisect_transition,
    normalize_to_pm180, scan_transitions,
};
pub use sign::{ALL_SIGNS, Sign, SignPosition, degree_in_sign, sign_index, sign_position};
pub use stationary::{next_stationary, prev_stationary, search_stationary};
pub use stationary_types::{StationType, StationaryConfig, StationaryEvent};
pub use void_of_course::{days_to_sign_exit, find_void_periods, is_void_at, void_status_at};
pub use void_types::{
    Aspect, AspectHit, DEFAULT_TRACKED_BODIES, MAJOR_ASPECTS, VoidConfig, VoidPeriod, VoidStatus,
};
