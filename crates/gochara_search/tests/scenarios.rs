//! End-to-end detector scenarios on small synthetic oracles.

use gochara_core::{Body, CelestialSample, FnOracle, PositionOracle};
use gochara_search::{
    AstroEvent, IngressConfig, LunarPhase, LunarPhaseConfig, SearchError, StationType,
    StationaryConfig, VoidConfig, find_void_periods, search_ingresses, search_lunar_phases,
    search_stationary, void_status_at,
};

/// Mean lunar and solar rates, so the synodic period is ~29.53 days.
fn mean_luminaries() -> impl PositionOracle {
    FnOracle::new(|body, t| {
        let speed = match body {
            Body::Moon => 13.176_396,
            Body::Sun => 0.985_609,
            _ => 0.0,
        };
        Ok(CelestialSample::new(body, t, speed * t, speed))
    })
}

#[test]
fn new_moon_at_range_start_and_one_synodic_month_later() {
    let cfg = LunarPhaseConfig {
        classify_eclipses: false,
        ..LunarPhaseConfig::default()
    };
    let events = search_lunar_phases(&mean_luminaries(), 0.0, 40.0, &cfg).unwrap();
    let new_moons: Vec<f64> = events
        .iter()
        .filter(|e| e.phase == LunarPhase::NewMoon)
        .map(|e| e.jd)
        .collect();

    assert_eq!(new_moons.len(), 2, "{new_moons:?}");
    assert!(new_moons[0].abs() < 1e-6);
    assert!((new_moons[1] - 29.53).abs() < 0.01);

    let full: Vec<_> = events
        .iter()
        .filter(|e| e.phase == LunarPhase::FullMoon)
        .collect();
    assert_eq!(full.len(), 1);
    assert!((full[0].jd - 29.5305 / 2.0).abs() < 0.01);
}

#[test]
fn single_retrograde_station() {
    let oracle = FnOracle::new(|body, t| {
        let (lon, speed) = if t < 10.0 {
            (100.0 + t, 1.0)
        } else {
            (120.0 - t, -1.0)
        };
        Ok(CelestialSample::new(body, t, lon, speed))
    });
    let events =
        search_stationary(&oracle, Body::Mars, 0.0, 30.0, &StationaryConfig::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].station_type, StationType::StationRetrograde);
    assert!((events[0].jd - 10.0).abs() < 1e-6);
    assert!(
        events
            .iter()
            .all(|e| e.station_type != StationType::StationDirect)
    );
}

#[test]
fn ingress_across_zero_aries() {
    let oracle = FnOracle::new(|body, t| Ok(CelestialSample::new(body, t, 350.0 + 2.0 * t, 2.0)));
    let events =
        search_ingresses(&oracle, Body::Sun, 0.0, 10.0, &IngressConfig::default()).unwrap();
    assert_eq!(events.len(), 1);
    let e = events[0];
    assert_eq!((e.from_sign, e.to_sign), (11, 0));
    assert!((e.jd - 5.0).abs() < 1e-6);
    assert!(!e.retrograde);
    assert!(matches!(AstroEvent::from(e), AstroEvent::Ingress(_)));
}

#[test]
fn moon_late_in_sign_is_void() {
    let oracle = FnOracle::new(|body, t| {
        let s = match body {
            Body::Moon => CelestialSample::new(body, t, 29.0 + 13.0 * t, 13.0),
            _ => CelestialSample::new(body, t, 40.0, 0.0),
        };
        Ok(s)
    });
    let cfg = VoidConfig {
        tracked_bodies: vec![Body::Jupiter],
        ..VoidConfig::default()
    };
    let status = void_status_at(&oracle, 0.0, &cfg).unwrap();
    assert!(status.is_void);
    assert_eq!(status.moon_sign, 0);
    let exit = status.days_to_exit.unwrap();
    assert!((exit - 0.077).abs() < 1e-3, "{exit}");
}

#[test]
fn void_empty_range_versus_bad_step() {
    let oracle = mean_luminaries();
    let cfg = VoidConfig {
        tracked_bodies: vec![Body::Sun],
        ..VoidConfig::default()
    };
    assert_eq!(find_void_periods(&oracle, 12.0, 12.0, &cfg).unwrap(), vec![]);

    let zero_step = VoidConfig {
        step_size_days: 0.0,
        ..cfg
    };
    assert!(matches!(
        find_void_periods(&oracle, 12.0, 12.0, &zero_step),
        Err(SearchError::InvalidConfig(_))
    ));
}

#[test]
fn oracle_errors_propagate() {
    let oracle = FnOracle::new(|body, t| {
        if t > 5.0 {
            Err(gochara_core::OracleError::EpochOutOfRange { jd: t })
        } else {
            Ok(CelestialSample::new(body, t, t, 1.0))
        }
    });
    let err = search_ingresses(&oracle, Body::Sun, 0.0, 10.0, &IngressConfig::default());
    assert!(matches!(err, Err(SearchError::Oracle(_))));
}
