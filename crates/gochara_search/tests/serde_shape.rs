//! Serialized record shapes. Run with `--features serde`.
#![cfg(feature = "serde")]

use gochara_core::{Body, CelestialSample, FnOracle};
use gochara_search::{
    AstroEvent, EclipseInfo, EclipseKind, IngressEvent, LunarPhase, LunarPhaseEvent,
    StationType, StationaryEvent, VoidConfig, VoidPeriod, find_void_periods,
};
use serde_json::{Value, json};

#[test]
fn station_record() {
    let e = AstroEvent::from(StationaryEvent {
        jd: 2_460_651.0,
        body: Body::Mars,
        station_type: StationType::StationRetrograde,
        longitude_deg: 126.0,
        sign_index: 4,
        degree_in_sign: 6.0,
    });
    let v = serde_json::to_value(e).unwrap();
    assert_eq!(v["type"], "station_retrograde");
    assert_eq!(v["body"], "mars");
    assert_eq!(v["time"], 2_460_651.0);
    assert_eq!(v["sign"], 4);
    assert_eq!(v["degreeInSign"], 6.0);
}

#[test]
fn ingress_record() {
    let e = AstroEvent::Ingress(IngressEvent {
        jd: 10.0,
        body: Body::Moon,
        from_sign: 11,
        to_sign: 0,
        retrograde: false,
        longitude_deg: 0.0,
    });
    let v = serde_json::to_value(e).unwrap();
    assert_eq!(v["type"], "ingress");
    assert_eq!(v["fromSign"], 11);
    assert_eq!(v["toSign"], 0);
    assert_eq!(v["retrograde"], false);
}

#[test]
fn phase_record_with_and_without_eclipse() {
    let mut e = LunarPhaseEvent {
        jd: 5.0,
        phase: LunarPhase::NewMoon,
        moon_longitude_deg: 19.0,
        sun_longitude_deg: 19.0,
        moon_sign: 0,
        sun_sign: 0,
        eclipse: Some(EclipseInfo {
            kind: EclipseKind::Solar,
            distance_to_node_deg: 3.0,
        }),
    };
    let v = serde_json::to_value(AstroEvent::from(e)).unwrap();
    assert_eq!(v["type"], "new_moon");
    assert_eq!(v["moonSign"], 0);
    assert_eq!(v["sunSign"], 0);
    assert_eq!(v["eclipse"], json!({"kind": "solar", "distanceToNodeDeg": 3.0}));

    e.eclipse = None;
    let v = serde_json::to_value(AstroEvent::from(e)).unwrap();
    assert_eq!(v["eclipse"], Value::Null);
}

#[test]
fn void_period_record() {
    let p = VoidPeriod::new(1.0, 1.5, 3, true, false, false);
    let v = serde_json::to_value(p).unwrap();
    assert_eq!(v["startTime"], 1.0);
    assert_eq!(v["endTime"], 1.5);
    assert_eq!(v["durationHours"], 12.0);
    assert_eq!(v["moonSign"], 3);
    assert_eq!(v["startedBeforeRangeStart"], true);
    assert_eq!(v["startEstimated"], false);
}

#[test]
fn void_config_from_partial_toml_like_json() {
    let cfg: VoidConfig = serde_json::from_value(json!({
        "step_size_days": 0.02,
        "tracked_bodies": ["sun", "mars"],
        "aspects": ["conjunction", "opposition"]
    }))
    .unwrap();
    assert_eq!(cfg.tracked_bodies, vec![Body::Sun, Body::Mars]);
    assert_eq!(cfg.projection_passes, 3);

    let oracle = FnOracle::new(|body, t| Ok(CelestialSample::new(body, t, 13.0 * t, 13.0)));
    assert!(find_void_periods(&oracle, 0.0, 1.0, &cfg).is_ok());
}
