//! UTC <-> Julian Date conversion for command-line arguments and output.

use chrono::{DateTime, NaiveDate, Utc};

/// Julian Date of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn utc_to_jd(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// `None` when the JD is outside chrono's representable range.
pub fn jd_to_utc(jd: f64) -> Option<DateTime<Utc>> {
    let seconds = (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Parse a time argument: a bare Julian Date, an RFC 3339 timestamp, or a
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_time(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if let Ok(jd) = s.parse::<f64>() {
        if jd.is_finite() {
            return Ok(jd);
        }
        return Err(format!("invalid Julian Date: {s}"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(utc_to_jd(dt.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(utc_to_jd(midnight.and_utc()));
        }
    }
    Err(format!(
        "invalid time '{s}': expected a Julian Date, RFC 3339 (2024-03-20T03:06:00Z) or YYYY-MM-DD"
    ))
}

/// Human-readable UTC, falling back to the raw JD.
pub fn format_jd(jd: f64) -> String {
    match jd_to_utc(jd) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("JD {jd:.6}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch() {
        let jd = parse_time("1970-01-01T00:00:00Z").unwrap();
        assert!((jd - UNIX_EPOCH_JD).abs() < 1e-9);
    }

    #[test]
    fn j2000_noon() {
        let jd = parse_time("2000-01-01T12:00:00Z").unwrap();
        assert!((jd - 2_451_545.0).abs() < 1e-9);
        assert_eq!(format_jd(jd), "2000-01-01 12:00:00 UTC");
    }

    #[test]
    fn bare_jd_and_date() {
        assert_eq!(parse_time("2460310.5").unwrap(), 2_460_310.5);
        assert!((parse_time("2024-01-01").unwrap() - 2_460_310.5).abs() < 1e-9);
    }

    #[test]
    fn offset_is_applied() {
        let a = parse_time("2024-01-01T05:30:00+05:30").unwrap();
        assert!((a - 2_460_310.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_time("yesterday").is_err());
        assert!(parse_time("NaN").is_err());
    }

    #[test]
    fn jd_utc_agree() {
        let jd = 2_460_409.25;
        let back = utc_to_jd(jd_to_utc(jd).unwrap());
        assert!((back - jd).abs() < 1e-8);
    }
}
