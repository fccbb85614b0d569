use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Timelike, Utc};

/// Round a timestamp to the nearest whole second.
///
/// Event keys are second-resolution: a notice observed at
/// `2018-01-16T00:36:52.81` belongs to the event at `2018-01-16T00:36:53`.
pub fn round_to_second(t: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = t
        .with_nanosecond(0)
        .unwrap_or(t);
    if t.nanosecond() >= 500_000_000 {
        truncated + Duration::seconds(1)
    } else {
        truncated
    }
}

/// Parse a VOEvent ISOTime string into a UTC timestamp.
///
/// ISOTime values come without a timezone suffix and may carry fractional
/// seconds, e.g. `2018-01-16T00:36:52.81`.
pub fn parse_isotime(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim().trim_end_matches('Z');
    let naive = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("Invalid ISOTime value: {:?}", s))?;
    Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        parse_isotime(s).unwrap()
    }

    #[test]
    fn test_parse_isotime_with_fraction() {
        let t = utc("2018-01-16T00:36:52.81");
        assert_eq!(t.timestamp_subsec_millis(), 810);
    }

    #[test]
    fn test_parse_isotime_without_fraction() {
        let t = utc("2018-01-16T00:46:05");
        assert_eq!(t.to_rfc3339(), "2018-01-16T00:46:05+00:00");
    }

    #[test]
    fn test_parse_isotime_trailing_z() {
        let t = utc("2015-05-29T02:17:28.28Z");
        assert_eq!(t.timestamp_subsec_millis(), 280);
    }

    #[test]
    fn test_parse_isotime_invalid() {
        assert!(parse_isotime("not a time").is_err());
    }

    #[test]
    fn test_round_up() {
        let t = utc("2018-01-16T00:36:52.81");
        assert_eq!(round_to_second(t), utc("2018-01-16T00:36:53"));
    }

    #[test]
    fn test_round_down() {
        let t = utc("2018-04-22T21:54:11.21");
        assert_eq!(round_to_second(t), utc("2018-04-22T21:54:11"));
    }

    #[test]
    fn test_round_exact_second_unchanged() {
        let t = utc("2015-05-29T02:17:28");
        assert_eq!(round_to_second(t), t);
    }

    #[test]
    fn test_round_distance_bounded() {
        let t = utc("2015-11-15T11:53:44.49");
        let rounded = round_to_second(t);
        let delta = (rounded - t).num_milliseconds().abs();
        assert!(delta < 500);
    }
}
