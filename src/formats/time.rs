use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[.,](\d{3})$").expect("timestamp pattern is valid")
});

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}[.,]\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}[.,]\d{3})")
        .expect("time range pattern is valid")
});

/// Float products like `1.001 * 1000.0` can land a hair below the integer;
/// this nudge keeps floor() on the intended millisecond.
const MS_EPSILON: f64 = 1e-6;

/// Format seconds as `HH:MM:SS.mmm`. Negative or non-finite input clamps to zero.
pub fn format_seconds(t: f64) -> String {
    let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
    let total_ms = (t * 1000.0 + MS_EPSILON).floor() as u64;

    let milli = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    let sec = total_seconds % 60;
    let min = (total_seconds / 60) % 60;
    let hour = total_seconds / 3600;

    format!("{hour:02}:{min:02}:{sec:02}.{milli:03}")
}

/// `start --> end`, both sides formatted with [`format_seconds`].
pub fn format_range(start: f64, end: f64) -> String {
    format!("{} --> {}", format_seconds(start), format_seconds(end))
}

/// Parse `HH:MM:SS.mmm` or `HH:MM:SS,mmm` into seconds, exact to the millisecond.
pub fn parse_timestamp(s: &str) -> Result<f64> {
    let t = s.trim();
    let caps = TIMESTAMP
        .captures(t)
        .ok_or_else(|| Error::format(format!("unrecognized timestamp: '{t}'")))?;

    let field = |i: usize| -> Result<u64> {
        caps[i]
            .parse::<u64>()
            .map_err(|_| Error::format(format!("bad timestamp field: '{t}'")))
    };

    let ms = ((field(1)? * 60 + field(2)?) * 60 + field(3)?) * 1000 + field(4)?;
    Ok(ms as f64 / 1000.0)
}

/// Parse a `<time> --> <time>` line into `(start, end)` seconds.
pub fn parse_time_range(line: &str) -> Result<(f64, f64)> {
    let caps = TIME_RANGE
        .captures(line)
        .ok_or_else(|| Error::format(format!("missing '<time> --> <time>' in: '{line}'")))?;
    let start = parse_timestamp(&caps[1])?;
    let end = parse_timestamp(&caps[2])?;
    Ok((start, end))
}

/// Seconds (`62.5`) or a timestamp (`00:01:02.500`). Used for CLI time arguments.
pub fn parse_seconds_or_timestamp(s: &str) -> Result<f64> {
    let t = s.trim();
    if let Ok(v) = t.parse::<f64>() {
        if v.is_finite() && v >= 0.0 {
            return Ok(v);
        }
        return Err(Error::format(format!("time must be a non-negative number: '{t}'")));
    }
    parse_timestamp(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_seconds(0.0), "00:00:00.000");
        assert_eq!(format_seconds(62.5), "00:01:02.500");
        assert_eq!(format_seconds(3723.004), "01:02:03.004");
        assert_eq!(format_seconds(359999.999), "99:59:59.999");
    }

    #[test]
    fn format_floors_sub_millisecond() {
        assert_eq!(format_seconds(1.0019), "00:00:01.001");
    }

    #[test]
    fn format_clamps_negative_and_nan() {
        assert_eq!(format_seconds(-3.0), "00:00:00.000");
        assert_eq!(format_seconds(f64::NAN), "00:00:00.000");
    }

    #[test]
    fn both_separators_accepted() {
        let dot = parse_timestamp("00:01:02.500").unwrap();
        let comma = parse_timestamp("00:01:02,500").unwrap();
        assert_eq!(dot, 62.5);
        assert_eq!(comma, 62.5);
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["1:02:03.500", "00:01:02", "00:01:02.5", "00:01:02;500", "xx:01:02.500", ""] {
            assert!(
                matches!(parse_timestamp(bad), Err(Error::Format(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn parses_range_line() {
        let (s, e) = parse_time_range("00:00:01,000 --> 00:00:02,500").unwrap();
        assert_eq!((s, e), (1.0, 2.5));
        assert!(parse_time_range("00:00:01,000 00:00:02,500").is_err());
    }

    #[test]
    fn cli_time_accepts_both_forms() {
        assert_eq!(parse_seconds_or_timestamp("1.25").unwrap(), 1.25);
        assert_eq!(parse_seconds_or_timestamp("00:00:01.250").unwrap(), 1.25);
        assert!(parse_seconds_or_timestamp("-1").is_err());
    }

    #[quickcheck_macros::quickcheck]
    fn prop_round_trip_millis(ms: u32) -> bool {
        let ms = u64::from(ms) % 360_000_000;
        let t = ms as f64 / 1000.0;
        let back = parse_timestamp(&format_seconds(t)).unwrap();
        (back - t).abs() < 0.001
    }
}
