use crate::error::{ParseError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::Path;

pub fn ensure_utf8<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = fs::read(&path)?;
    String::from_utf8(bytes).map_err(|_| ParseError::NotUtf8(path.as_ref().to_path_buf()))
}

/// Joins separate date and time tokens, e.g. `180101` + `0015`.
pub fn parse_date_time(
    date: &str,
    time: &str,
    date_fmt: &str,
    time_fmt: &str,
) -> Option<NaiveDateTime> {
    let d = NaiveDate::parse_from_str(date, date_fmt).ok()?;
    let t = NaiveTime::parse_from_str(time, time_fmt).ok()?;
    Some(d.and_time(t))
}

pub fn to_secs(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

/// Lenient float parsing; anything that isn't a number becomes NaN.
pub fn parse_f64(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}
