//! Mission time helpers.
//!
//! Simulated time is a plain `f64` of epoch seconds held in the
//! `m_present_time` field; the physics step is fractional-second capable so
//! an integer tick would not fit.  Calendar conversion goes through `chrono`
//! and is only needed for UTC-window start conditions and log output.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::{CoreError, CoreResult};

/// Epoch seconds of a `YYYYMMDD` date and optional `HH:MM` time (UTC).
pub fn epoch_from_strings(date: &str, time: Option<&str>) -> CoreResult<f64> {
    let day = NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| CoreError::Parse(format!("date `{date}`: {e}")))?;
    let stamp: NaiveDateTime = match time {
        Some(t) => {
            let clock = chrono::NaiveTime::parse_from_str(t, "%H:%M")
                .map_err(|e| CoreError::Parse(format!("time `{t}`: {e}")))?;
            day.and_time(clock)
        }
        None => day.and_hms_opt(0, 0, 0).ok_or_else(|| CoreError::Parse(date.to_owned()))?,
    };
    Ok(Utc.from_utc_datetime(&stamp).timestamp() as f64)
}

/// Convert epoch seconds to a UTC timestamp (sub-second part dropped).
pub fn to_utc(t: f64) -> CoreResult<DateTime<Utc>> {
    if !t.is_finite() {
        return Err(CoreError::TimeOutOfRange(t));
    }
    DateTime::<Utc>::from_timestamp(t.floor() as i64, 0).ok_or(CoreError::TimeOutOfRange(t))
}

/// Epoch seconds of the minute `(month, day, hour, minute)` in `year`,
/// or `None` when that calendar minute does not exist.
pub fn minute_start(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<f64> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .map(|dt| dt.timestamp() as f64)
}

/// Calendar components `(year, month, day, hour, minute)` of `t`.
pub fn calendar(t: f64) -> CoreResult<(i32, u32, u32, u32, u32)> {
    let dt = to_utc(t)?;
    Ok((dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute()))
}

/// Break elapsed seconds into `(days, hours, minutes)` for log lines.
pub fn elapsed_dhm(secs: f64) -> (u64, u32, u32) {
    let total = secs.max(0.0) as u64;
    let days = total / 86_400;
    let hours = ((total % 86_400) / 3_600) as u32;
    let minutes = ((total % 3_600) / 60) as u32;
    (days, hours, minutes)
}

/// `"day D HH:MM"` rendering of elapsed mission seconds.
pub fn format_elapsed(secs: f64) -> String {
    let (d, h, m) = elapsed_dhm(secs);
    format!("day {d} {h:02}:{m:02}")
}
