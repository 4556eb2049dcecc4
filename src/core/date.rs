//! Date and timestamp coercion, plus cascading date floors.
//!
//! Dates default to the local time zone. Timestamps are milliseconds since
//! the Unix epoch.

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Naive layouts interpreted in local time.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Anything a caller may hand to the date helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Date(DateTime<Local>),
    Millis(i64),
    Text(String),
}

impl DateInput {
    /// Interpret a command-line style argument: integers are timestamps,
    /// everything else is date text.
    pub fn from_arg(arg: &str) -> Self {
        match arg.trim().parse::<i64>() {
            Ok(ms) => Self::Millis(ms),
            Err(_) => Self::Text(arg.to_string()),
        }
    }

    /// Interpret a JSON value. `null` is treated as absent.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(Self::Text(text.clone()))),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .map(|ms| Some(Self::Millis(ms)))
                .ok_or_else(|| Error::date_invalid(n.to_string())),
            other => Err(Error::date_invalid(other.to_string())),
        }
    }

    fn is_falsy(&self) -> bool {
        match self {
            Self::Date(_) => false,
            Self::Millis(ms) => *ms == 0,
            Self::Text(text) => text.is_empty(),
        }
    }

    /// Convert to a date without the falsy-means-now shortcut.
    pub fn into_date(self) -> Result<DateTime<Local>> {
        match self {
            Self::Date(date) => Ok(date),
            Self::Millis(ms) => from_millis(ms),
            Self::Text(text) => parse_date(&text).ok_or_else(|| Error::date_invalid(text)),
        }
    }
}

impl From<DateTime<Local>> for DateInput {
    fn from(date: DateTime<Local>) -> Self {
        Self::Date(date)
    }
}

impl From<i64> for DateInput {
    fn from(ms: i64) -> Self {
        Self::Millis(ms)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Parse date text. Date-only ISO strings are UTC midnight; date-times
/// without an offset are local time.
pub fn parse_date(text: &str) -> Option<DateTime<Local>> {
    let text = text.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Local));
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.with_timezone(&Local));
    }

    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = day.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(&Local));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y/%m/%d") {
        return Local.from_local_datetime(&day.and_hms_opt(0, 0, 0)?).earliest();
    }

    None
}

pub fn from_millis(ms: i64) -> Result<DateTime<Local>> {
    DateTime::from_timestamp_millis(ms)
        .map(|date| date.with_timezone(&Local))
        .ok_or_else(|| Error::date_invalid(ms.to_string()))
}

/// Ensure we have a date. Absent or falsy input (`0`, `""`) means now.
pub fn ensure_date(input: Option<DateInput>) -> Result<DateTime<Local>> {
    match input {
        Some(input) if !input.is_falsy() => input.into_date(),
        _ => Ok(Local::now()),
    }
}

/// Ensure we have a millisecond timestamp.
pub fn ensure_time(input: DateInput) -> Result<i64> {
    match input {
        DateInput::Millis(ms) => Ok(ms),
        DateInput::Date(date) => Ok(date.timestamp_millis()),
        DateInput::Text(text) => parse_date(&text)
            .map(|date| date.timestamp_millis())
            .ok_or_else(|| Error::date_invalid(text)),
    }
}

/// Granularity for [`floor_date`]. Each level also truncates every finer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Floor {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Millisecond,
}

impl Floor {
    /// Unknown or missing selectors fall back to millisecond truncation.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            Some("year") => Self::Year,
            Some("month") => Self::Month,
            Some("day") => Self::Day,
            Some("hour") => Self::Hour,
            Some("minute") => Self::Minute,
            _ => Self::Millisecond,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Millisecond => "millisecond",
        }
    }
}

pub fn floor_naive(floor: Floor, naive: NaiveDateTime) -> NaiveDateTime {
    let (month, day, hour, minute, second) = match floor {
        Floor::Year => (1, 1, 0, 0, 0),
        Floor::Month => (naive.month(), 1, 0, 0, 0),
        Floor::Day => (naive.month(), naive.day(), 0, 0, 0),
        Floor::Hour => (naive.month(), naive.day(), naive.hour(), 0, 0),
        Floor::Minute => (naive.month(), naive.day(), naive.hour(), naive.minute(), 0),
        Floor::Millisecond => (
            naive.month(),
            naive.day(),
            naive.hour(),
            naive.minute(),
            naive.second(),
        ),
    };

    NaiveDate::from_ymd_opt(naive.year(), month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .unwrap_or(naive)
}

/// Floor a date in its own time zone, returning a new value.
///
/// A floored wall-clock time that falls into a DST gap keeps the original
/// UTC offset.
pub fn floor_date<Tz: TimeZone>(floor: Floor, date: DateTime<Tz>) -> DateTime<Tz> {
    let tz = date.timezone();
    let floored = floor_naive(floor, date.naive_local());

    tz.from_local_datetime(&floored).earliest().unwrap_or_else(|| {
        let offset = date.offset().fix();
        tz.from_utc_datetime(&(floored - offset))
    })
}

/// Floor a date in place and hand the same reference back.
pub fn floor_date_in_place<Tz: TimeZone>(floor: Floor, date: &mut DateTime<Tz>) -> &mut DateTime<Tz> {
    *date = floor_date(floor, date.clone());
    date
}

/// Floor an arbitrary input, defaulting to now when none is given.
///
/// Only an absent input means now; `0` is the epoch.
pub fn floor_date_or_now(floor: Floor, input: Option<DateInput>) -> Result<DateTime<Local>> {
    floor_date_or_now_in(floor, input, &Local)
}

/// [`floor_date_or_now`] with the floor applied in `tz`.
pub fn floor_date_or_now_in<Tz: TimeZone>(
    floor: Floor,
    input: Option<DateInput>,
    tz: &Tz,
) -> Result<DateTime<Tz>> {
    let date = match input {
        Some(input) => input.into_date()?,
        None => Local::now(),
    };
    Ok(floor_date(floor, date.with_timezone(tz)))
}
