// Time utility functions

use crate::Error;

use crate::error::{self, RCError};
use crate::Result;
use chrono::{DateTime, Local, TimeZone};
use std;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::time::Duration;

enum Time {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl Time {
    fn to_milliseconds(&self) -> u64 {
        match self {
            Time::Millisecond => 1,
            Time::Second => 1000,
            Time::Minute => 60 * 1000,
            Time::Hour => 3600 * 1000,
            Time::Day => 86400 * 1000,
        }
    }
}

impl TryFrom<&str> for Time {
    type Error = Error;

    fn try_from(unit: &str) -> std::result::Result<Self, Self::Error> {
        match unit {
            "ms" | "millisecond" | "milliseconds" => Ok(Time::Millisecond),
            "s" | "second" | "seconds" => Ok(Time::Second),
            "m" | "minute" | "minutes" => Ok(Time::Minute),
            "h" | "hour" | "hours" => Ok(Time::Hour),
            "d" | "day" | "days" => Ok(Time::Day),
            _ => Err(error::gen(format!(
                "Unknown time unit: {} - valid units are ms, s, m, h, d",
                unit
            ))),
        }
    }
}

pub fn now_epoch_seconds() -> Seconds {
    let now_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    Seconds(now_epoch)
}

/// Render an epoch timestamp in local time, e.g. `2024-01-13 19:50:23`.
pub fn epoch_to_local(epoch: Seconds) -> String {
    match Local.timestamp_opt(*epoch as i64, 0).single() {
        Some(date) => format_local(date),
        None => epoch.to_string(),
    }
}

fn format_local(date: DateTime<Local>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Seconds(u64);

impl Seconds {
    pub fn new(seconds: u64) -> Self {
        Seconds(seconds)
    }
}

impl Deref for Seconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Seconds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Milliseconds(u64);

impl Milliseconds {
    pub fn new(milliseconds: u64) -> Self {
        Milliseconds(milliseconds)
    }
}

impl Deref for Milliseconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Milliseconds> for Duration {
    fn from(milliseconds: Milliseconds) -> Self {
        Duration::from_millis(milliseconds.0)
    }
}

impl Display for Milliseconds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert a string with time format to milliseconds.
/// A string with time format is an amount followed by its unit, like:
/// 300ms, 1s, 2 seconds, 2second, 2 s
/// The same would apply for minutes (m), hours (h) and days (d). The unit is
/// required and nothing may follow it.
fn string_to_milliseconds(str_fmt: &str) -> Result<Milliseconds> {
    let str_fmt = str_fmt.trim();
    let unit_start = str_fmt
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(str_fmt.len());
    let (amount, unit) = str_fmt.split_at(unit_start);
    if amount.is_empty() {
        return Err(error::gen(format!("Missing amount in {:?}", str_fmt)));
    }
    let unit = unit.trim_start();
    if unit.is_empty() {
        return Err(error::gen(format!(
            "Missing time unit after {} - valid units are ms, s, m, h, d",
            amount
        )));
    }
    let time = Time::try_from(unit)?;
    amount
        .parse::<u64>()
        .ok()
        .and_then(|amount| amount.checked_mul(time.to_milliseconds()))
        .map(Milliseconds)
        .ok_or_else(|| error::gen(format!("{} is too large", str_fmt)))
}

fn conversion_error(str_fmt: &str, err: Error) -> RCError {
    RCError::TimeConversionError(format!(
        "Could not convert {} to time format: {}",
        str_fmt, err,
    ))
}

impl TryFrom<&str> for Seconds {
    type Error = RCError;

    fn try_from(str_fmt: &str) -> std::result::Result<Self, Self::Error> {
        let milliseconds =
            string_to_milliseconds(str_fmt).map_err(|err| conversion_error(str_fmt, err))?;
        if milliseconds.0 % 1000 != 0 {
            return Err(conversion_error(
                str_fmt,
                error::gen("sub-second precision is not supported here"),
            ));
        }
        Ok(Seconds(milliseconds.0 / 1000))
    }
}

impl TryFrom<&str> for Milliseconds {
    type Error = RCError;

    fn try_from(str_fmt: &str) -> std::result::Result<Self, Self::Error> {
        string_to_milliseconds(str_fmt).map_err(|err| conversion_error(str_fmt, err))
    }
}
