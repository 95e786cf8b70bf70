//! # Time of day and local/UTC conversion
//!
//! Slots are edited as local wall-clock times (`"HH:MM"`) attached to a calendar date and
//! serialized as absolute UTC instants. This module holds the [`ClockTime`] value type, the
//! option lists offered to the user, and the conversion from a local date + time in an IANA
//! timezone to UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ScheduleError, ScheduleResult};

/// Minutes in a calendar day; also the value of the `24:00` end-of-day sentinel.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Granularity of the specific-date editor, in minutes.
pub const QUARTER_HOUR: u16 = 15;

/// How far back (in quarter hours) to look for the offset in force before a DST gap.
const GAP_SEARCH_STEPS: i64 = 26 * 4;

/// A local time of day with minute precision.
///
/// Valid values run from `00:00` to `23:59`. `24:00` is accepted as well and means the end of
/// the day; it only makes sense as the end of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    /// Builds a time from an hour and minute.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::InvalidTime` - the hour/minute pair is outside `00:00..=24:00`
    pub fn new(hour: u32, minute: u32) -> ScheduleResult<Self> {
        match (hour, minute) {
            (24, 0) => Ok(Self::END_OF_DAY),
            (h, m) if h < 24 && m < 60 => Ok(Self((h * 60 + m) as u16)),
            (h, m) => Err(ScheduleError::InvalidTime(format!("{h:02}:{m:02}"))),
        }
    }

    /// Whole hour, e.g. `ClockTime::at_hour(9)` is `09:00`. Hours past 24 saturate.
    pub fn at_hour(hour: u16) -> Self {
        Self(hour.saturating_mul(60).min(MINUTES_PER_DAY))
    }

    /// Parses the `"HH:MM"` form used on the wire and in the UI.
    pub fn parse(input: &str) -> ScheduleResult<Self> {
        let invalid = || ScheduleError::InvalidTime(input.to_string());

        let (hour, minute) = input.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn total_minutes(self) -> u16 {
        self.0
    }

    pub fn is_end_of_day(self) -> bool {
        self.0 == MINUTES_PER_DAY
    }

    /// Adds minutes, saturating at `24:00`. Slots never roll over into the next day.
    pub fn add_minutes(self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(MINUTES_PER_DAY))
    }

    /// Rounds up to the next multiple of `step` minutes (a no-op when already aligned).
    pub fn round_up_to(self, step: u16) -> Self {
        if step == 0 {
            return self;
        }
        Self(self.0.div_ceil(step).saturating_mul(step).min(MINUTES_PER_DAY))
    }

    /// The local date-time this time denotes on `date`; `24:00` is midnight of the next day.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::default()) + Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// The 24 hour-aligned start times `00:00` through `23:00`.
pub fn hourly_options() -> Vec<ClockTime> {
    (0..24).map(ClockTime::at_hour).collect()
}

/// Hour-aligned end times strictly after `start`, up to and including `24:00`.
pub fn hourly_end_options(start: ClockTime) -> Vec<ClockTime> {
    (1..=24)
        .map(ClockTime::at_hour)
        .filter(|end| *end > start)
        .collect()
}

/// Quarter-hour start options for `date`.
///
/// On the current local date of `tz`, options whose wall-clock time is already behind `now` are
/// left out, so the first entry is the earliest slot that can still be booked today.
pub fn quarter_hour_options(tz: &Tz, date: NaiveDate, now: DateTime<Utc>) -> Vec<ClockTime> {
    let local_now = now.with_timezone(tz).naive_local();
    let options = (0..MINUTES_PER_DAY).step_by(usize::from(QUARTER_HOUR)).map(ClockTime);

    if date != local_now.date() {
        return options.collect();
    }
    options.filter(|time| time.on(date) >= local_now).collect()
}

/// Whether `time` on `date` is already behind `now` on the wall clock of `tz`.
pub fn is_past(tz: &Tz, date: NaiveDate, time: ClockTime, now: DateTime<Utc>) -> bool {
    time.on(date) < now.with_timezone(tz).naive_local()
}

/// `now` on the wall clock of `tz`, rounded up to the next quarter hour (`24:00` late at night).
///
/// Any seconds past the minute count as a started minute, so the result is never behind `now`.
pub fn next_quarter_hour(tz: &Tz, now: DateTime<Utc>) -> ClockTime {
    let local = now.with_timezone(tz).time();
    let minute = ClockTime::from_naive_time(local);
    let minute = if local.second() > 0 || local.nanosecond() > 0 {
        minute.add_minutes(1)
    } else {
        minute
    };
    minute.round_up_to(QUARTER_HOUR)
}

/// The calendar date `now` falls on in `tz`.
pub fn local_today(tz: &Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

/// Converts a local wall-clock date and time in `tz` to a UTC instant.
///
/// Ambiguous local times (clocks falling back) resolve to the earliest instant. Local times that
/// fall into a gap (clocks springing forward) are read with the offset in force before the gap,
/// which moves them forward by the length of the gap.
///
/// # Errors
///
/// * `ScheduleError::UnresolvableLocalTime` - no valid offset could be found around the gap
pub fn local_to_utc(tz: &Tz, date: NaiveDate, time: ClockTime) -> ScheduleResult<DateTime<Utc>> {
    let local = time.on(date);

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            let chosen = if first <= second { first } else { second };
            warn!(
                %local,
                timezone = tz.name(),
                "ambiguous local time; using earliest"
            );
            Ok(chosen.with_timezone(&Utc))
        }
        LocalResult::None => resolve_gap(tz, local),
    }
}

/// UTC instant of local midnight starting `date`.
pub fn local_midnight_utc(tz: &Tz, date: NaiveDate) -> ScheduleResult<DateTime<Utc>> {
    local_to_utc(tz, date, ClockTime::MIDNIGHT)
}

fn resolve_gap(tz: &Tz, local: NaiveDateTime) -> ScheduleResult<DateTime<Utc>> {
    let offset = (1..=GAP_SEARCH_STEPS)
        .find_map(|step| {
            tz.from_local_datetime(&(local - Duration::minutes(i64::from(QUARTER_HOUR) * step)))
                .earliest()
        })
        .map(|before| before.offset().fix())
        .ok_or(ScheduleError::UnresolvableLocalTime(local))?;

    let resolved = offset
        .from_local_datetime(&local)
        .single()
        .ok_or(ScheduleError::UnresolvableLocalTime(local))?
        .with_timezone(&Utc);

    debug!(
        %local,
        timezone = tz.name(),
        %resolved,
        "local time falls in a DST gap; shifted forward"
    );
    Ok(resolved)
}

/// Parses an IANA timezone name such as `"Europe/Berlin"`.
pub fn parse_timezone(name: &str) -> ScheduleResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone(name.to_string()))
}
