use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::time::ClockTime;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("End time {end} must be after start time {start}")]
    InvalidRange { start: ClockTime, end: ClockTime },

    #[error("Date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("Time {time} on {date} is in the past")]
    TimeInPast { date: NaiveDate, time: ClockTime },

    #[error("No time left on {0} to schedule a slot")]
    NoTimeRemaining(NaiveDate),

    #[error("Day {0} has no room for another slot")]
    DayFull(NaiveDate),

    #[error("Nothing selected to save")]
    NothingSelected,

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Local time {0} cannot be resolved in this timezone")]
    UnresolvableLocalTime(NaiveDateTime),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
