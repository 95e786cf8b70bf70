use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::weekday_name;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::time_slot::TimeSlot;

/// How far a weekly availability pattern is meant to repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurrenceType {
    #[default]
    Week,
    Month,
    TwoMonths,
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::TwoMonths => "twoMonths",
        };
        f.write_str(name)
    }
}

impl FromStr for RecurrenceType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "twoMonths" | "two-months" | "two_months" => Ok(Self::TwoMonths),
            other => Err(ScheduleError::Validation(format!(
                "Unknown recurrence type: {other}"
            ))),
        }
    }
}

/// One day of the rolling weekly window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub weekday: Weekday,
    pub date: NaiveDate,
    /// Local midnight of `date` as a UTC instant.
    #[serde(rename = "dateUTC")]
    pub date_utc: DateTime<Utc>,
    pub is_enabled: bool,
    pub time_slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// A selected calendar date and its slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSchedule {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_slots: Vec<TimeSlot>,
    pub is_recurring: bool,
    /// Entry this one was expanded from, for generated weekly recurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_of: Option<Uuid>,
}

impl DateSchedule {
    pub fn new(date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time_slots,
            is_recurring: false,
            recurrence_of: None,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.recurrence_of.is_some()
    }

    pub fn slot(&self, index: usize) -> ScheduleResult<&TimeSlot> {
        self.time_slots
            .get(index)
            .ok_or_else(|| ScheduleError::NotFound(format!("Time slot {index} on {}", self.date)))
    }
}
