use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::time::{local_to_utc, ClockTime};

/// Which end of a slot an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotField {
    StartTime,
    EndTime,
}

/// A contiguous local time-of-day interval on one date.
///
/// The local times are what the user edits; the UTC mirrors are recomputed whenever the times
/// change and are what gets submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: DateTime<Utc>,
    #[serde(rename = "endTimeUTC")]
    pub end_time_utc: DateTime<Utc>,
    pub is_editing: bool,
}

impl TimeSlot {
    /// Creates a slot on `date` with a fresh id.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::InvalidRange` - `end` is not strictly after `start`, locally or once both
    ///   are placed in `tz` (a start inside a spring-forward gap moves forward)
    /// * `ScheduleError::UnresolvableLocalTime` - a time cannot be placed in `tz`
    pub fn new(tz: &Tz, date: NaiveDate, start: ClockTime, end: ClockTime) -> ScheduleResult<Self> {
        let (start_time_utc, end_time_utc) = resolve(tz, date, start, end)?;
        Ok(Self {
            id: Uuid::new_v4(),
            start_time: start,
            end_time: end,
            start_time_utc,
            end_time_utc,
            is_editing: false,
        })
    }

    /// Replaces both local times, refreshing the UTC mirrors. On error the slot is untouched.
    pub fn set_times(
        &mut self,
        tz: &Tz,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> ScheduleResult<()> {
        let (start_utc, end_utc) = resolve(tz, date, start, end)?;

        self.start_time = start;
        self.end_time = end;
        self.start_time_utc = start_utc;
        self.end_time_utc = end_utc;
        Ok(())
    }

    /// Same local pattern on another date, with a new id.
    pub fn copy_to(&self, tz: &Tz, date: NaiveDate) -> ScheduleResult<Self> {
        Self::new(tz, date, self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end_time.total_minutes().saturating_sub(self.start_time.total_minutes())
    }
}

/// Both ends as UTC instants, end strictly after start.
fn resolve(
    tz: &Tz,
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
) -> ScheduleResult<(DateTime<Utc>, DateTime<Utc>)> {
    ensure_ordered(start, end)?;
    let start_utc = local_to_utc(tz, date, start)?;
    let end_utc = local_to_utc(tz, date, end)?;
    if end_utc <= start_utc {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    Ok((start_utc, end_utc))
}

fn ensure_ordered(start: ClockTime, end: ClockTime) -> ScheduleResult<()> {
    if end <= start || start.is_end_of_day() {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    Ok(())
}
