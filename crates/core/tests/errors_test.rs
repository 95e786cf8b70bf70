use std::error::Error;

use availsync_core::errors::{ScheduleError, ScheduleResult};
use availsync_core::time::ClockTime;
use chrono::NaiveDate;

#[test]
fn test_schedule_error_display() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let not_found = ScheduleError::NotFound("Day 9 in weekly window".to_string());
    let range = ScheduleError::InvalidRange {
        start: ClockTime::parse("10:00").unwrap(),
        end: ClockTime::parse("09:00").unwrap(),
    };
    let past = ScheduleError::TimeInPast {
        date,
        time: ClockTime::parse("08:15").unwrap(),
    };

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Day 9 in weekly window"
    );
    assert_eq!(
        range.to_string(),
        "End time 09:00 must be after start time 10:00"
    );
    assert_eq!(past.to_string(), "Time 08:15 on 2026-10-17 is in the past");
    assert_eq!(
        ScheduleError::DateInPast(date).to_string(),
        "Date 2026-10-17 is in the past"
    );
    assert_eq!(
        ScheduleError::DayFull(date).to_string(),
        "Day 2026-10-17 has no room for another slot"
    );
    assert_eq!(
        ScheduleError::UnknownTimezone("Mars/Olympus".to_string()).to_string(),
        "Unknown timezone: Mars/Olympus"
    );
}

#[test]
fn test_schedule_error_has_no_source() {
    let error = ScheduleError::Validation("Invalid month: 2026-13".to_string());
    assert!(error.source().is_none());
}

#[test]
fn test_schedule_result() {
    let result: ScheduleResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: ScheduleResult<i32> = Err(ScheduleError::NothingSelected);
    assert!(result.is_err());
}

#[test]
fn test_error_boxes_as_std_error() {
    let boxed: Box<dyn Error + Send + Sync> = Box::new(ScheduleError::NothingSelected);
    assert_eq!(boxed.to_string(), "Nothing selected to save");
}
