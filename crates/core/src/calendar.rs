use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};

/// Column headers of a Sunday-first month grid.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub fn days_in_month(year: i32, month: u32) -> ScheduleResult<u32> {
    let first = first_of_month(year, month)?;
    let next = MonthCursor::containing(first).next();
    let following = first_of_month(next.year, next.month)?;
    Ok((following - first).num_days() as u32)
}

/// Sunday-first month grid: one `None` per blank cell before the 1st, then every day.
pub fn month_grid(year: i32, month: u32) -> ScheduleResult<Vec<Option<NaiveDate>>> {
    let first = first_of_month(year, month)?;
    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(year, month)?;

    let mut cells = vec![None; leading];
    cells.extend(first.iter_days().take(days as usize).map(Some));
    Ok(cells)
}

/// `count` consecutive dates starting with `today`.
pub fn next_days(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as i64)
        .map_while(|offset| today.checked_add_signed(Duration::days(offset)))
        .collect()
}

fn first_of_month(year: i32, month: u32) -> ScheduleResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::Validation(format!("Invalid month: {year}-{month:02}")))
}

/// The month currently displayed by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> ScheduleResult<Self> {
        first_of_month(year, month)?;
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses `"YYYY-MM"`.
    pub fn parse(input: &str) -> ScheduleResult<Self> {
        let invalid = || ScheduleError::Validation(format!("Invalid month: {input}"));
        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            m => Self {
                year: self.year,
                month: m - 1,
            },
        }
    }

    pub fn next(&self) -> Self {
        match self.month {
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            m => Self {
                year: self.year,
                month: m + 1,
            },
        }
    }

    /// Heading such as `"October 2026"`.
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    pub fn grid(&self) -> ScheduleResult<Vec<Option<NaiveDate>>> {
        month_grid(self.year, self.month)
    }
}
