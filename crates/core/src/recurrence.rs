use chrono::{Duration, NaiveDate};

/// Extra occurrences generated when a date is made recurring (five weeks in total).
pub const DEFAULT_RECURRENCE_WEEKS: usize = 4;

/// Upper bound on generated occurrences (two years of weeks).
pub const MAX_RECURRENCE_WEEKS: usize = 104;

/// `count` dates spaced one week apart, starting one week after `base`.
///
/// Dates that would overflow the supported calendar range are dropped.
pub fn weekly_recurrences(base: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (1..=count as i64)
        .map_while(|week| base.checked_add_signed(Duration::weeks(week)))
        .collect()
}
