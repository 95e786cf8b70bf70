//! # Editor Configuration Module
//!
//! Loads the settings shared by both editors from environment variables, falling back to
//! defaults where a variable is not set.
//!
//! ## Environment Variables
//!
//! - `AVAILSYNC_TIMEZONE`: IANA timezone the user enters times in (default: "UTC")
//! - `LOG_LEVEL`: Logging level: `trace`, `debug`, `info`, `warn` or `error` (default: "info")
//! - `AVAILSYNC_RECURRENCE_WEEKS`: Extra weeks generated for a recurring date, at most 104
//!   (default: 4)
//! - `AVAILSYNC_RECURRENCE_TYPE`: Repeat horizon of the weekly editor: `week`, `month` or
//!   `twoMonths` (default: "week")

use std::env;

use availsync_core::{
    models::schedule::RecurrenceType, recurrence::{DEFAULT_RECURRENCE_WEEKS, MAX_RECURRENCE_WEEKS}, time::parse_timezone,
};
use chrono_tz::Tz;
use eyre::{bail, Result, WrapErr};
use tracing::Level;

/// Settings for the availability editors.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Zone local wall-clock times are interpreted in
    pub timezone: Tz,

    /// Log level for the application
    pub log_level: Level,

    /// Weeks generated after a date made recurring
    pub recurrence_weeks: usize,

    /// Recurrence attached to the weekly payload
    pub recurrence_type: RecurrenceType,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            log_level: Level::INFO,
            recurrence_weeks: DEFAULT_RECURRENCE_WEEKS,
            recurrence_type: RecurrenceType::Week,
        }
    }
}

impl EditorConfig {
    /// Creates a new EditorConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `AVAILSYNC_TIMEZONE` is not a known IANA timezone
    /// - `LOG_LEVEL` is not a known level
    /// - `AVAILSYNC_RECURRENCE_WEEKS` is not an integer between 0 and 104
    /// - `AVAILSYNC_RECURRENCE_TYPE` is not a known recurrence type
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EditorConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timezone = match lookup("AVAILSYNC_TIMEZONE") {
            Some(name) => parse_timezone(&name).wrap_err("Invalid AVAILSYNC_TIMEZONE value")?,
            None => defaults.timezone,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .trim()
                .parse::<Level>()
                .wrap_err("Invalid LOG_LEVEL value")?,
            None => defaults.log_level,
        };

        let recurrence_weeks = match lookup("AVAILSYNC_RECURRENCE_WEEKS") {
            Some(weeks) => weeks
                .trim()
                .parse::<usize>()
                .wrap_err("Invalid AVAILSYNC_RECURRENCE_WEEKS value")?,
            None => defaults.recurrence_weeks,
        };
        if recurrence_weeks > MAX_RECURRENCE_WEEKS {
            bail!(
                "Invalid AVAILSYNC_RECURRENCE_WEEKS value: {recurrence_weeks} is above {MAX_RECURRENCE_WEEKS}"
            );
        }

        let recurrence_type = match lookup("AVAILSYNC_RECURRENCE_TYPE") {
            Some(kind) => kind
                .parse::<RecurrenceType>()
                .wrap_err("Invalid AVAILSYNC_RECURRENCE_TYPE value")?,
            None => defaults.recurrence_type,
        };

        Ok(Self {
            timezone,
            log_level,
            recurrence_weeks,
            recurrence_type,
        })
    }
}
