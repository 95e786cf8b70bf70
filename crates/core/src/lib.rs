//! # availsync core
//!
//! Domain types and pure date/time functions shared by the availability editors:
//!
//! - **time**: `"HH:MM"` clock times, option lists and local-to-UTC conversion
//! - **recurrence**: weekly-spaced date expansion
//! - **calendar**: month grids, month navigation and the rolling day window
//! - **clock**: the source of "now"
//! - **models**: slots, day/date schedules and the payloads emitted on save

pub mod calendar;
pub mod clock;
pub mod errors;
pub mod models;
pub mod recurrence;
pub mod time;
