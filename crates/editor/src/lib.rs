//! # availsync editors
//!
//! The two availability editors and what drives them:
//!
//! - **weekly**: seven-day window of hour-aligned slots, saved with a recurrence type
//! - **dates**: month calendar of specific dates with quarter-hour slots and weekly expansion
//! - **actions**: serializable interactions replayed against either editor
//! - **config**: environment-driven settings

/// Serializable editor interactions
pub mod actions;
/// Environment configuration
pub mod config;
/// Specific-date calendar editor
pub mod dates;
/// Weekly recurrence editor
pub mod weekly;

pub use actions::{DateAction, Rejection, WeeklyAction};
pub use config::EditorConfig;
pub use dates::DateEditor;
pub use weekly::WeeklyEditor;
