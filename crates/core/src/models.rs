pub mod payload;
pub mod schedule;
pub mod time_slot;
