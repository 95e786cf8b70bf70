//! Payloads handed to the backend on save. Every instant is UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::schedule::RecurrenceType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySlotPayload {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDayPayload {
    pub day: String,
    pub date: DateTime<Utc>,
    pub time_slots: Vec<WeeklySlotPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedulePayload {
    pub schedule: Vec<WeeklyDayPayload>,
    pub recurrence_type: RecurrenceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSlotPayload {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSchedulePayload {
    pub date: DateTime<Utc>,
    pub time_slots: Vec<DateSlotPayload>,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSelectionPayload {
    /// IANA name of the zone the local times were entered in.
    pub timezone: String,
    pub schedules: Vec<DateSchedulePayload>,
}
