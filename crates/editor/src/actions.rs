//! # Editor Actions
//!
//! Serializable user interactions. A session is a list of actions replayed against an editor,
//! one per UI event; the binary reads them as JSON, e.g.
//!
//! ```json
//! [
//!   { "action": "toggleDate", "date": "2026-10-20" },
//!   { "action": "updateTime", "date": "2026-10-20", "slot": 0, "field": "endTime", "value": "11:30" },
//!   { "action": "toggleRecurring", "date": "2026-10-20" }
//! ]
//! ```
//!
//! Like the interactive editors, a session skips actions that are rejected and carries on; the
//! rejections are reported back so callers can decide whether they matter.

use availsync_core::{
    clock::Clock,
    errors::{ScheduleError, ScheduleResult},
    models::{schedule::RecurrenceType, time_slot::SlotField},
    time::ClockTime,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{dates::DateEditor, weekly::WeeklyEditor};

/// One interaction with the weekly editor. Days are positions in the seven-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WeeklyAction {
    ToggleDay {
        day: usize,
    },
    AddTimeSlot {
        day: usize,
    },
    RemoveTimeSlot {
        day: usize,
        slot: usize,
    },
    ToggleEdit {
        day: usize,
        slot: usize,
    },
    UpdateTime {
        day: usize,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    },
    SetRecurrenceType {
        #[serde(rename = "recurrenceType")]
        recurrence_type: RecurrenceType,
    },
}

impl WeeklyAction {
    pub fn apply<C: Clock>(&self, editor: &mut WeeklyEditor<C>) -> ScheduleResult<()> {
        match *self {
            Self::ToggleDay { day } => editor.toggle_day(day).map(drop),
            Self::AddTimeSlot { day } => editor.add_time_slot(day).map(drop),
            Self::RemoveTimeSlot { day, slot } => editor.remove_time_slot(day, slot).map(drop),
            Self::ToggleEdit { day, slot } => editor.toggle_edit(day, slot).map(drop),
            Self::UpdateTime {
                day,
                slot,
                field,
                value,
            } => editor.update_time(day, slot, field, value),
            Self::SetRecurrenceType { recurrence_type } => {
                editor.set_recurrence_type(recurrence_type);
                Ok(())
            }
        }
    }
}

/// One interaction with the date editor. Selected dates are addressed by the date itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum DateAction {
    ToggleDate {
        date: NaiveDate,
    },
    AddTimeSlot {
        date: NaiveDate,
    },
    RemoveTimeSlot {
        date: NaiveDate,
        slot: usize,
    },
    ToggleEdit {
        date: NaiveDate,
        slot: usize,
    },
    UpdateTime {
        date: NaiveDate,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    },
    ToggleRecurring {
        date: NaiveDate,
    },
    PreviousMonth,
    NextMonth,
}

impl DateAction {
    pub fn apply<C: Clock>(&self, editor: &mut DateEditor<C>) -> ScheduleResult<()> {
        match *self {
            Self::ToggleDate { date } => editor.toggle_date_selection(date).map(drop),
            Self::AddTimeSlot { date } => {
                let index = selected(editor, date)?;
                editor.add_time_slot(index).map(drop)
            }
            Self::RemoveTimeSlot { date, slot } => {
                let index = selected(editor, date)?;
                editor.remove_time_slot(index, slot).map(drop)
            }
            Self::ToggleEdit { date, slot } => {
                let index = selected(editor, date)?;
                editor.toggle_edit(index, slot).map(drop)
            }
            Self::UpdateTime {
                date,
                slot,
                field,
                value,
            } => {
                let index = selected(editor, date)?;
                editor.update_time(index, slot, field, value)
            }
            Self::ToggleRecurring { date } => {
                let index = selected(editor, date)?;
                editor.toggle_recurring(index).map(drop)
            }
            Self::PreviousMonth => {
                editor.previous_month();
                Ok(())
            }
            Self::NextMonth => {
                editor.next_month();
                Ok(())
            }
        }
    }
}

fn selected<C: Clock>(editor: &DateEditor<C>, date: NaiveDate) -> ScheduleResult<usize> {
    editor
        .position(date)
        .ok_or_else(|| ScheduleError::NotFound(format!("Selected date {date}")))
}

/// An action that the editor refused, with its position in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection<A> {
    pub index: usize,
    pub action: A,
    pub error: ScheduleError,
}

/// Replays `actions` against a weekly editor, skipping the ones it rejects.
pub fn run_weekly<C: Clock>(
    editor: &mut WeeklyEditor<C>,
    actions: &[WeeklyAction],
) -> Vec<Rejection<WeeklyAction>> {
    actions
        .iter()
        .enumerate()
        .filter_map(|(index, action)| {
            action.apply(editor).err().map(|error| {
                warn!(index, ?action, %error, "action skipped");
                Rejection {
                    index,
                    action: action.clone(),
                    error,
                }
            })
        })
        .collect()
}

/// Replays `actions` against a date editor, skipping the ones it rejects.
pub fn run_dates<C: Clock>(
    editor: &mut DateEditor<C>,
    actions: &[DateAction],
) -> Vec<Rejection<DateAction>> {
    actions
        .iter()
        .enumerate()
        .filter_map(|(index, action)| {
            action.apply(editor).err().map(|error| {
                warn!(index, ?action, %error, "action skipped");
                Rejection {
                    index,
                    action: action.clone(),
                    error,
                }
            })
        })
        .collect()
}
