//! # Weekly recurrence editor
//!
//! A rolling seven-day window starting today. Each day can be switched on and given
//! hour-aligned slots; the enabled days are what gets saved, together with how far the pattern
//! should repeat.

use availsync_core::{
    calendar::next_days,
    clock::Clock,
    errors::{ScheduleError, ScheduleResult},
    models::{
        payload::{WeeklyDayPayload, WeeklySchedulePayload, WeeklySlotPayload},
        schedule::{DaySchedule, RecurrenceType},
        time_slot::{SlotField, TimeSlot},
    },
    time::{hourly_end_options, hourly_options, local_midnight_utc, local_today, ClockTime},
};
use chrono::Datelike;
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Days shown by the editor, today included.
pub const WINDOW_DAYS: usize = 7;

/// Start hour of the first slot added to an empty day.
pub const DEFAULT_START_HOUR: u16 = 9;

/// Length of a newly added slot.
pub const SLOT_MINUTES: u16 = 60;

pub struct WeeklyEditor<C> {
    tz: Tz,
    clock: C,
    days: Vec<DaySchedule>,
    recurrence_type: RecurrenceType,
}

impl<C: Clock> WeeklyEditor<C> {
    /// Builds the window of [`WINDOW_DAYS`] disabled days starting with today's date in `tz`.
    pub fn new(tz: Tz, clock: C) -> ScheduleResult<Self> {
        let today = local_today(&tz, clock.now());
        let days = next_days(today, WINDOW_DAYS)
            .into_iter()
            .map(|date| -> ScheduleResult<DaySchedule> {
                Ok(DaySchedule {
                    weekday: date.weekday(),
                    date,
                    date_utc: local_midnight_utc(&tz, date)?,
                    is_enabled: false,
                    time_slots: Vec::new(),
                })
            })
            .collect::<ScheduleResult<Vec<_>>>()?;

        debug!(%today, timezone = tz.name(), "weekly window initialized");

        Ok(Self {
            tz,
            clock,
            days,
            recurrence_type: RecurrenceType::default(),
        })
    }

    pub fn with_recurrence_type(mut self, recurrence_type: RecurrenceType) -> Self {
        self.recurrence_type = recurrence_type;
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn day(&self, day: usize) -> ScheduleResult<&DaySchedule> {
        self.days
            .get(day)
            .ok_or_else(|| ScheduleError::NotFound(format!("Day {day} in weekly window")))
    }

    fn day_mut(&mut self, day: usize) -> ScheduleResult<&mut DaySchedule> {
        self.days
            .get_mut(day)
            .ok_or_else(|| ScheduleError::NotFound(format!("Day {day} in weekly window")))
    }

    fn slot_mut(&mut self, day: usize, slot: usize) -> ScheduleResult<(&Tz, &mut DaySchedule, usize)> {
        let schedule = self
            .days
            .get_mut(day)
            .ok_or_else(|| ScheduleError::NotFound(format!("Day {day} in weekly window")))?;
        if slot >= schedule.time_slots.len() {
            return Err(ScheduleError::NotFound(format!(
                "Time slot {slot} on {}",
                schedule.date
            )));
        }
        Ok((&self.tz, schedule, slot))
    }

    pub fn recurrence_type(&self) -> RecurrenceType {
        self.recurrence_type
    }

    pub fn set_recurrence_type(&mut self, recurrence_type: RecurrenceType) {
        debug!(%recurrence_type, "recurrence type changed");
        self.recurrence_type = recurrence_type;
    }

    /// Hour-aligned start options.
    pub fn time_options(&self) -> Vec<ClockTime> {
        hourly_options()
    }

    /// The slot that "add" would append to `day`.
    ///
    /// An empty day gets `09:00–10:00`; otherwise the new slot starts where the last one ends and
    /// lasts an hour, cut off at midnight.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::NotFound` - `day` is outside the window
    /// * `ScheduleError::DayFull` - the last slot already ends at `24:00`
    pub fn next_time_slot(&self, day: usize) -> ScheduleResult<TimeSlot> {
        let schedule = self.day(day)?;
        let start = match schedule.time_slots.last() {
            None => ClockTime::at_hour(DEFAULT_START_HOUR),
            Some(last) if last.end_time.is_end_of_day() => {
                return Err(ScheduleError::DayFull(schedule.date));
            }
            Some(last) => last.end_time,
        };

        TimeSlot::new(&self.tz, schedule.date, start, start.add_minutes(SLOT_MINUTES))
    }

    /// Appends the next slot to `day` and returns its id.
    pub fn add_time_slot(&mut self, day: usize) -> ScheduleResult<Uuid> {
        let slot = self
            .next_time_slot(day)
            .inspect_err(|e| warn!(day, error = %e, "cannot add time slot"))?;
        let id = slot.id;

        debug!(day, start = %slot.start_time, end = %slot.end_time, "time slot added");
        self.day_mut(day)?.time_slots.push(slot);
        Ok(id)
    }

    /// Removes a slot. The day stays enabled even when its last slot goes.
    pub fn remove_time_slot(&mut self, day: usize, slot: usize) -> ScheduleResult<TimeSlot> {
        let (_, schedule, slot) = self.slot_mut(day, slot)?;
        let removed = schedule.time_slots.remove(slot);

        debug!(day, slot, "time slot removed");
        Ok(removed)
    }

    /// Switches a day on or off and returns the new state.
    ///
    /// Disabling drops every slot of the day. Enabling a day without slots gives it the default
    /// first slot.
    pub fn toggle_day(&mut self, day: usize) -> ScheduleResult<bool> {
        let schedule = self.day(day)?;

        if schedule.is_enabled {
            let schedule = self.day_mut(day)?;
            schedule.time_slots.clear();
            schedule.is_enabled = false;
        } else {
            if schedule.time_slots.is_empty() {
                self.add_time_slot(day)?;
            }
            self.day_mut(day)?.is_enabled = true;
        }

        let enabled = self.day(day)?.is_enabled;
        debug!(day, enabled, "day toggled");
        Ok(enabled)
    }

    /// Flips a slot between display and editing mode, returning the new mode.
    pub fn toggle_edit(&mut self, day: usize, slot: usize) -> ScheduleResult<bool> {
        let (_, schedule, slot) = self.slot_mut(day, slot)?;
        let target = &mut schedule.time_slots[slot];
        target.is_editing = !target.is_editing;
        Ok(target.is_editing)
    }

    /// Changes one end of a slot.
    ///
    /// A new start must be a whole hour; when the current end is not after it, the end moves to
    /// one hour past the new start. A new end must be a whole hour strictly after the start.
    /// Rejected updates leave the slot untouched.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::NotFound` - unknown day or slot
    /// * `ScheduleError::InvalidTime` - the value is not an offered hour
    /// * `ScheduleError::InvalidRange` - the end would not be after the start
    pub fn update_time(
        &mut self,
        day: usize,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    ) -> ScheduleResult<()> {
        self.apply_update(day, slot, field, value)
            .inspect_err(|e| warn!(day, slot, ?field, %value, error = %e, "time update rejected"))
    }

    fn apply_update(
        &mut self,
        day: usize,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    ) -> ScheduleResult<()> {
        if value.minute() != 0 {
            return Err(ScheduleError::InvalidTime(value.to_string()));
        }

        let (tz, schedule, slot) = self.slot_mut(day, slot)?;
        let date = schedule.date;
        let target = &mut schedule.time_slots[slot];

        let (start, end) = match field {
            SlotField::StartTime => {
                if value.is_end_of_day() {
                    return Err(ScheduleError::InvalidTime(value.to_string()));
                }
                let end = if target.end_time <= value {
                    value.add_minutes(SLOT_MINUTES)
                } else {
                    target.end_time
                };
                (value, end)
            }
            SlotField::EndTime => (target.start_time, value),
        };

        target.set_times(tz, date, start, end)?;
        debug!(day, slot, %start, %end, "time slot updated");
        Ok(())
    }

    /// End options offered for a slot: whole hours after its start, through `24:00`.
    pub fn available_end_times(&self, day: usize, slot: usize) -> ScheduleResult<Vec<ClockTime>> {
        let schedule = self.day(day)?;
        let target = schedule.time_slots.get(slot).ok_or_else(|| {
            ScheduleError::NotFound(format!("Time slot {slot} on {}", schedule.date))
        })?;
        Ok(hourly_end_options(target.start_time))
    }

    /// Payload of the enabled days, UTC only.
    pub fn schedule_data(&self) -> WeeklySchedulePayload {
        let schedule = self
            .days
            .iter()
            .filter(|day| day.is_enabled)
            .map(|day| WeeklyDayPayload {
                day: day.day_name().to_string(),
                date: day.date_utc,
                time_slots: day
                    .time_slots
                    .iter()
                    .map(|slot| WeeklySlotPayload {
                        start_time: slot.start_time_utc,
                        end_time: slot.end_time_utc,
                    })
                    .collect(),
            })
            .collect();

        WeeklySchedulePayload {
            schedule,
            recurrence_type: self.recurrence_type,
        }
    }

    /// Builds the payload and logs it.
    pub fn save(&self) -> WeeklySchedulePayload {
        let payload = self.schedule_data();
        info!(
            days = payload.schedule.len(),
            slots = payload.schedule.iter().map(|d| d.time_slots.len()).sum::<usize>(),
            recurrence_type = %payload.recurrence_type,
            "weekly availability saved"
        );
        payload
    }
}
