//! # Specific-date editor
//!
//! A month calendar on which individual dates are selected and given quarter-hour slots. The
//! editor knows what "now" is: dates before today cannot be selected and times already behind
//! the clock are neither offered nor accepted. A selected date can be expanded into the same
//! slot pattern on the following weeks.

use availsync_core::{
    calendar::MonthCursor,
    clock::Clock,
    errors::{ScheduleError, ScheduleResult},
    models::{
        payload::{DateSchedulePayload, DateSelectionPayload, DateSlotPayload},
        schedule::DateSchedule,
        time_slot::{SlotField, TimeSlot},
    },
    recurrence::{weekly_recurrences, DEFAULT_RECURRENCE_WEEKS, MAX_RECURRENCE_WEEKS},
    time::{
        is_past, local_midnight_utc, local_today, next_quarter_hour, quarter_hour_options,
        ClockTime, QUARTER_HOUR,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Start hour of the first slot on a date other than today.
pub const DEFAULT_START_HOUR: u16 = 9;

/// Length of a newly created slot.
pub const SLOT_MINUTES: u16 = 60;

pub struct DateEditor<C> {
    tz: Tz,
    clock: C,
    cursor: MonthCursor,
    schedules: Vec<DateSchedule>,
    recurrence_weeks: usize,
}

impl<C: Clock> DateEditor<C> {
    /// Opens the calendar on the current month in `tz` with nothing selected.
    pub fn new(tz: Tz, clock: C) -> Self {
        let cursor = MonthCursor::containing(local_today(&tz, clock.now()));
        Self {
            tz,
            clock,
            cursor,
            schedules: Vec::new(),
            recurrence_weeks: DEFAULT_RECURRENCE_WEEKS,
        }
    }

    /// Number of extra weeks generated by [`DateEditor::toggle_recurring`], capped at
    /// [`MAX_RECURRENCE_WEEKS`].
    pub fn with_recurrence_weeks(mut self, weeks: usize) -> Self {
        if weeks > MAX_RECURRENCE_WEEKS {
            warn!(weeks, max = MAX_RECURRENCE_WEEKS, "recurrence weeks capped");
        }
        self.recurrence_weeks = weeks.min(MAX_RECURRENCE_WEEKS);
        self
    }

    /// IANA name of the zone every time is shown in.
    pub fn timezone(&self) -> &'static str {
        self.tz.name()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        local_today(&self.tz, self.clock.now())
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn previous_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.previous();
        self.cursor
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.next();
        self.cursor
    }

    /// Cells of the displayed month, `None` for the leading blanks.
    pub fn calendar_days(&self) -> ScheduleResult<Vec<Option<NaiveDate>>> {
        self.cursor.grid()
    }

    pub fn schedules(&self) -> &[DateSchedule] {
        &self.schedules
    }

    pub fn entry(&self, index: usize) -> ScheduleResult<&DateSchedule> {
        self.schedules
            .get(index)
            .ok_or_else(|| ScheduleError::NotFound(format!("Selected date {index}")))
    }

    fn entry_mut(&mut self, index: usize) -> ScheduleResult<&mut DateSchedule> {
        self.schedules
            .get_mut(index)
            .ok_or_else(|| ScheduleError::NotFound(format!("Selected date {index}")))
    }

    /// Index of the entry for `date`, if it is selected.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.schedules.iter().position(|s| s.date == date)
    }

    pub fn is_date_selected(&self, date: NaiveDate) -> bool {
        self.position(date).is_some()
    }

    /// Dates strictly before today cannot be selected.
    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        date < self.today()
    }

    /// Quarter-hour start options for `date`; on today only those not yet passed.
    pub fn time_options(&self, date: NaiveDate) -> Vec<ClockTime> {
        quarter_hour_options(&self.tz, date, self.clock.now())
    }

    /// A one-hour slot on `date` starting at `start`.
    ///
    /// On today a start that has already passed is moved up to the next quarter hour.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::NoTimeRemaining` - today has no quarter hour left to start at
    pub fn create_time_slot(&self, date: NaiveDate, start: ClockTime) -> ScheduleResult<TimeSlot> {
        let now = self.clock.now();
        let start = if is_past(&self.tz, date, start, now) && date == self.today() {
            next_quarter_hour(&self.tz, now)
        } else {
            start
        };
        if start.is_end_of_day() {
            return Err(ScheduleError::NoTimeRemaining(date));
        }

        TimeSlot::new(&self.tz, date, start, start.add_minutes(SLOT_MINUTES))
    }

    fn default_start(&self, date: NaiveDate) -> ScheduleResult<ClockTime> {
        if date == self.today() {
            self.time_options(date)
                .first()
                .copied()
                .ok_or(ScheduleError::NoTimeRemaining(date))
        } else {
            Ok(ClockTime::at_hour(DEFAULT_START_HOUR))
        }
    }

    /// Selects or deselects a date and returns whether it is now selected.
    ///
    /// A new selection starts with one slot at the default start. Deselecting a date that was
    /// made recurring also drops the weeks generated from it.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::DateInPast` - the date is before today
    /// * `ScheduleError::NoTimeRemaining` - selecting today after the last quarter hour
    pub fn toggle_date_selection(&mut self, date: NaiveDate) -> ScheduleResult<bool> {
        if self.is_date_disabled(date) {
            warn!(%date, "cannot select a past date");
            return Err(ScheduleError::DateInPast(date));
        }

        if let Some(index) = self.position(date) {
            self.deselect(index);
            return Ok(false);
        }

        let start = self.default_start(date)?;
        let slot = self.create_time_slot(date, start)?;
        self.schedules.push(DateSchedule::new(date, vec![slot]));

        debug!(%date, %start, "date selected");
        Ok(true)
    }

    fn deselect(&mut self, index: usize) -> DateSchedule {
        let removed = self.schedules.remove(index);
        self.schedules
            .retain(|schedule| schedule.recurrence_of != Some(removed.id));

        debug!(date = %removed.date, "date deselected");
        removed
    }

    /// Appends a slot starting where the last one ends and returns its id.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::DayFull` - the last slot already ends at `24:00`
    pub fn add_time_slot(&mut self, index: usize) -> ScheduleResult<Uuid> {
        let entry = self.entry(index)?;
        let date = entry.date;
        let start = match entry.time_slots.last() {
            Some(last) if last.end_time.is_end_of_day() => {
                warn!(%date, "no room for another slot");
                return Err(ScheduleError::DayFull(date));
            }
            Some(last) => last.end_time,
            None => self.default_start(date)?,
        };

        let slot = self.create_time_slot(date, start)?;
        let id = slot.id;
        debug!(%date, start = %slot.start_time, end = %slot.end_time, "time slot added");

        self.entry_mut(index)?.time_slots.push(slot);
        Ok(id)
    }

    /// Removes a slot; removing the last slot of a date deselects the date.
    pub fn remove_time_slot(&mut self, index: usize, slot: usize) -> ScheduleResult<TimeSlot> {
        let entry = self.entry_mut(index)?;
        if slot >= entry.time_slots.len() {
            return Err(ScheduleError::NotFound(format!(
                "Time slot {slot} on {}",
                entry.date
            )));
        }

        let removed = entry.time_slots.remove(slot);
        debug!(date = %entry.date, slot, "time slot removed");

        if entry.time_slots.is_empty() {
            self.deselect(index);
        }
        Ok(removed)
    }

    /// Flips a slot between display and editing mode, returning the new mode.
    pub fn toggle_edit(&mut self, index: usize, slot: usize) -> ScheduleResult<bool> {
        let entry = self.entry_mut(index)?;
        let date = entry.date;
        let target = entry
            .time_slots
            .get_mut(slot)
            .ok_or_else(|| ScheduleError::NotFound(format!("Time slot {slot} on {date}")))?;

        target.is_editing = !target.is_editing;
        Ok(target.is_editing)
    }

    /// Changes one end of a slot.
    ///
    /// Values must sit on the quarter-hour grid and, on today, must not be behind the clock. A
    /// start at or after the current end pushes the end to fifteen minutes past the new start. An
    /// end must be strictly after the start. Rejected updates leave the slot untouched.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::NotFound` - unknown entry or slot
    /// * `ScheduleError::InvalidTime` - the value is off the quarter-hour grid
    /// * `ScheduleError::TimeInPast` - the value is already behind the clock today
    /// * `ScheduleError::InvalidRange` - the end would not be after the start
    pub fn update_time(
        &mut self,
        index: usize,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    ) -> ScheduleResult<()> {
        self.apply_update(index, slot, field, value)
            .inspect_err(|e| warn!(index, slot, ?field, %value, error = %e, "time update rejected"))
    }

    fn apply_update(
        &mut self,
        index: usize,
        slot: usize,
        field: SlotField,
        value: ClockTime,
    ) -> ScheduleResult<()> {
        if value.total_minutes() % QUARTER_HOUR != 0 {
            return Err(ScheduleError::InvalidTime(value.to_string()));
        }

        let now = self.clock.now();
        let today = self.today();
        let tz = self.tz;
        let entry = self.entry_mut(index)?;
        let date = entry.date;

        if date == today && is_past(&tz, date, value, now) {
            return Err(ScheduleError::TimeInPast { date, time: value });
        }

        let target = entry
            .time_slots
            .get_mut(slot)
            .ok_or_else(|| ScheduleError::NotFound(format!("Time slot {slot} on {date}")))?;

        let (start, end) = match field {
            SlotField::StartTime => {
                if value.is_end_of_day() {
                    return Err(ScheduleError::InvalidTime(value.to_string()));
                }
                let end = if value >= target.end_time {
                    value.add_minutes(QUARTER_HOUR)
                } else {
                    target.end_time
                };
                (value, end)
            }
            SlotField::EndTime => (target.start_time, value),
        };

        target.set_times(&tz, date, start, end)?;
        debug!(%date, slot, %start, %end, "time slot updated");
        Ok(())
    }

    /// Turns weekly recurrence of an entry on or off and returns the new state.
    ///
    /// Turning it on copies the entry's slots onto the following weeks, skipping weeks that are
    /// already selected or on which the slots cannot be placed (a clock change swallowing them).
    /// Turning it off removes every entry generated from this one.
    pub fn toggle_recurring(&mut self, index: usize) -> ScheduleResult<bool> {
        let entry = self.entry(index)?;
        let origin = entry.id;

        if entry.is_recurring {
            self.schedules
                .retain(|schedule| schedule.recurrence_of != Some(origin));
            if let Some(entry) = self.schedules.iter_mut().find(|s| s.id == origin) {
                entry.is_recurring = false;
                entry.recurrence_of = None;
            }
            debug!(%origin, "recurrence removed");
            return Ok(false);
        }

        let generated = weekly_recurrences(entry.date, self.recurrence_weeks)
            .into_iter()
            .filter(|date| {
                let taken = self.is_date_selected(*date);
                if taken {
                    debug!(%date, "week already selected; not overwritten");
                }
                !taken
            })
            .filter_map(|date| {
                let time_slots = entry
                    .time_slots
                    .iter()
                    .map(|slot| slot.copy_to(&self.tz, date))
                    .collect::<ScheduleResult<Vec<_>>>()
                    .inspect_err(|e| warn!(%date, error = %e, "week skipped; slots cannot be placed"))
                    .ok()?;
                Some(DateSchedule {
                    id: Uuid::new_v4(),
                    date,
                    time_slots,
                    is_recurring: true,
                    recurrence_of: Some(origin),
                })
            })
            .collect::<Vec<_>>();

        debug!(%origin, weeks = generated.len(), "recurrence generated");
        self.schedules.extend(generated);
        self.entry_mut(index)?.is_recurring = true;
        Ok(true)
    }

    /// The selection with every date and slot as a UTC instant.
    pub fn convert_to_utc(&self) -> ScheduleResult<DateSelectionPayload> {
        let schedules = self
            .schedules
            .iter()
            .map(|schedule| -> ScheduleResult<DateSchedulePayload> {
                Ok(DateSchedulePayload {
                    date: local_midnight_utc(&self.tz, schedule.date)?,
                    time_slots: schedule
                        .time_slots
                        .iter()
                        .map(|slot| DateSlotPayload {
                            start_time: slot.start_time_utc,
                            end_time: slot.end_time_utc,
                            id: slot.id,
                        })
                        .collect(),
                    is_recurring: schedule.is_recurring,
                })
            })
            .collect::<ScheduleResult<Vec<_>>>()?;

        Ok(DateSelectionPayload {
            timezone: self.timezone().to_string(),
            schedules,
        })
    }

    /// Logs the local and UTC schedules and returns the UTC payload.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::NothingSelected` - no date is selected
    pub fn save(&self) -> ScheduleResult<DateSelectionPayload> {
        if self.schedules.is_empty() {
            return Err(ScheduleError::NothingSelected);
        }

        let payload = self.convert_to_utc()?;
        debug!(local = ?self.schedules, "local schedule");
        debug!(utc = ?payload.schedules, "UTC schedule");
        info!(
            timezone = %payload.timezone,
            dates = payload.schedules.len(),
            "date availability saved"
        );
        Ok(payload)
    }
}
