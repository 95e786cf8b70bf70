use availsync_core::clock::{Clock, FixedClock};
use availsync_core::errors::ScheduleError;
use availsync_core::models::{schedule::RecurrenceType, time_slot::SlotField};
use availsync_core::time::ClockTime;
use availsync_editor::WeeklyEditor;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use mockall::mock;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

mock! {
    pub WallClock {}

    impl Clock for WallClock {
        fn now(&self) -> DateTime<Utc>;
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(s: &str) -> ClockTime {
    ClockTime::parse(s).unwrap()
}

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Saturday 2026-10-17, 10:00 UTC
#[fixture]
fn editor() -> WeeklyEditor<FixedClock> {
    WeeklyEditor::new(Tz::UTC, FixedClock(utc("2026-10-17T10:00:00Z"))).unwrap()
}

#[rstest]
fn test_window_starts_today(editor: WeeklyEditor<FixedClock>) {
    let days = editor.days();

    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, date(2026, 10, 17));
    assert_eq!(days[0].weekday, Weekday::Sat);
    assert_eq!(days[0].day_name(), "Saturday");
    assert_eq!(days[1].day_name(), "Sunday");
    assert_eq!(days[6].date, date(2026, 10, 23));
    assert_eq!(days[6].day_name(), "Friday");
    assert_eq!(days[0].date_utc, utc("2026-10-17T00:00:00Z"));
    assert!(days.iter().all(|d| !d.is_enabled && d.time_slots.is_empty()));
    assert_eq!(editor.recurrence_type(), RecurrenceType::Week);
}

#[test]
fn test_window_follows_local_date() {
    let mut clock = MockWallClock::new();
    clock
        .expect_now()
        .return_const(utc("2026-10-17T13:00:00Z"));
    let auckland: Tz = "Pacific/Auckland".parse().unwrap();

    let editor = WeeklyEditor::new(auckland, clock).unwrap();
    let first = &editor.days()[0];

    assert_eq!(first.date, date(2026, 10, 18));
    assert_eq!(first.day_name(), "Sunday");
    assert_eq!(first.date_utc, utc("2026-10-17T11:00:00Z"));
}

#[rstest]
fn test_toggle_day_adds_default_slot(mut editor: WeeklyEditor<FixedClock>) {
    assert!(editor.toggle_day(2).unwrap());

    let day = editor.day(2).unwrap();
    assert!(day.is_enabled);
    assert_eq!(day.time_slots.len(), 1);
    assert_eq!(day.time_slots[0].start_time, at("09:00"));
    assert_eq!(day.time_slots[0].end_time, at("10:00"));
    assert_eq!(day.time_slots[0].start_time_utc, utc("2026-10-19T09:00:00Z"));
}

#[rstest]
fn test_toggle_day_off_clears_slots(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    editor.add_time_slot(0).unwrap();

    assert!(!editor.toggle_day(0).unwrap());
    assert!(editor.day(0).unwrap().time_slots.is_empty());

    editor.toggle_day(0).unwrap();
    assert_eq!(editor.day(0).unwrap().time_slots.len(), 1);
}

#[rstest]
fn test_add_time_slot_continues_from_last(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    editor.add_time_slot(0).unwrap();
    let id = editor.add_time_slot(0).unwrap();

    let slots = &editor.day(0).unwrap().time_slots;
    let times: Vec<_> = slots
        .iter()
        .map(|s| (s.start_time.to_string(), s.end_time.to_string()))
        .collect();

    assert_eq!(
        times,
        vec![
            ("09:00".to_string(), "10:00".to_string()),
            ("10:00".to_string(), "11:00".to_string()),
            ("11:00".to_string(), "12:00".to_string()),
        ]
    );
    assert_eq!(slots[2].id, id);
}

#[rstest]
fn test_day_is_full_after_midnight_slot(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    editor
        .update_time(0, 0, SlotField::StartTime, at("23:00"))
        .unwrap();

    let slot = &editor.day(0).unwrap().time_slots[0];
    assert!(slot.end_time.is_end_of_day());
    assert_eq!(slot.end_time_utc, utc("2026-10-18T00:00:00Z"));

    assert_eq!(
        editor.add_time_slot(0),
        Err(ScheduleError::DayFull(date(2026, 10, 17)))
    );
    assert_eq!(editor.day(0).unwrap().time_slots.len(), 1);
}

#[rstest]
fn test_update_start_pushes_end(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(1).unwrap();
    editor
        .update_time(1, 0, SlotField::StartTime, at("12:00"))
        .unwrap();

    let slot = &editor.day(1).unwrap().time_slots[0];
    assert_eq!(slot.start_time, at("12:00"));
    assert_eq!(slot.end_time, at("13:00"));
    assert_eq!(slot.start_time_utc, utc("2026-10-18T12:00:00Z"));
    assert_eq!(slot.end_time_utc, utc("2026-10-18T13:00:00Z"));
}

#[rstest]
fn test_update_start_keeps_later_end(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(1).unwrap();
    editor
        .update_time(1, 0, SlotField::EndTime, at("15:00"))
        .unwrap();
    editor
        .update_time(1, 0, SlotField::StartTime, at("11:00"))
        .unwrap();

    let slot = &editor.day(1).unwrap().time_slots[0];
    assert_eq!(slot.start_time, at("11:00"));
    assert_eq!(slot.end_time, at("15:00"));
}

#[rstest]
#[case(SlotField::EndTime, "09:00")]
#[case(SlotField::EndTime, "08:00")]
fn test_update_end_not_after_start_is_rejected(
    mut editor: WeeklyEditor<FixedClock>,
    #[case] field: SlotField,
    #[case] value: &str,
) {
    editor.toggle_day(0).unwrap();
    let before = editor.day(0).unwrap().time_slots[0].clone();

    assert_eq!(
        editor.update_time(0, 0, field, at(value)),
        Err(ScheduleError::InvalidRange {
            start: at("09:00"),
            end: at(value),
        })
    );
    assert_eq!(editor.day(0).unwrap().time_slots[0], before);
}

#[test]
fn test_update_across_dst_gap_keeps_utc_order() {
    // New York springs forward on Sunday 2027-03-14, day 4 of this window
    let new_york: Tz = "America/New_York".parse().unwrap();
    let mut editor =
        WeeklyEditor::new(new_york, FixedClock(utc("2027-03-10T15:00:00Z"))).unwrap();
    editor.toggle_day(4).unwrap();
    editor
        .update_time(4, 0, SlotField::StartTime, at("02:00"))
        .unwrap();
    let before = editor.day(4).unwrap().time_slots[0].clone();

    assert_eq!(
        editor.update_time(4, 0, SlotField::EndTime, at("03:00")),
        Err(ScheduleError::InvalidRange {
            start: at("02:00"),
            end: at("03:00"),
        })
    );
    assert_eq!(editor.day(4).unwrap().time_slots[0], before);

    editor
        .update_time(4, 0, SlotField::EndTime, at("04:00"))
        .unwrap();
    let slot = &editor.day(4).unwrap().time_slots[0];
    assert_eq!(slot.start_time_utc, utc("2027-03-14T07:00:00Z"));
    assert_eq!(slot.end_time_utc, utc("2027-03-14T08:00:00Z"));
}

#[rstest]
#[case(SlotField::StartTime, "10:30")]
#[case(SlotField::EndTime, "10:15")]
#[case(SlotField::StartTime, "24:00")]
fn test_update_off_the_hour_grid_is_rejected(
    mut editor: WeeklyEditor<FixedClock>,
    #[case] field: SlotField,
    #[case] value: &str,
) {
    editor.toggle_day(0).unwrap();

    assert_eq!(
        editor.update_time(0, 0, field, at(value)),
        Err(ScheduleError::InvalidTime(value.to_string()))
    );
}

#[rstest]
fn test_available_end_times(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    editor
        .update_time(0, 0, SlotField::StartTime, at("21:00"))
        .unwrap();

    assert_eq!(
        editor.available_end_times(0, 0).unwrap(),
        vec![at("22:00"), at("23:00"), at("24:00")]
    );
    assert_eq!(editor.time_options().len(), 24);
}

#[rstest]
fn test_remove_time_slot_keeps_day_enabled(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    let removed = editor.remove_time_slot(0, 0).unwrap();

    assert_eq!(removed.start_time, at("09:00"));
    let day = editor.day(0).unwrap();
    assert!(day.is_enabled);
    assert!(day.time_slots.is_empty());
}

#[rstest]
fn test_toggle_edit(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();

    assert!(editor.toggle_edit(0, 0).unwrap());
    assert!(editor.day(0).unwrap().time_slots[0].is_editing);
    assert!(!editor.toggle_edit(0, 0).unwrap());
}

#[rstest]
fn test_unknown_indices_are_not_found(mut editor: WeeklyEditor<FixedClock>) {
    assert!(matches!(editor.toggle_day(7), Err(ScheduleError::NotFound(_))));
    assert!(matches!(
        editor.remove_time_slot(0, 0),
        Err(ScheduleError::NotFound(_))
    ));
    assert!(matches!(
        editor.update_time(3, 2, SlotField::StartTime, at("10:00")),
        Err(ScheduleError::NotFound(_))
    ));
    assert!(matches!(
        editor.available_end_times(0, 0),
        Err(ScheduleError::NotFound(_))
    ));
}

#[rstest]
fn test_schedule_data_contains_enabled_days_only(mut editor: WeeklyEditor<FixedClock>) {
    editor.toggle_day(0).unwrap();
    editor.toggle_day(2).unwrap();
    editor.add_time_slot(2).unwrap();
    editor.toggle_day(4).unwrap();
    editor.toggle_day(4).unwrap();
    editor.set_recurrence_type(RecurrenceType::Month);

    let payload = editor.save();

    assert_eq!(payload.recurrence_type, RecurrenceType::Month);
    assert_eq!(payload.schedule.len(), 2);
    assert_eq!(payload.schedule[0].day, "Saturday");
    assert_eq!(payload.schedule[1].day, "Monday");
    assert_eq!(payload.schedule[1].date, utc("2026-10-19T00:00:00Z"));
    assert_eq!(payload.schedule[1].time_slots.len(), 2);

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["recurrenceType"], "month");
    assert_eq!(
        value["schedule"][0]["timeSlots"][0]["startTime"],
        "2026-10-17T09:00:00Z"
    );
    assert_eq!(
        value["schedule"][0]["timeSlots"][0]["endTime"],
        "2026-10-17T10:00:00Z"
    );
}

#[test]
fn test_schedule_data_in_other_timezone() {
    let new_york: Tz = "America/New_York".parse().unwrap();
    let mut editor = WeeklyEditor::new(new_york, FixedClock(utc("2026-10-17T14:00:00Z")))
        .unwrap()
        .with_recurrence_type(RecurrenceType::TwoMonths);
    editor.toggle_day(0).unwrap();

    let payload = editor.schedule_data();

    assert_eq!(payload.schedule[0].date, utc("2026-10-17T04:00:00Z"));
    assert_eq!(
        payload.schedule[0].time_slots[0].start_time,
        utc("2026-10-17T13:00:00Z")
    );
    assert_eq!(payload.recurrence_type, RecurrenceType::TwoMonths);
}
