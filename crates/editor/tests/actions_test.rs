use availsync_core::clock::FixedClock;
use availsync_core::errors::ScheduleError;
use availsync_core::models::schedule::RecurrenceType;
use availsync_editor::actions::{run_dates, run_weekly};
use availsync_editor::{DateAction, DateEditor, WeeklyAction, WeeklyEditor};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;

fn now() -> FixedClock {
    let instant: DateTime<Utc> = "2026-10-17T10:07:30Z".parse().unwrap();
    FixedClock(instant)
}

#[test_log::test]
fn test_weekly_script() {
    let actions: Vec<WeeklyAction> = serde_json::from_str(
        r#"[
            { "action": "toggleDay", "day": 1 },
            { "action": "addTimeSlot", "day": 1 },
            { "action": "updateTime", "day": 1, "slot": 1, "field": "endTime", "value": "09:00" },
            { "action": "updateTime", "day": 1, "slot": 1, "field": "endTime", "value": "13:00" },
            { "action": "toggleEdit", "day": 1, "slot": 0 },
            { "action": "setRecurrenceType", "recurrenceType": "month" }
        ]"#,
    )
    .unwrap();
    let mut editor = WeeklyEditor::new(Tz::UTC, now()).unwrap();

    let rejected = run_weekly(&mut editor, &actions);

    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].index, 2);
    assert!(matches!(rejected[0].error, ScheduleError::InvalidRange { .. }));

    let day = editor.day(1).unwrap();
    assert_eq!(day.time_slots[1].end_time.to_string(), "13:00");
    assert!(day.time_slots[0].is_editing);
    assert_eq!(editor.recurrence_type(), RecurrenceType::Month);
}

#[test_log::test]
fn test_date_script() {
    let actions: Vec<DateAction> = serde_json::from_str(
        r#"[
            { "action": "toggleDate", "date": "2026-10-16" },
            { "action": "toggleDate", "date": "2026-10-20" },
            { "action": "addTimeSlot", "date": "2026-10-20" },
            { "action": "removeTimeSlot", "date": "2026-10-20", "slot": 0 },
            { "action": "toggleRecurring", "date": "2026-10-20" },
            { "action": "addTimeSlot", "date": "2026-12-01" },
            { "action": "nextMonth" }
        ]"#,
    )
    .unwrap();
    let mut editor = DateEditor::new(Tz::UTC, now());

    let rejected = run_dates(&mut editor, &actions);

    let indices: Vec<_> = rejected.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 5]);
    assert_eq!(
        rejected[0].error,
        ScheduleError::DateInPast(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    );

    assert_eq!(editor.schedules().len(), 5);
    assert_eq!(editor.schedules()[0].time_slots[0].start_time.to_string(), "10:00");
    assert_eq!(editor.cursor().title(), "November 2026");
}

#[test]
fn test_actions_round_trip_through_json() {
    let action = DateAction::UpdateTime {
        date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
        slot: 0,
        field: availsync_core::models::time_slot::SlotField::StartTime,
        value: "10:30".parse().unwrap(),
    };

    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(value["action"], "updateTime");
    assert_eq!(value["field"], "startTime");
    assert_eq!(value["value"], "10:30");

    let parsed: DateAction = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, action);
}

#[test]
fn test_unknown_action_is_a_parse_error() {
    let parsed = serde_json::from_str::<Vec<WeeklyAction>>(r#"[{ "action": "explode" }]"#);
    assert!(parsed.is_err());
}
