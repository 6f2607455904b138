use fitlog_core::{ActivityDraft, ActivityValidationError, Day, DayKey, Routine, Set, Weight};
use uuid::Uuid;

fn draft_with(exercise: &str) -> ActivityDraft {
    ActivityDraft {
        aerobic: false,
        routines: vec![Routine {
            exercise: exercise.to_string(),
            reps: 12,
            sets: vec![
                Set {
                    weight: Weight::Text("20".to_string()),
                },
                Set {
                    weight: Weight::Number(30.0),
                },
            ],
        }],
    }
}

#[test]
fn day_key_parses_calendar_date() {
    let key: DayKey = "2026-08-29".parse().unwrap();
    assert_eq!(key.to_string(), "2026-08-29");
}

#[test]
fn day_key_collapses_timestamps_on_same_utc_day() {
    let morning: DayKey = "2026-08-29T06:15:00Z".parse().unwrap();
    let evening: DayKey = "2026-08-29T23:59:59Z".parse().unwrap();
    let plain: DayKey = "2026-08-29".parse().unwrap();

    assert_eq!(morning, evening);
    assert_eq!(morning, plain);
}

#[test]
fn day_key_normalizes_offsets_to_utc() {
    // 23:30 at +05:00 is 18:30 UTC, still the 29th.
    let offset: DayKey = "2026-08-29T23:30:00+05:00".parse().unwrap();
    assert_eq!(offset.to_string(), "2026-08-29");

    // 01:00 at -03:00 is 04:00 UTC on the same day.
    let negative: DayKey = "2026-08-29T01:00:00-03:00".parse().unwrap();
    assert_eq!(negative, offset);
}

#[test]
fn day_key_rejects_garbage() {
    let err = "this is not a day".parse::<DayKey>().unwrap_err();
    assert!(err.to_string().contains("not a calendar date"));
}

#[test]
fn append_assigns_fresh_unique_ids_in_order() {
    let mut day = Day::new("2026-08-29".parse().unwrap());

    let first_id = day.append_activity(draft_with("bench press")).activity_id;
    let second_id = day.append_activity(draft_with("deadlift")).activity_id;

    assert_ne!(first_id, second_id);
    assert_eq!(day.activities.len(), 2);
    assert_eq!(day.activities[0].activity_id, first_id);
    assert_eq!(day.activities[1].activity_id, second_id);
    assert_eq!(day.activities[0].routines[0].exercise, "bench press");
}

#[test]
fn remove_closes_gap_and_keeps_other_identities() {
    let mut day = Day::new("2026-08-29".parse().unwrap());
    let first_id = day.append_activity(draft_with("squat")).activity_id;
    let second_id = day.append_activity(draft_with("row")).activity_id;
    let third_id = day.append_activity(draft_with("curl")).activity_id;

    let removed = day.remove_activity(second_id).unwrap();
    assert_eq!(removed.activity_id, second_id);

    assert_eq!(day.activities.len(), 2);
    assert_eq!(day.activities[0].activity_id, first_id);
    assert_eq!(day.activities[1].activity_id, third_id);
    assert!(day.remove_activity(second_id).is_none());
}

#[test]
fn removing_last_activity_keeps_the_day() {
    let mut day = Day::new("2026-08-29".parse().unwrap());
    let id = day.append_activity(draft_with("pull up")).activity_id;

    day.remove_activity(id).unwrap();
    assert!(day.activities.is_empty());
    assert_eq!(day.date.to_string(), "2026-08-29");
}

#[test]
fn draft_rejects_empty_exercise_label() {
    let mut draft = draft_with("press");
    draft.routines.push(Routine {
        exercise: "   ".to_string(),
        reps: 10,
        sets: vec![],
    });

    let err = draft.validate().unwrap_err();
    assert_eq!(
        err,
        ActivityValidationError::EmptyExerciseLabel { routine_index: 1 }
    );
}

#[test]
fn activity_serialization_uses_expected_wire_fields() {
    let mut day = Day::new("2026-08-29".parse().unwrap());
    let id = day.append_activity(draft_with("testtype")).activity_id;

    let json = serde_json::to_value(&day).unwrap();
    assert_eq!(json["date"], "2026-08-29");
    assert_eq!(json["activities"][0]["activityId"], id.to_string());
    assert_eq!(json["activities"][0]["aerobic"], false);
    assert_eq!(json["activities"][0]["routines"][0]["type"], "testtype");
    assert_eq!(json["activities"][0]["routines"][0]["reps"], 12);
    assert_eq!(
        json["activities"][0]["routines"][0]["sets"][0]["weight"],
        "20"
    );
    assert_eq!(
        json["activities"][0]["routines"][0]["sets"][1]["weight"],
        30.0
    );

    let decoded: Day = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, day);
}

#[test]
fn weight_accepts_numbers_and_strings_from_the_wire() {
    let decoded: Vec<Set> = serde_json::from_str(r#"[{"weight": "20"}, {"weight": 30}]"#).unwrap();
    assert_eq!(decoded[0].weight, Weight::Text("20".to_string()));
    assert_eq!(decoded[1].weight, Weight::Number(30.0));
}

#[test]
fn draft_deserializes_without_server_fields() {
    let draft: ActivityDraft = serde_json::from_str(
        r#"{
            "aerobic": true,
            "routines": [
                {"type": "run", "reps": 1, "sets": []}
            ]
        }"#,
    )
    .unwrap();

    assert!(draft.aerobic);
    assert_eq!(draft.routines[0].exercise, "run");

    // The id only exists after promotion.
    let activity = draft.into_activity();
    assert_ne!(activity.activity_id, Uuid::nil());
}
