//! Tests for recurrence expansion.

use chrono::{DateTime, Duration, TimeZone, Utc};
use meeting_engine::dst::DstPolicy;
use meeting_engine::expander::{expand_seed, link_to_parent, MAX_INSTANCES};
use meeting_engine::{
    generate_instances, generate_instances_with, ExpansionOptions, Meeting, MeetingStatus,
    RecurrenceFrequency,
};

fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn wall_clock() -> ExpansionOptions {
    ExpansionOptions {
        wall_clock: true,
        ..ExpansionOptions::default()
    }
}

/// A one-hour seed at 10:00 UTC on 2026-03-02.
fn seed() -> Meeting {
    Meeting::new(
        "Stand-up",
        utc(2026, 3, 2, 10, 0),
        utc(2026, 3, 2, 11, 0),
    )
}

// ---------------------------------------------------------------------------
// Basic frequencies
// ---------------------------------------------------------------------------

#[test]
fn none_frequency_yields_nothing() {
    let s = seed();
    let far = s.start_time + Duration::days(365 * 10);

    assert!(generate_instances(&s, &RecurrenceFrequency::None, far).is_empty());
}

#[test]
fn daily_three_days_gives_three_instances() {
    let s = seed();
    let end = s.start_time + Duration::days(3);

    let result = generate_instances(&s, &RecurrenceFrequency::Daily, end);

    assert_eq!(result.len(), 3, "end date is inclusive");
    for (i, instance) in result.iter().enumerate() {
        let offset = Duration::days(i as i64 + 1);
        assert_eq!(instance.start_time, s.start_time + offset);
        assert_eq!(instance.end_time, s.end_time + offset);
        assert_eq!(instance.duration(), s.duration());
    }
}

#[test]
fn weekly_end_inside_first_week_is_empty() {
    let s = seed();
    let end = s.start_time + Duration::days(7) - Duration::minutes(1);

    assert!(generate_instances(&s, &RecurrenceFrequency::Weekly, end).is_empty());
}

#[test]
fn weekly_steps_seven_days() {
    let s = seed();
    let end = s.start_time + Duration::days(21);

    let result = generate_instances(&s, &RecurrenceFrequency::Weekly, end);

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(
        starts,
        vec![
            utc(2026, 3, 9, 10, 0),
            utc(2026, 3, 16, 10, 0),
            utc(2026, 3, 23, 10, 0),
        ]
    );
}

#[test]
fn monthly_keeps_day_of_month() {
    let s = seed();
    let end = utc(2026, 6, 30, 0, 0);

    let result = generate_instances(&s, &RecurrenceFrequency::Monthly, end);

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(
        starts,
        vec![
            utc(2026, 4, 2, 10, 0),
            utc(2026, 5, 2, 10, 0),
            utc(2026, 6, 2, 10, 0),
        ]
    );
}

#[test]
fn monthly_rolls_over_short_months() {
    // Jan 31 + 1 month spills past February and the drift carries forward.
    let s = Meeting::new("Invoice run", utc(2026, 1, 31, 9, 0), utc(2026, 1, 31, 9, 30));
    let end = utc(2026, 4, 30, 0, 0);

    let result = generate_instances(&s, &RecurrenceFrequency::Monthly, end);

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(starts, vec![utc(2026, 3, 3, 9, 0), utc(2026, 4, 3, 9, 0)]);
}

#[test]
fn monthly_rollover_in_leap_year() {
    let s = Meeting::new("Invoice run", utc(2028, 1, 31, 9, 0), utc(2028, 1, 31, 9, 30));
    let end = utc(2028, 3, 31, 0, 0);

    let result = generate_instances(&s, &RecurrenceFrequency::Monthly, end);

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start_time, utc(2028, 3, 2, 9, 0));
}

// ---------------------------------------------------------------------------
// Bounds and cap
// ---------------------------------------------------------------------------

#[test]
fn end_before_or_at_seed_start_is_empty() {
    let s = seed();

    for freq in [
        RecurrenceFrequency::Daily,
        RecurrenceFrequency::Weekly,
        RecurrenceFrequency::Monthly,
    ] {
        assert!(generate_instances(&s, &freq, s.start_time).is_empty());
        assert!(generate_instances(&s, &freq, s.start_time - Duration::days(1)).is_empty());
    }
}

#[test]
fn far_future_end_is_capped() {
    let s = seed();
    let end = s.start_time + Duration::days(365 * 50);

    for freq in [
        RecurrenceFrequency::Daily,
        RecurrenceFrequency::Weekly,
        RecurrenceFrequency::Monthly,
    ] {
        let result = generate_instances(&s, &freq, end);
        assert_eq!(result.len(), MAX_INSTANCES, "{freq} should hit the cap");
    }
}

#[test]
fn caller_cap_is_respected_but_never_raised() {
    let s = seed();
    let end = s.start_time + Duration::days(365 * 50);

    let small = ExpansionOptions {
        max_instances: 5,
        ..ExpansionOptions::default()
    };
    assert_eq!(
        generate_instances_with(&s, &RecurrenceFrequency::Daily, end, &small).len(),
        5
    );

    let huge = ExpansionOptions {
        max_instances: 10_000,
        ..ExpansionOptions::default()
    };
    assert_eq!(
        generate_instances_with(&s, &RecurrenceFrequency::Daily, end, &huge).len(),
        MAX_INSTANCES
    );
}

#[test]
fn unrecognized_frequency_terminates_empty() {
    let s = seed();
    let end = s.start_time + Duration::days(30);
    let freq = RecurrenceFrequency::Unrecognized("fortnightly".into());

    assert!(generate_instances(&s, &freq, end).is_empty());
}

#[test]
fn expansion_is_idempotent() {
    let s = seed();
    let end = s.start_time + Duration::days(90);

    let first = generate_instances(&s, &RecurrenceFrequency::Weekly, end);
    let second = generate_instances(&s, &RecurrenceFrequency::Weekly, end);

    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Field handling
// ---------------------------------------------------------------------------

#[test]
fn instances_copy_seed_fields() {
    let mut s = seed()
        .with_id("seed-1")
        .with_recurrence(RecurrenceFrequency::Daily, Some(utc(2026, 3, 4, 0, 0)));
    s.description = Some("Daily sync".into());
    s.location = Some("Office".into());
    s.latitude = Some(50.45);
    s.longitude = Some(30.52);
    s.status = MeetingStatus::Scheduled;
    s.participants.insert("user-a".into());
    s.participants.insert("user-b".into());

    let result = generate_instances(&s, &RecurrenceFrequency::Daily, utc(2026, 3, 4, 10, 0));

    assert_eq!(result.len(), 2);
    for instance in &result {
        assert_eq!(instance.title, s.title);
        assert_eq!(instance.description, s.description);
        assert_eq!(instance.location, s.location);
        assert_eq!(instance.coordinates(), s.coordinates());
        assert_eq!(instance.participants, s.participants);
        assert_eq!(instance.recurrence_end_date, s.recurrence_end_date);
        assert_eq!(instance.recurrence_frequency, RecurrenceFrequency::None);
        assert_eq!(instance.id, None, "instances get their id on insert");
        assert_eq!(instance.parent_meeting_id, None);
    }
}

#[test]
fn seed_slot_never_repeated() {
    let s = seed();
    let result = generate_instances(&s, &RecurrenceFrequency::Daily, utc(2026, 3, 10, 0, 0));

    assert!(result.iter().all(|m| m.start_time > s.start_time));
}

#[test]
fn expand_seed_reads_rule_from_seed() {
    let s = seed().with_recurrence(RecurrenceFrequency::Weekly, Some(utc(2026, 3, 20, 0, 0)));

    let result = expand_seed(&s, &ExpansionOptions::default());

    assert_eq!(result.len(), 2);
}

#[test]
fn expand_seed_without_end_date_is_empty() {
    let s = seed().with_recurrence(RecurrenceFrequency::Daily, None);

    assert!(expand_seed(&s, &ExpansionOptions::default()).is_empty());
}

#[test]
fn link_to_parent_sets_back_reference() {
    let s = seed();
    let mut result = generate_instances(&s, &RecurrenceFrequency::Daily, utc(2026, 3, 5, 0, 0));

    link_to_parent(&mut result, "seed-42");

    assert!(result
        .iter()
        .all(|m| m.parent_meeting_id.as_deref() == Some("seed-42")));
}

// ---------------------------------------------------------------------------
// Timezones and DST
// ---------------------------------------------------------------------------

#[test]
fn daily_steps_are_fixed_across_fall_back() {
    // Kyiv falls back on 2026-10-25; steps stay 24 hours apart by default.
    let s = Meeting::new("Planning", utc(2026, 10, 23, 7, 0), utc(2026, 10, 23, 8, 0))
        .with_timezone("Europe/Kyiv");
    let end = s.start_time + Duration::days(3);

    let result = generate_instances(&s, &RecurrenceFrequency::Daily, end);

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(
        starts,
        vec![
            utc(2026, 10, 24, 7, 0),
            utc(2026, 10, 25, 7, 0),
            utc(2026, 10, 26, 7, 0),
        ]
    );
}

#[test]
fn weekly_across_spring_forward_within_a_week_is_empty() {
    let s = Meeting::new("Review", utc(2026, 3, 25, 8, 0), utc(2026, 3, 25, 9, 0))
        .with_timezone("Europe/Kyiv");
    let end = s.start_time + Duration::days(7) - Duration::minutes(30);

    assert!(generate_instances(&s, &RecurrenceFrequency::Weekly, end).is_empty());
}

#[test]
fn wall_clock_kept_across_spring_forward() {
    // Kyiv springs forward on 2026-03-29 (EET +2 → EEST +3).
    // 10:00 local is 08:00Z before and 07:00Z after.
    let s = Meeting::new("Planning", utc(2026, 3, 27, 8, 0), utc(2026, 3, 27, 9, 0))
        .with_timezone("Europe/Kyiv");

    let result = generate_instances_with(
        &s,
        &RecurrenceFrequency::Daily,
        utc(2026, 3, 30, 23, 0),
        &wall_clock(),
    );

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(
        starts,
        vec![
            utc(2026, 3, 28, 8, 0),
            utc(2026, 3, 29, 7, 0),
            utc(2026, 3, 30, 7, 0),
        ]
    );
    assert!(result.iter().all(|m| m.duration() == Duration::hours(1)));
}

#[test]
fn default_timezone_applies_to_seed_without_zone() {
    let s = Meeting::new("Planning", utc(2026, 3, 27, 8, 0), utc(2026, 3, 27, 9, 0));
    let options = ExpansionOptions {
        default_timezone: Some("Europe/Kyiv".into()),
        ..wall_clock()
    };

    let result = generate_instances_with(
        &s,
        &RecurrenceFrequency::Daily,
        utc(2026, 3, 29, 23, 0),
        &options,
    );

    assert_eq!(result[1].start_time, utc(2026, 3, 29, 7, 0));
}

#[test]
fn unknown_seed_timezone_falls_back_to_utc() {
    let s = seed().with_timezone("Mars/Olympus_Mons");

    let result = generate_instances_with(
        &s,
        &RecurrenceFrequency::Daily,
        utc(2026, 3, 3, 10, 0),
        &wall_clock(),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start_time, utc(2026, 3, 3, 10, 0));
}

/// 03:30 local does not exist in Kyiv on 2026-03-29 (03:00 → 04:00).
fn gap_seed() -> Meeting {
    // 2026-03-28 03:30 EET = 01:30Z
    Meeting::new("Night shift", utc(2026, 3, 28, 1, 30), utc(2026, 3, 28, 2, 0))
        .with_timezone("Europe/Kyiv")
}

#[test]
fn gap_occurrence_shifts_forward_by_default() {
    let result = generate_instances_with(
        &gap_seed(),
        &RecurrenceFrequency::Daily,
        utc(2026, 3, 30, 23, 0),
        &wall_clock(),
    );

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    // Mar 29: 03:30 shifted to 04:30 EEST = 01:30Z. Mar 30: 03:30 EEST = 00:30Z.
    assert_eq!(starts, vec![utc(2026, 3, 29, 1, 30), utc(2026, 3, 30, 0, 30)]);
}

#[test]
fn gap_occurrence_skipped_with_skip_policy() {
    let options = ExpansionOptions {
        dst_policy: DstPolicy::Skip,
        ..wall_clock()
    };

    let result = generate_instances_with(
        &gap_seed(),
        &RecurrenceFrequency::Daily,
        utc(2026, 3, 30, 23, 0),
        &options,
    );

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    assert_eq!(starts, vec![utc(2026, 3, 30, 0, 30)]);
}

#[test]
fn whole_skipped_day_does_not_end_the_series() {
    // Samoa skipped 2011-12-30 (UTC-10 → UTC+14). 10:00 local on Dec 28 is 20:00Z.
    let s = Meeting::new("Call", utc(2011, 12, 28, 20, 0), utc(2011, 12, 28, 21, 0))
        .with_timezone("Pacific/Apia");
    let end = s.start_time + Duration::days(10);

    let result = generate_instances_with(&s, &RecurrenceFrequency::Daily, end, &wall_clock());

    let starts: Vec<_> = result.iter().map(|m| m.start_time).collect();
    // Dec 29 at -10, the missing Dec 30 shifted a day forward, then Dec 31 (a
    // duplicate of the shift, dropped) and Jan 1..=8 at +14.
    assert_eq!(starts.len(), 10);
    assert_eq!(starts[0], utc(2011, 12, 29, 20, 0));
    assert_eq!(starts[1], utc(2011, 12, 30, 20, 0));
    assert_eq!(starts[2], utc(2011, 12, 31, 20, 0));
    assert_eq!(starts[9], end);
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
}
