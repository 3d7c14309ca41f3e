//! Property-based tests for the free-slot finder.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use reconcile_engine::{suggest_slot, Interval, SchedulerConfig};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Busy intervals spread over the two weeks following the reference Monday.
fn arb_busy() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec(
        (0i64..14, 0u32..24, 15i64..=180).prop_map(|(day, hour, minutes)| {
            let start = Utc.with_ymd_and_hms(2026, 8, 3, hour, 0, 0).unwrap() + Duration::days(day);
            Interval::new(start, start + Duration::minutes(minutes))
        }),
        0..20,
    )
}

fn arb_offset() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), -720i64..=720]
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(60i64), 15i64..=240]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

/// Parse the local-time strings a suggestion is made of.
fn parse_slot(date: &str, start: &str, end: &str) -> (NaiveDateTime, NaiveDateTime) {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date must be YYYY-MM-DD");
    let start = NaiveTime::parse_from_str(start, "%H:%M").expect("start must be HH:MM");
    let end = NaiveTime::parse_from_str(end, "%H:%M").expect("end must be HH:MM");
    (day.and_time(start), day.and_time(end))
}

// ---------------------------------------------------------------------------
// Property 1: a real suggestion always lands inside the working window,
// on a weekday, hour-aligned, and clear of every busy and reserved interval
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn suggestions_respect_every_constraint(
        busy in arb_busy(),
        reserved in arb_busy(),
        duration in arb_duration(),
        offset in arb_offset(),
    ) {
        let now = Utc.with_ymd_and_hms(2026, 8, 3, 7, 45, 0).unwrap();
        let cfg = SchedulerConfig::default();

        let slot = suggest_slot(&busy, &reserved, Some(duration), offset, now, &cfg);
        let (start, end) = parse_slot(&slot.date, &slot.start_time, &slot.end_time);

        if slot.fallback {
            // The degraded default: tomorrow (local) at 10:00.
            let local_today = (now - Duration::minutes(offset)).date_naive();
            prop_assert_eq!(start.date(), local_today + Duration::days(1));
            prop_assert_eq!(slot.start_time.as_str(), "10:00");
            return Ok(());
        }

        let weekday = start.date().weekday().num_days_from_sunday();
        prop_assert!((1..=5).contains(&weekday), "slot fell on a weekend: {}", slot.date);
        prop_assert_eq!(slot.start_time.len(), 5);
        prop_assert!(start.time().minute() == 0, "slots are hour-aligned");
        prop_assert!(start.time().hour() >= cfg.work_start_hour);
        prop_assert!(
            end <= start.date().and_hms_opt(cfg.work_end_hour, 0, 0).unwrap(),
            "slot must end inside the working window"
        );
        prop_assert_eq!((end - start).num_minutes(), duration);

        for interval in busy.iter().chain(reserved.iter()) {
            let busy_start = (interval.start - Duration::minutes(offset)).naive_utc();
            let busy_end = (interval.end - Duration::minutes(offset)).naive_utc();
            prop_assert!(
                !(start < busy_end && end > busy_start),
                "slot {}..{} overlaps busy {}..{}",
                start, end, busy_start, busy_end
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: the finder is total — it never panics and always answers
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn suggest_always_answers(
        busy in arb_busy(),
        duration in 1i64..=2000,
        offset in arb_offset(),
    ) {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 21, 10, 0).unwrap();

        let slot = suggest_slot(&busy, &[], Some(duration), offset, now, &SchedulerConfig::default());

        prop_assert!(!slot.date.is_empty());
        prop_assert!(!slot.reason.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 3: determinism — identical inputs yield identical suggestions
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn suggest_is_deterministic(
        busy in arb_busy(),
        duration in arb_duration(),
        offset in arb_offset(),
    ) {
        let now = Utc.with_ymd_and_hms(2026, 8, 4, 11, 5, 0).unwrap();
        let cfg = SchedulerConfig::default();

        let first = suggest_slot(&busy, &[], Some(duration), offset, now, &cfg);
        let second = suggest_slot(&busy, &[], Some(duration), offset, now, &cfg);

        prop_assert_eq!(first, second);
    }
}
