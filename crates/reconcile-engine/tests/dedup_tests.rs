//! Tests for the event deduplicator.

use chrono::{DateTime, TimeZone, Utc};
use reconcile_engine::dedup::{dedupe_events, FALLBACK_TITLE};
use reconcile_engine::{CalendarEvent, EventSource, SchedulerConfig, SourceRef};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 3, hour, minute, 0).unwrap()
}

fn provider_event(id: &str, title: &str, provider: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        location: None,
        start,
        end: start + chrono::Duration::minutes(60),
        source: EventSource::External(provider.to_string()),
        recurrence: None,
        source_refs: vec![SourceRef {
            provider_type: provider.to_string(),
            provider_id: id.to_string(),
            provider_name: provider.to_string(),
        }],
        is_recurring_instance: false,
        original_event_id: None,
        notes: None,
    }
}

#[test]
fn case_and_whitespace_variants_merge() {
    // "Team Sync" and "team  sync " two minutes apart, different providers.
    let events = vec![
        provider_event("g1", "Team Sync", "google", at(10, 0)),
        provider_event("o1", "team  sync ", "outlook", at(10, 2)),
    ];

    let canonical = dedupe_events(&events, &SchedulerConfig::default());

    assert_eq!(canonical.len(), 1, "variants should merge into one event");
    assert_eq!(canonical[0].source_refs.len(), 2);
    assert_eq!(
        canonical[0].source,
        EventSource::Multiple,
        "two distinct sources should tag the canonical event as multiple"
    );
    // First-seen event supplies the base fields.
    assert_eq!(canonical[0].id, "g1");
    assert_eq!(canonical[0].title, "Team Sync");
}

#[test]
fn distinct_titles_do_not_merge() {
    let events = vec![
        provider_event("g1", "Team Sync", "google", at(10, 0)),
        provider_event("g2", "Design Review", "google", at(10, 0)),
    ];

    let canonical = dedupe_events(&events, &SchedulerConfig::default());

    assert_eq!(canonical.len(), 2);
}

#[test]
fn distant_starts_do_not_merge() {
    // Same title, 30 minutes apart: different rounding buckets.
    let events = vec![
        provider_event("g1", "Team Sync", "google", at(10, 0)),
        provider_event("o1", "Team Sync", "outlook", at(10, 30)),
    ];

    let canonical = dedupe_events(&events, &SchedulerConfig::default());

    assert_eq!(canonical.len(), 2);
}

#[test]
fn longer_description_replaces_shorter() {
    let mut first = provider_event("g1", "Standup", "google", at(9, 0));
    first.description = Some("daily".to_string());
    let mut second = provider_event("o1", "Standup", "outlook", at(9, 1));
    second.description = Some("daily standup with the platform team".to_string());

    let canonical = dedupe_events(&[first, second], &SchedulerConfig::default());

    assert_eq!(canonical.len(), 1);
    assert_eq!(
        canonical[0].description.as_deref(),
        Some("daily standup with the platform team")
    );
}

#[test]
fn equal_length_description_is_not_replaced() {
    let mut first = provider_event("g1", "Standup", "google", at(9, 0));
    first.description = Some("aaaa".to_string());
    let mut second = provider_event("o1", "Standup", "outlook", at(9, 1));
    second.description = Some("bbbb".to_string());

    let canonical = dedupe_events(&[first, second], &SchedulerConfig::default());

    assert_eq!(
        canonical[0].description.as_deref(),
        Some("aaaa"),
        "only a strictly longer description replaces the canonical one"
    );
}

#[test]
fn duplicate_provider_refs_are_not_repeated() {
    // The same provider reports the same event twice.
    let events = vec![
        provider_event("g1", "Standup", "google", at(9, 0)),
        provider_event("g1", "Standup", "google", at(9, 0)),
    ];

    let canonical = dedupe_events(&events, &SchedulerConfig::default());

    assert_eq!(canonical.len(), 1);
    assert_eq!(
        canonical[0].source_refs.len(),
        1,
        "identical (providerType, providerId) pairs must not repeat"
    );
    assert_eq!(
        canonical[0].source,
        EventSource::External("google".to_string()),
        "a single source must not be tagged as multiple"
    );
}

#[test]
fn missing_title_uses_sentinel() {
    let mut blank = provider_event("g1", "   ", "google", at(9, 0));
    blank.title = "   ".to_string();
    let named = provider_event("o1", "No title", "outlook", at(9, 2));

    let canonical = dedupe_events(&[blank, named], &SchedulerConfig::default());

    assert_eq!(
        canonical.len(),
        1,
        "a blank title should normalize to the sentinel and merge"
    );
    assert_eq!(canonical[0].title, FALLBACK_TITLE);
}

#[test]
fn events_without_refs_are_seeded_from_their_source() {
    let mut local = provider_event("l1", "Errand", "ignored", at(9, 0));
    local.source = EventSource::Local;
    local.source_refs = Vec::new();

    let canonical = dedupe_events(&[local], &SchedulerConfig::default());

    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical[0].source_refs.len(), 1);
    assert_eq!(canonical[0].source_refs[0].provider_type, "local");
    assert_eq!(canonical[0].source_refs[0].provider_id, "l1");
}

#[test]
fn dedupe_is_idempotent() {
    let events = vec![
        provider_event("g1", "Team Sync", "google", at(10, 0)),
        provider_event("o1", "team sync", "outlook", at(10, 2)),
        provider_event("g2", "1:1", "google", at(14, 0)),
    ];

    let once = dedupe_events(&events, &SchedulerConfig::default());
    let twice = dedupe_events(&once, &SchedulerConfig::default());

    assert_eq!(once, twice, "running on its own output must change nothing");
}

#[test]
fn merged_refs_do_not_depend_on_input_order() {
    let forward = vec![
        provider_event("g1", "Team Sync", "google", at(10, 0)),
        provider_event("o1", "team sync", "outlook", at(10, 2)),
        provider_event("c1", "TEAM SYNC", "caldav", at(9, 58)),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let refs = |events: &[CalendarEvent]| -> std::collections::BTreeSet<(String, String)> {
        let canonical = dedupe_events(events, &SchedulerConfig::default());
        assert_eq!(canonical.len(), 1);
        canonical[0]
            .source_refs
            .iter()
            .map(|r| (r.provider_type.clone(), r.provider_id.clone()))
            .collect()
    };

    assert_eq!(
        refs(&forward),
        refs(&reversed),
        "the merged ref set must be identical regardless of order"
    );
}
