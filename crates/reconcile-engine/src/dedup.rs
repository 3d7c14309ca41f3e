//! Collapse near-identical events reported by multiple providers.
//!
//! Two events are duplicates when their normalized titles match and their
//! start times land in the same bucket after rounding to the nearest
//! tolerance boundary (5 minutes by default). The first-seen event becomes
//! canonical; later duplicates contribute their source refs and, when strictly
//! longer, their description. Which duplicate supplies the remaining base
//! fields depends on input order — an accepted nondeterminism. The merged
//! source-ref set does not depend on order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::event::{CalendarEvent, EventSource, SourceRef};

/// Substituted for an empty or whitespace-only title before normalization.
pub const FALLBACK_TITLE: &str = "No title";

/// Lowercase, trim, and collapse internal whitespace runs to single spaces.
/// Empty titles normalize as [`FALLBACK_TITLE`].
pub fn normalize_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() {
        FALLBACK_TITLE
    } else {
        trimmed
    };
    base.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Round to the nearest `tolerance_minutes` boundary, as a unix timestamp.
fn rounded_start(start: DateTime<Utc>, tolerance_minutes: i64) -> i64 {
    let step = tolerance_minutes.max(1) * 60;
    (start.timestamp() + step / 2).div_euclid(step) * step
}

/// Source refs for an incoming event, seeding one from the event's own
/// source when the fetcher did not populate any.
fn seeded_refs(event: &CalendarEvent) -> Vec<SourceRef> {
    if !event.source_refs.is_empty() {
        return event.source_refs.clone();
    }
    let provider_type = event.source.provider_type().to_string();
    vec![SourceRef {
        provider_name: provider_type.clone(),
        provider_id: event.id.clone(),
        provider_type,
    }]
}

fn merge_into(canonical: &mut CalendarEvent, duplicate: &CalendarEvent) {
    for candidate in seeded_refs(duplicate) {
        let already_present = canonical.source_refs.iter().any(|existing| {
            existing.provider_type == candidate.provider_type
                && existing.provider_id == candidate.provider_id
        });
        if !already_present {
            canonical.source_refs.push(candidate);
        }
    }

    // A longer description is assumed to be the richer one.
    if let Some(description) = &duplicate.description {
        let current_len = canonical.description.as_deref().map_or(0, str::len);
        if description.len() > current_len {
            canonical.description = Some(description.clone());
        }
    }

    if canonical.source_refs.len() > 1 {
        canonical.source = EventSource::Multiple;
    }
}

/// Merge duplicate events into canonical entries, preserving first-seen order.
///
/// Always returns a list, possibly shorter than the input. Never fails on
/// malformed titles: an empty title is treated as [`FALLBACK_TITLE`].
/// Idempotent — running the output through again merges nothing further.
pub fn dedupe_events(events: &[CalendarEvent], config: &SchedulerConfig) -> Vec<CalendarEvent> {
    let mut canonical: Vec<CalendarEvent> = Vec::new();
    let mut index_by_key: HashMap<(String, i64), usize> = HashMap::new();

    for event in events {
        let key = (
            normalize_title(&event.title),
            rounded_start(event.start, config.duplicate_tolerance_minutes),
        );
        match index_by_key.get(&key) {
            Some(&index) => merge_into(&mut canonical[index], event),
            None => {
                let mut entry = event.clone();
                if entry.title.trim().is_empty() {
                    entry.title = FALLBACK_TITLE.to_string();
                }
                entry.source_refs = seeded_refs(event);
                index_by_key.insert(key, canonical.len());
                canonical.push(entry);
            }
        }
    }

    canonical
}
