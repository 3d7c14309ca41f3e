//! Conflict detection and sequential relocation of movable events.
//!
//! Locally-owned events are movable; everything else is a read-only
//! constraint. Detection counts distinct overlapping pairs with at least one
//! movable member. Within a movable-movable pair the later-enumerated event
//! is the one relocated, so the earlier one keeps its slot; a movable event
//! overlapping an immovable one is always relocated. A movable event in
//! several conflicts is still relocated only once.
//!
//! Relocation is a single sequential pass: each successfully relocated event
//! reserves its new slot in the fixed set before the next search runs, so
//! later relocations cannot collide with earlier ones. This accumulator makes
//! the pass order-dependent by design; do not parallelize it, and serialize
//! concurrent invocations for the same user at the call site.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::event::CalendarEvent;
use crate::slots::{scan_hour_aligned, to_local, to_utc};

/// Note written onto a relocated event.
pub const RESCHEDULE_NOTE: &str = "Rescheduled automatically: Overlap fix";

/// A detected conflict between two events, at least one of them movable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub first_id: String,
    pub second_id: String,
    pub overlap_minutes: i64,
}

/// Outcome of one resolution pass.
///
/// `conflicts_found` counts overlap pairs discovered before relocation;
/// `events_fixed` counts distinct events actually relocated. One movable
/// event overlapping three others yields three found and one fixed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    /// The full event set with relocated events carrying their new times.
    pub events: Vec<CalendarEvent>,
    /// Every overlap pair discovered during detection.
    pub conflicts: Vec<Conflict>,
    pub conflicts_found: usize,
    pub events_fixed: usize,
    /// Updated copies of the events that were moved.
    pub relocated: Vec<CalendarEvent>,
    /// Ids of events that needed a new slot but did not get one within the
    /// horizon. They keep their original times; the caller should warn.
    pub unresolved: Vec<String>,
}

/// Detect conflicts involving movable events and relocate them into open
/// slots. No event is ever deleted; only movable events' times are rewritten.
///
/// Events are processed in their enumerated order. Relocations are applied as
/// they are found — there is no all-or-nothing batch semantics, so a caller
/// that aborts mid-persist still holds individually consistent events.
pub fn resolve_overlaps(
    events: &[CalendarEvent],
    timezone_offset_minutes: i64,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> ResolutionReport {
    let local_now = to_local(now, timezone_offset_minutes);

    // Detection: unordered pairwise scan over the full set.
    let mut needs_move = vec![false; events.len()];
    let mut conflicts = Vec::new();
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            let (first, second) = (&events[i], &events[j]);
            if !first.is_movable() && !second.is_movable() {
                continue;
            }
            if !first.overlaps(second) {
                continue;
            }
            let overlap_start = first.start.max(second.start);
            let overlap_end = first.end.min(second.end);
            conflicts.push(Conflict {
                first_id: first.id.clone(),
                second_id: second.id.clone(),
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            });
            // The later event moves, unless it is the immovable one.
            if second.is_movable() {
                needs_move[j] = true;
            } else {
                needs_move[i] = true;
            }
        }
    }

    // The fixed set: every event not marked for relocation, movable or not.
    let mut fixed_local: Vec<(NaiveDateTime, NaiveDateTime)> = events
        .iter()
        .zip(&needs_move)
        .filter(|(_, marked)| !**marked)
        .map(|(event, _)| {
            (
                to_local(event.start, timezone_offset_minutes),
                to_local(event.end, timezone_offset_minutes),
            )
        })
        .collect();

    let mut updated: Vec<CalendarEvent> = events.to_vec();
    let mut relocated = Vec::new();
    let mut unresolved = Vec::new();

    for index in 0..updated.len() {
        if !needs_move[index] {
            continue;
        }
        let duration = updated[index]
            .duration()
            .max(Duration::minutes(config.min_relocation_minutes));
        match scan_hour_aligned(
            &fixed_local,
            duration,
            local_now,
            config.relocation_horizon_days,
            config,
        ) {
            Some((slot_start, slot_end)) => {
                let event = &mut updated[index];
                event.start = to_utc(slot_start, timezone_offset_minutes);
                event.end = to_utc(slot_end, timezone_offset_minutes);
                event.notes = Some(RESCHEDULE_NOTE.to_string());
                // Reserve the new slot before the next search.
                fixed_local.push((slot_start, slot_end));
                relocated.push(event.clone());
            }
            None => unresolved.push(updated[index].id.clone()),
        }
    }

    let conflicts_found = conflicts.len();
    let events_fixed = relocated.len();
    ResolutionReport {
        events: updated,
        conflicts,
        conflicts_found,
        events_fixed,
        relocated,
        unresolved,
    }
}
