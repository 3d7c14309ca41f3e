//! Materialize recurring event definitions into date-bound occurrence instances.
//!
//! Definitions are durable; their instances are ephemeral and recomputed on
//! every query for a given window. Expansion never mutates the definition.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::event::{CalendarEvent, Frequency};

/// Expand one event into the concrete occurrences intersecting the closed
/// window `[window_start, window_end]`.
///
/// Without a weekly recurrence rule the event passes through unchanged,
/// wrapped in a list, when its own span intersects the window; otherwise the
/// result is empty. Unrecognized frequencies are a known limitation, not an
/// error, and fall back to the same single-event behavior.
///
/// For weekly rules, every calendar day in the window (day granularity,
/// inclusive on both ends) whose day-of-week is in `daysOfWeek` emits an
/// instance carrying the definition's time-of-day and duration. Instances are
/// tagged `isRecurringInstance` with `originalEventId` set, and their id is
/// `<definition id>_<instance start, RFC 3339>`.
pub fn expand_event(
    event: &CalendarEvent,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    let rule = match &event.recurrence {
        Some(rule) if rule.frequency == Frequency::Weekly => rule.clone(),
        _ => {
            // Closed-interval intersection for the pass-through case.
            if event.start <= window_end && event.end >= window_start {
                return vec![event.clone()];
            }
            return Vec::new();
        }
    };

    let time_of_day = event.start.time();
    let span = event.end - event.start;
    let first_day = window_start.date_naive();
    let total_days = (window_end.date_naive() - first_day).num_days();

    let mut instances = Vec::new();
    for offset in 0..=total_days {
        let day = first_day + Duration::days(offset);
        let day_of_week = day.weekday().num_days_from_sunday() as u8;
        if !rule.days_of_week.contains(&day_of_week) {
            continue;
        }
        let start = Utc.from_utc_datetime(&day.and_time(time_of_day));
        let end = start + span;
        instances.push(CalendarEvent {
            id: format!("{}_{}", event.id, start.to_rfc3339()),
            start,
            end,
            recurrence: None,
            is_recurring_instance: true,
            original_event_id: Some(event.id.clone()),
            ..event.clone()
        });
    }
    instances
}

/// Expand every event in the list into the window. See [`expand_event`].
pub fn expand_events(
    events: &[CalendarEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .flat_map(|event| expand_event(event, window_start, window_end))
        .collect()
}
