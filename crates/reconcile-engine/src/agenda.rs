//! Composition layer: per-provider event streams → one merged agenda view.
//!
//! Flattens N named streams, collapses duplicates, expands recurring
//! definitions into the window, and computes the merged busy blocks and free
//! gaps for the result. This is the reconciliation step a request handler
//! runs between fetching provider data and persisting the outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::dedup::dedupe_events;
use crate::event::CalendarEvent;
use crate::expander::expand_events;
use crate::slots::{free_gaps, merge_busy, FreeGap, Interval};

/// A named event stream from a single calendar source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStream {
    /// Opaque identifier for this stream (e.g., "work-google", "personal-caldav").
    pub stream_id: String,
    pub events: Vec<CalendarEvent>,
}

/// The reconciled view of one user's calendars over a date window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaView {
    /// Canonical events expanded into the window, in reconciliation order.
    pub events: Vec<CalendarEvent>,
    /// Merged busy blocks (sorted, non-overlapping, clipped to the window).
    pub busy: Vec<Interval>,
    /// Gaps between busy blocks within the window.
    pub free: Vec<FreeGap>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Build the merged agenda for `[window_start, window_end]`.
pub fn build_agenda(
    streams: &[EventStream],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    config: &SchedulerConfig,
) -> AgendaView {
    let raw: Vec<CalendarEvent> = streams
        .iter()
        .flat_map(|stream| stream.events.iter().cloned())
        .collect();

    let canonical = dedupe_events(&raw, config);
    let expanded = expand_events(&canonical, window_start, window_end);

    let intervals: Vec<Interval> = expanded.iter().map(Interval::from_event).collect();
    let busy = merge_busy(&intervals, window_start, window_end);
    let free = free_gaps(&intervals, window_start, window_end);

    AgendaView {
        events: expanded,
        busy,
        free,
        window_start,
        window_end,
    }
}
