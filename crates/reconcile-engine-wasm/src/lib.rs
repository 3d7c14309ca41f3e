//! WASM bindings for reconcile-engine.
//!
//! Exposes deduplication, recurrence expansion, slot suggestion, and overlap
//! resolution to JavaScript via `wasm-bindgen`. All complex values cross the
//! boundary as JSON strings in the engine's interchange shape (camelCase
//! fields, RFC 3339 UTC timestamps).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p reconcile-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/reconcile-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/reconcile_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use reconcile_engine::{
    build_agenda, dedupe_events, default_slot, expand_events, parse_datetime, resolve_overlaps,
    suggest_slot, CalendarEvent, EventStream, Interval, SchedulerConfig,
};
use wasm_bindgen::prelude::*;

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, JsValue> {
    parse_datetime(raw).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_events(json: &str) -> Result<Vec<CalendarEvent>, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid events JSON: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Collapse near-identical events reported by multiple providers.
///
/// `events_json` is a JSON array of calendar events. Returns the canonical
/// list as a JSON string.
#[wasm_bindgen(js_name = "dedupeEvents")]
pub fn dedupe_events_json(events_json: &str) -> Result<String, JsValue> {
    let events = parse_events(events_json)?;
    let canonical = dedupe_events(&events, &SchedulerConfig::default());
    to_json(&canonical)
}

/// Expand recurring definitions into concrete occurrences intersecting the
/// closed window `[window_start, window_end]` (ISO 8601 datetime strings).
#[wasm_bindgen(js_name = "expandEvents")]
pub fn expand_events_json(
    events_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let events = parse_events(events_json)?;
    let start = parse_instant(window_start)?;
    let end = parse_instant(window_end)?;
    to_json(&expand_events(&events, start, end))
}

/// Suggest the earliest open slot for a new task.
///
/// `events_json` is the busy calendar; a malformed list degrades to the
/// default slot instead of failing. `timezone_offset_minutes` is subtracted
/// from UTC to obtain local time. `now` is an ISO 8601 datetime string.
#[wasm_bindgen(js_name = "suggestSlot")]
pub fn suggest_slot_json(
    events_json: &str,
    duration_minutes: Option<i32>,
    timezone_offset_minutes: i32,
    now: &str,
) -> Result<String, JsValue> {
    let config = SchedulerConfig::default();
    let now = parse_instant(now)?;
    let duration = duration_minutes.map(i64::from);
    let offset = i64::from(timezone_offset_minutes);

    let slot = match serde_json::from_str::<Vec<CalendarEvent>>(events_json) {
        Ok(events) => {
            let busy: Vec<Interval> = events.iter().map(Interval::from_event).collect();
            suggest_slot(&busy, &[], duration, offset, now, &config)
        }
        Err(_) => default_slot(duration, offset, now, &config),
    };
    to_json(&slot)
}

/// Detect overlaps and relocate movable events into open slots.
///
/// Returns the full resolution report (updated events, conflicts, counts,
/// relocations, unresolved ids) as a JSON string.
#[wasm_bindgen(js_name = "resolveOverlaps")]
pub fn resolve_overlaps_json(
    events_json: &str,
    timezone_offset_minutes: i32,
    now: &str,
) -> Result<String, JsValue> {
    let events = parse_events(events_json)?;
    let now = parse_instant(now)?;
    let report = resolve_overlaps(
        &events,
        i64::from(timezone_offset_minutes),
        now,
        &SchedulerConfig::default(),
    );
    to_json(&report)
}

/// Merge named provider streams into one agenda view over a window.
///
/// `streams_json` is a JSON array of `{streamId, events}` objects.
#[wasm_bindgen(js_name = "buildAgenda")]
pub fn build_agenda_json(
    streams_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let streams: Vec<EventStream> = serde_json::from_str(streams_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid streams JSON: {}", e)))?;
    let start = parse_instant(window_start)?;
    let end = parse_instant(window_end)?;
    let view = build_agenda(&streams, start, end, &SchedulerConfig::default());
    to_json(&view)
}
