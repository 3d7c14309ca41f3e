//! Free-slot search inside the working window, plus busy-interval merging.
//!
//! The finder scans day by day from the user's local "today", weekdays only,
//! trying hour-aligned start times inside the working window and returning the
//! first candidate that clears the busy set. All returned times are local
//! wall-clock strings; the caller owns any further conversion.
//!
//! The user-local frame is derived from a signed offset in minutes:
//! `local = utc - offset`. Busy intervals arrive in UTC and are shifted into
//! that frame before the overlap test.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::event::CalendarEvent;

/// Local hour of the fail-safe default slot (tomorrow at 10:00).
const FALLBACK_HOUR: u32 = 10;

/// A busy interval in UTC, decoupled from any particular event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }.normalized()
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        Self::new(event.start, event.end)
    }

    /// Inverted intervals arriving from the boundary are repaired by swapping.
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    /// Half-open interval overlap test; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A gap between merged busy intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeGap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// A suggested slot in the user's local frame.
///
/// `date` is `YYYY-MM-DD`, `start_time`/`end_time` are `HH:MM`, all local
/// wall-clock. `fallback` marks the degraded default slot, so callers can
/// surface a warning instead of treating it as a genuine match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSuggestion {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
    pub fallback: bool,
}

/// Merge overlapping or adjacent busy intervals, clipped to the given window.
///
/// Returns a sorted, non-overlapping list. Intervals entirely outside the
/// window are discarded.
pub fn merge_busy(
    intervals: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Interval> {
    let mut clipped: Vec<Interval> = intervals
        .iter()
        .map(|interval| interval.normalized())
        .filter(|interval| interval.start < window_end && interval.end > window_start)
        .map(|interval| Interval {
            start: interval.start.max(window_start),
            end: interval.end.min(window_end),
        })
        .collect();

    if clipped.is_empty() {
        return Vec::new();
    }

    clipped.sort_by_key(|interval| (interval.start, interval.end));

    let mut merged: Vec<Interval> = Vec::new();
    for interval in clipped {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                // Overlapping or adjacent: extend the current interval.
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// List the gaps between merged busy intervals within the window.
pub fn free_gaps(
    intervals: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeGap> {
    let merged = merge_busy(intervals, window_start, window_end);

    let mut gaps = Vec::new();
    let mut cursor = window_start;
    for busy in &merged {
        if cursor < busy.start {
            gaps.push(FreeGap {
                start: cursor,
                end: busy.start,
                duration_minutes: (busy.start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(busy.end);
    }
    if cursor < window_end {
        gaps.push(FreeGap {
            start: cursor,
            end: window_end,
            duration_minutes: (window_end - cursor).num_minutes(),
        });
    }

    gaps
}

/// Scan for the first hour-aligned slot that clears the busy set.
///
/// Busy intervals and `local_now` are already in the user's local frame.
/// Day 0 never offers a slot in the hour that has already begun; subsequent
/// days start at the opening hour. A candidate is rejected when its end would
/// pass the closing hour.
pub(crate) fn scan_hour_aligned(
    busy_local: &[(NaiveDateTime, NaiveDateTime)],
    duration: Duration,
    local_now: NaiveDateTime,
    horizon_days: i64,
    config: &SchedulerConfig,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    for day_offset in 0..horizon_days {
        let day = local_now.date() + Duration::days(day_offset);
        if config.weekdays_only && is_weekend(day) {
            continue;
        }

        let mut first_hour = config.work_start_hour;
        if day_offset == 0 {
            first_hour = first_hour.max(local_now.hour() + 1);
        }
        let day_close = day.and_hms_opt(config.work_end_hour, 0, 0)?;

        for hour in first_hour..config.work_end_hour {
            let Some(candidate_start) = day.and_hms_opt(hour, 0, 0) else {
                continue;
            };
            let candidate_end = candidate_start + duration;
            if candidate_end > day_close {
                continue;
            }
            let conflicts = busy_local
                .iter()
                .any(|&(busy_start, busy_end)| candidate_start < busy_end && candidate_end > busy_start);
            if !conflicts {
                return Some((candidate_start, candidate_end));
            }
        }
    }
    None
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday().num_days_from_sunday(), 0 | 6)
}

fn day_phrase(day_offset: i64, day: NaiveDate) -> String {
    match day_offset {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        _ => format!("on {}", day.format("%A")),
    }
}

fn band_phrase(hour: u32) -> &'static str {
    if hour < 12 {
        "Mornings are well suited to focused work."
    } else {
        "Afternoons are good for meetings and collaboration."
    }
}

fn to_suggestion(start: NaiveDateTime, end: NaiveDateTime, local_now: NaiveDateTime) -> SlotSuggestion {
    let day_offset = (start.date() - local_now.date()).num_days();
    let reason = format!(
        "This slot is open {} at {}. {}",
        day_phrase(day_offset, start.date()),
        start.format("%H:%M"),
        band_phrase(start.hour()),
    );
    SlotSuggestion {
        date: start.format("%Y-%m-%d").to_string(),
        start_time: start.format("%H:%M").to_string(),
        end_time: end.format("%H:%M").to_string(),
        reason,
        fallback: false,
    }
}

/// The fail-safe default: tomorrow (local) at 10:00, duration-derived end.
///
/// Used when no slot exists within the horizon and when busy data is too
/// malformed to search. Never fails.
pub fn default_slot(
    duration_minutes: Option<i64>,
    timezone_offset_minutes: i64,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> SlotSuggestion {
    let duration = resolve_duration(duration_minutes, config);
    let local_now = to_local(now, timezone_offset_minutes);
    let day = local_now.date() + Duration::days(1);
    let start = day.and_time(NaiveTime::from_hms_opt(FALLBACK_HOUR, 0, 0).unwrap_or(NaiveTime::MIN));
    let end = start + duration;
    SlotSuggestion {
        date: start.format("%Y-%m-%d").to_string(),
        start_time: start.format("%H:%M").to_string(),
        end_time: end.format("%H:%M").to_string(),
        reason: "No open slot was found in the search horizon; defaulting to tomorrow at 10:00."
            .to_string(),
        fallback: true,
    }
}

/// Find the earliest open slot for `duration_minutes` (default from config).
///
/// `busy` is the persisted calendar; `reserved` holds intervals already
/// promised within this planning session but not yet persisted, so repeated
/// calls do not double-book. Both are treated identically.
///
/// Scans up to the suggestion horizon; when nothing fits, degrades to the
/// [`default_slot`] rather than failing.
pub fn suggest_slot(
    busy: &[Interval],
    reserved: &[Interval],
    duration_minutes: Option<i64>,
    timezone_offset_minutes: i64,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> SlotSuggestion {
    let duration = resolve_duration(duration_minutes, config);
    let local_now = to_local(now, timezone_offset_minutes);
    let busy_local: Vec<(NaiveDateTime, NaiveDateTime)> = busy
        .iter()
        .chain(reserved)
        .map(|interval| {
            let interval = interval.normalized();
            (
                to_local(interval.start, timezone_offset_minutes),
                to_local(interval.end, timezone_offset_minutes),
            )
        })
        .collect();

    match scan_hour_aligned(
        &busy_local,
        duration,
        local_now,
        config.suggestion_horizon_days,
        config,
    ) {
        Some((start, end)) => to_suggestion(start, end, local_now),
        None => default_slot(duration_minutes, timezone_offset_minutes, now, config),
    }
}

pub(crate) fn resolve_duration(duration_minutes: Option<i64>, config: &SchedulerConfig) -> Duration {
    Duration::minutes(duration_minutes.unwrap_or(config.default_duration_minutes).max(1))
}

pub(crate) fn to_local(instant: DateTime<Utc>, timezone_offset_minutes: i64) -> NaiveDateTime {
    (instant - Duration::minutes(timezone_offset_minutes)).naive_utc()
}

pub(crate) fn to_utc(local: NaiveDateTime, timezone_offset_minutes: i64) -> DateTime<Utc> {
    local.and_utc() + Duration::minutes(timezone_offset_minutes)
}
