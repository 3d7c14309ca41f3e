//! The calendar event data model shared by every reconciliation component.
//!
//! Events arrive from provider-specific fetchers already normalized onto
//! [`CalendarEvent`]. The JSON shape of these types is the interchange format
//! at every boundary (CLI, WASM, test fixtures): camelCase field names,
//! RFC 3339 UTC timestamps, and `source` encoded as `"local"`,
//! `"external:<provider>"`, or `"multiple"`.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// Where an event came from, and therefore whether it may be moved.
///
/// Only `Local` events are movable. A canonical event confirmed by more than
/// one distinct source is tagged `Multiple` by the deduplicator and is treated
/// as immovable from then on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventSource {
    Local,
    External(String),
    Multiple,
}

impl EventSource {
    pub fn is_movable(&self) -> bool {
        matches!(self, EventSource::Local)
    }

    /// Provider label used when seeding a source ref ("local", "google", ...).
    pub fn provider_type(&self) -> &str {
        match self {
            EventSource::Local => "local",
            EventSource::External(provider) => provider,
            EventSource::Multiple => "multiple",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Local => write!(f, "local"),
            EventSource::External(provider) => write!(f, "external:{}", provider),
            EventSource::Multiple => write!(f, "multiple"),
        }
    }
}

impl From<String> for EventSource {
    fn from(raw: String) -> Self {
        if raw == "local" {
            return EventSource::Local;
        }
        if raw == "multiple" {
            return EventSource::Multiple;
        }
        match raw.strip_prefix("external:") {
            Some(provider) => EventSource::External(provider.to_string()),
            // Unknown labels are kept as-is so they round-trip.
            None => EventSource::External(raw),
        }
    }
}

impl From<EventSource> for String {
    fn from(source: EventSource) -> Self {
        source.to_string()
    }
}

/// One provider's claim on a canonical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub provider_type: String,
    pub provider_id: String,
    pub provider_name: String,
}

/// Recurrence frequency. Only `Weekly` is expanded; anything else round-trips
/// unchanged and is treated as non-recurring by the expander.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Other(String),
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("weekly") {
            Frequency::Weekly
        } else {
            Frequency::Other(raw)
        }
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Weekly => "weekly".to_string(),
            Frequency::Other(raw) => raw,
        }
    }
}

/// A recurrence rule attached to a durable event definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: Frequency,
    /// 0 = Sunday … 6 = Saturday.
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,
    /// Carried and serialized, but not applied by expansion: every matching
    /// weekday in the window emits an instance.
    #[serde(default = "default_interval")]
    pub interval: u32,
}

fn default_interval() -> u32 {
    1
}

/// A single calendar event, either a durable definition or an ephemeral
/// occurrence instance derived from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source: EventSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    /// Providers that reported this event. Never empty on a canonical
    /// (deduplicated) event; no duplicate `(providerType, providerId)` pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_refs: Vec<SourceRef>,
    #[serde(default)]
    pub is_recurring_instance: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CalendarEvent {
    /// Half-open interval overlap test shared by every component.
    /// Adjacent events (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_movable(&self) -> bool {
        self.source.is_movable()
    }
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-08-03T14:00:00+00:00")
/// and naive local time (e.g., "2026-08-03T14:00:00"), which is interpreted as UTC.
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| ReconcileError::InvalidDatetime(raw.to_string()))
}
