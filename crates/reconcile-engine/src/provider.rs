//! Capability seam between the reconciliation core and provider fetchers.
//!
//! Each adapter maps provider-native fields (Google's `summary`/`start.dateTime`,
//! Outlook's `subject`, CalDAV's `SUMMARY`/`DTSTART`) onto [`CalendarEvent`]
//! before events reach this crate, so the core never depends on provider SDKs
//! or wire formats. Adapters are swappable and independently testable against
//! recorded fixtures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agenda::EventStream;
use crate::error::{ReconcileError, Result};
use crate::event::CalendarEvent;

/// The date window a fetch covers, closed on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains_event(&self, event: &CalendarEvent) -> bool {
        event.start <= self.end && event.end >= self.start
    }
}

/// A source of normalized calendar events.
pub trait CalendarProvider {
    /// Stable provider label ("google", "outlook", "caldav", ...).
    fn provider_type(&self) -> &str;

    /// Fetch the events intersecting `range`, already normalized onto
    /// [`CalendarEvent`].
    fn fetch_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>>;
}

/// A provider that replays a recorded event list. Used in tests and anywhere
/// a provider needs to be simulated without network access.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    provider_type: String,
    events: Vec<CalendarEvent>,
}

impl FixtureProvider {
    pub fn new(provider_type: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            provider_type: provider_type.into(),
            events,
        }
    }
}

impl CalendarProvider for FixtureProvider {
    fn provider_type(&self) -> &str {
        &self.provider_type
    }

    fn fetch_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|event| range.contains_event(event))
            .cloned()
            .collect())
    }
}

/// Drain a provider set into named event streams.
///
/// A failing provider does not abort the batch: its error is collected and
/// the remaining providers still contribute their streams.
pub fn collect_streams(
    providers: &[Box<dyn CalendarProvider>],
    range: &DateRange,
) -> (Vec<EventStream>, Vec<ReconcileError>) {
    let mut streams = Vec::new();
    let mut failures = Vec::new();

    for provider in providers {
        match provider.fetch_events(range) {
            Ok(events) => streams.push(EventStream {
                stream_id: provider.provider_type().to_string(),
                events,
            }),
            Err(error) => failures.push(error),
        }
    }

    (streams, failures)
}
