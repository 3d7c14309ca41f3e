//! # reconcile-engine
//!
//! Deterministic calendar reconciliation and scheduling for assistant backends.
//!
//! The engine merges events pulled from independent calendar providers into one
//! consistent view, expands weekly recurrence rules into concrete occurrences,
//! finds free slots under working-hour constraints, and relocates conflicting
//! locally-owned events while treating externally-owned events as immovable.
//!
//! Every component is a pure, synchronous function over in-memory collections.
//! Fetching provider data and persisting results belong to the caller.
//!
//! ## Modules
//!
//! - [`event`] — the `CalendarEvent` data model shared by every component
//! - [`dedup`] — collapse near-identical events reported by multiple providers
//! - [`expander`] — weekly recurrence rules → concrete occurrence instances
//! - [`slots`] — free-slot search inside the working window, busy-interval merging
//! - [`resolver`] — conflict detection and sequential relocation of movable events
//! - [`agenda`] — composition layer: provider streams → one merged agenda view
//! - [`provider`] — capability seam for provider event fetchers
//! - [`config`] — tunable scheduling parameters
//! - [`error`] — error types

pub mod agenda;
pub mod config;
pub mod dedup;
pub mod error;
pub mod event;
pub mod expander;
pub mod provider;
pub mod resolver;
pub mod slots;

pub use agenda::{build_agenda, AgendaView, EventStream};
pub use config::SchedulerConfig;
pub use dedup::dedupe_events;
pub use error::ReconcileError;
pub use event::{parse_datetime, CalendarEvent, EventSource, Frequency, Recurrence, SourceRef};
pub use expander::{expand_event, expand_events};
pub use provider::{collect_streams, CalendarProvider, DateRange, FixtureProvider};
pub use resolver::{resolve_overlaps, Conflict, ResolutionReport};
pub use slots::{
    default_slot, free_gaps, merge_busy, suggest_slot, FreeGap, Interval, SlotSuggestion,
};
