//! Tunable scheduling parameters.

use serde::{Deserialize, Serialize};

/// Configuration consumed by the deduplicator, slot finder, and resolver.
///
/// `Default` yields the reference deployment values: a 09:00–22:00 working
/// window on weekdays only, a 5-minute duplicate tolerance, a 60-minute
/// relocation floor, and 14/30-day search horizons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// First local hour a slot may start at.
    pub work_start_hour: u32,
    /// Local hour the working window closes at; no slot may end past it.
    pub work_end_hour: u32,
    /// Skip Saturday and Sunday entirely.
    pub weekdays_only: bool,
    /// Start times within this window (after rounding) are considered the
    /// same event by the deduplicator.
    pub duplicate_tolerance_minutes: i64,
    /// Relocated events are never given a slot shorter than this, even when
    /// their recorded duration was shorter. A floor, not a cap.
    pub min_relocation_minutes: i64,
    /// Slot duration used when the caller does not request one.
    pub default_duration_minutes: i64,
    /// How many calendar days ahead the slot finder searches.
    pub suggestion_horizon_days: i64,
    /// How many calendar days ahead the overlap resolver searches.
    pub relocation_horizon_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_start_hour: 9,
            work_end_hour: 22,
            weekdays_only: true,
            duplicate_tolerance_minutes: 5,
            min_relocation_minutes: 60,
            default_duration_minutes: 60,
            suggestion_horizon_days: 14,
            relocation_horizon_days: 30,
        }
    }
}
