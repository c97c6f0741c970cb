//! Immutable settings handed to the watcher at start-up.

use std::time::Duration;

use super::filter::FilterConfig;

/// Human-readable region to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// State name, matched case-insensitively.
    pub state_name: String,
    /// District name, matched case-insensitively.
    pub district_name: String,
}

/// Polling loop settings. Never mutated once the loop starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Number of consecutive windows checked per iteration (at least 1).
    pub weeks_to_check: u32,
    /// Pause between the end of one iteration and the start of the next.
    pub repeat_after: Duration,
    /// Eligibility criteria.
    pub filter: FilterConfig,
}
