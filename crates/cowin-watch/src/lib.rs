//! Slot watching for cowin-alert.
//!
//! Resolves the configured region once, then polls consecutive weekly
//! windows forever, filters the returned centers and raises an alert
//! whenever something bookable shows up.

/// Audible alerts and the output file.
pub mod alert;
/// Error taxonomy.
pub mod error;
/// Session and address eligibility.
pub mod filter;
/// State and district name resolution.
pub mod lookup;
/// Loop settings.
pub mod settings;
/// Polling loop.
pub mod watcher;

pub use alert::{AlertPlayer, AlertSink, AlertSound, MediaPlayer};
pub use error::{LookupError, WatchError};
pub use filter::{FilterConfig, filter_centers, is_eligible};
pub use lookup::{ResolvedRegion, resolve_district_id, resolve_region, resolve_state_id};
pub use settings::{Region, WatchSettings};
pub use watcher::{WindowOutcome, WindowReport, Watcher};
