//! Polling loop over consecutive search windows.
#![allow(clippy::future_not_send)]

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use cowin_api::{Center, LocalCowinApi, SearchWindow};
use tokio::time::MissedTickBehavior;

use super::alert::{AlertPlayer, AlertSink};
use super::error::WatchError;
use super::filter::filter_centers;
use super::lookup::ResolvedRegion;
use super::settings::WatchSettings;

/// Shortest pause accepted between iterations.
const MIN_REPEAT_AFTER: Duration = Duration::from_millis(1);

/// Longest pause accepted between iterations (one year).
const MAX_REPEAT_AFTER: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Result of checking one window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    /// Matching centers were found and alerted on.
    Alerted(Vec<Center>),
    /// Nothing matched.
    Idle,
}

/// One window checked during an iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    /// Window that was queried.
    pub window: SearchWindow,
    /// What was found.
    pub outcome: WindowOutcome,
}

/// Drives fetch, filter and alert over `weeks_to_check` windows, repeatedly.
///
/// Windows are always computed from the anchor date fixed at construction,
/// so every iteration queries the same dates.
#[derive(Debug)]
pub struct Watcher<'a, A, P> {
    /// Upstream API.
    api: &'a A,
    /// Alert destination.
    sink: &'a AlertSink<P>,
    /// Resolved region.
    region: ResolvedRegion,
    /// Loop settings.
    settings: WatchSettings,
    /// First day of the first window.
    anchor: NaiveDate,
    /// Iterations started so far.
    attempt: u64,
}

impl<'a, A: LocalCowinApi, P: AlertPlayer> Watcher<'a, A, P> {
    /// Creates a watcher anchored at `anchor`.
    pub const fn new(
        api: &'a A,
        sink: &'a AlertSink<P>,
        region: ResolvedRegion,
        settings: WatchSettings,
        anchor: NaiveDate,
    ) -> Self {
        Self {
            api,
            sink,
            region,
            settings,
            anchor,
            attempt: 0,
        }
    }

    /// Number of iterations started so far.
    #[must_use]
    pub const fn attempts(&self) -> u64 {
        self.attempt
    }

    /// Windows checked by every iteration.
    #[must_use]
    pub fn windows(&self) -> Vec<SearchWindow> {
        SearchWindow::sequence(self.anchor, self.settings.weeks_to_check)
    }

    /// Checks every window once.
    ///
    /// A window with matches is alerted on before the next one is fetched.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or output error; remaining windows are skipped.
    pub async fn run_iteration(&mut self) -> Result<Vec<WindowReport>, WatchError> {
        self.attempt = self.attempt.saturating_add(1);
        tracing::info!(attempt = self.attempt, "Attempt {} {}", self.attempt, "-".repeat(50));

        let district = &self.region.region.district_name;
        let windows = self.windows();
        let mut reports = Vec::with_capacity(windows.len());

        for window in windows {
            tracing::info!("Checking from {} to {}:", window.start_param(), window.end_param());

            let centers = self
                .api
                .calendar_by_district(self.region.district_id, window.start)
                .await?;
            let available = filter_centers(&centers, &self.settings.filter);

            let outcome = if available.is_empty() {
                tracing::info!(
                    fetched = centers.len(),
                    "Nothing available yet for {} between {} and {}",
                    district,
                    window.start_param(),
                    window.end_param()
                );
                WindowOutcome::Idle
            } else {
                tracing::info!(
                    centers = available.len(),
                    "Vaccine available in {} between {} and {}!",
                    district,
                    window.start_param(),
                    window.end_param()
                );
                self.sink.on_match(&available)?;
                WindowOutcome::Alerted(available)
            };

            reports.push(WindowReport { window, outcome });
        }

        Ok(reports)
    }

    /// Runs iterations until `shutdown` resolves or an error occurs.
    ///
    /// The pause of `repeat_after`, clamped to between 1ms and one year, is
    /// measured from the end of each iteration. `shutdown` is only observed between iterations.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::run_iteration`].
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), WatchError>
    where
        F: Future<Output = ()>,
    {
        let period = self
            .settings
            .repeat_after
            .clamp(MIN_REPEAT_AFTER, MAX_REPEAT_AFTER);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!(attempts = self.attempt, "Shutdown requested, stopping watcher");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            self.run_iteration().await?;
            ticker.reset();
            tracing::debug!(secs = period.as_secs_f64(), "Sleeping until next attempt");
        }
    }
}
