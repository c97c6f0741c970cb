//! CoWIN request parameter types.

use std::fmt;

use chrono::{Days, NaiveDate};

/// Number of days a calendar response covers after its start date.
pub const WINDOW_LENGTH_DAYS: u64 = 7;

/// Wire format of the `date` query parameter (`DD-MM-YYYY`).
const WIRE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Date range covered by one `calendarByDistrict` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// First day of the window (sent upstream).
    pub start: NaiveDate,
    /// Last day of the window (`start + 7 days`).
    pub end: NaiveDate,
}

impl SearchWindow {
    /// Creates the window starting at `start`.
    ///
    /// Returns `None` only when the end date overflows the calendar.
    #[must_use]
    pub fn new(start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_days(Days::new(WINDOW_LENGTH_DAYS))?;
        Some(Self { start, end })
    }

    /// Returns the window starting the day after this one ends.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.end.checked_add_days(Days::new(1)).and_then(Self::new)
    }

    /// Returns `weeks` consecutive windows starting at `anchor`.
    ///
    /// Window `n` starts `8 * n` days after `anchor`.
    #[must_use]
    pub fn sequence(anchor: NaiveDate, weeks: u32) -> Vec<Self> {
        let count = usize::try_from(weeks).unwrap_or(usize::MAX);
        std::iter::successors(Self::new(anchor), Self::next)
            .take(count)
            .collect()
    }

    /// Start date formatted for the wire (`DD-MM-YYYY`).
    #[must_use]
    pub fn start_param(&self) -> String {
        format_wire_date(self.start)
    }

    /// End date formatted for the wire (`DD-MM-YYYY`).
    #[must_use]
    pub fn end_param(&self) -> String {
        format_wire_date(self.end)
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_param(), self.end_param())
    }
}

/// Formats a date as `DD-MM-YYYY`.
pub(crate) fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}
