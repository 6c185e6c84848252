//! Reporting windows
//!
//! Callers hand the report builder an inclusive date range, either as
//! explicit ISO dates or a named trailing preset.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a window from caller-supplied strings
#[derive(Debug, Error)]
pub enum WindowError {
    /// A date string was not `YYYY-MM-DD`
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Inclusive date range for one report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// Explicit range. An inverted range is accepted and matches nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Trailing 7 days, today inclusive
    pub fn trailing_week() -> Self {
        Self::trailing_days(7)
    }

    /// Trailing 30 days, today inclusive
    pub fn trailing_month() -> Self {
        Self::trailing_days(30)
    }

    fn trailing_days(days: i64) -> Self {
        let end = Local::now().date_naive();
        Self { start: end - Duration::days(days - 1), end }
    }

    /// Parse from ISO `YYYY-MM-DD` strings
    pub fn from_iso(start: &str, end: &str) -> Result<Self, WindowError> {
        let parse = |text: &str| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| WindowError::InvalidDate(text.to_string()))
        };
        Ok(Self { start: parse(start)?, end: parse(end)? })
    }

    /// Does `date` fall inside the window?
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
