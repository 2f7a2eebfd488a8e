//! Query window for range lookups.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};

/// Inclusive time window `[start, end]`.
/// `start <= end` is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Window {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Window { start, end }
    }

    /// Window covering whole days from `first` 00:00:00 to `last` 23:59:59 UTC.
    pub fn for_dates(first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_time(NaiveTime::default()).and_utc();
        let end = last
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| last.and_time(NaiveTime::default()))
            .and_utc();

        Window {
            start: start.fixed_offset(),
            end: end.fixed_offset(),
        }
    }

    /// Inclusive overlap test: touching at an endpoint counts.
    pub fn overlaps(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> bool {
        end >= self.start && start <= self.end
    }

    /// Calendar year of the window start, read in the start's own offset.
    pub fn year(&self) -> i32 {
        self.start.year()
    }
}
