//! Page layout: which days go on which page.
//!
//! Weeks run Sunday to Saturday in every mode.

mod monthly;
mod weekly;

use calprint_core::Window;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

pub use monthly::month_pages;
pub use weekly::week_pages;

/// Page layout selected by a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Weekly,
    Monthly,
}

/// One row of a page: Sunday..Saturday, `None` for days outside the page.
pub type Week = [Option<NaiveDate>; 7];

/// A single printed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub weeks: Vec<Week>,
}

impl Page {
    /// Query window covering every day on the page.
    pub fn window(&self) -> Window {
        Window::for_dates(self.first_day, self.last_day)
    }

    /// Days printed on the page, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }
}

/// Pages covering `start..=end` for `mode`, rounded outward to whole periods.
pub fn pages(mode: Mode, start: NaiveDate, end: NaiveDate) -> Vec<Page> {
    match mode {
        Mode::Weekly => week_pages(start, end),
        Mode::Monthly => month_pages(start, end),
    }
}

/// Saturday and Sunday get highlighted.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
