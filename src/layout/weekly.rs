//! One page per Sunday-to-Saturday week.

use chrono::{Datelike, Duration, NaiveDate};

use super::{Page, Week};

/// Widen `start..=end` to whole weeks: back to Sunday, forward to Saturday.
pub fn round_to_week(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = start - Duration::days(start.weekday().num_days_from_sunday() as i64);
    let end = end + Duration::days(6 - end.weekday().num_days_from_sunday() as i64);
    (start, end)
}

pub fn week_pages(start: NaiveDate, end: NaiveDate) -> Vec<Page> {
    let (start, end) = round_to_week(start, end);

    let mut pages = Vec::new();
    let mut week_start = start;
    while week_start <= end {
        let mut week: Week = [None; 7];
        for (i, slot) in week.iter_mut().enumerate() {
            *slot = Some(week_start + Duration::days(i as i64));
        }

        pages.push(Page {
            title: format!("Week of {}", week_start.format("%B %d, %Y")),
            first_day: week_start,
            last_day: week_start + Duration::days(6),
            weeks: vec![week],
        });

        week_start += Duration::days(7);
    }

    pages
}
