//! One page per calendar month, laid out as a Sunday-first grid.

use chrono::{Datelike, Duration, NaiveDate};

use super::{Page, Week};

/// Widen `start..=end` to whole months.
pub fn round_to_month(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = start.with_day(1).unwrap_or(start);
    let end = next_month(end).pred_opt().unwrap_or(end);
    (start, end)
}

pub fn month_pages(start: NaiveDate, end: NaiveDate) -> Vec<Page> {
    let (start, end) = round_to_month(start, end);

    let mut pages = Vec::new();
    let mut month_start = start;
    while month_start <= end {
        let following = next_month(month_start);
        let month_end = following.pred_opt().unwrap_or(month_start);

        pages.push(Page {
            title: month_start.format("%B %Y").to_string(),
            first_day: month_start,
            last_day: month_end,
            weeks: month_grid(month_start, month_end),
        });

        month_start = following;
    }

    pages
}

/// First day of the month after `date`'s month.
fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn month_grid(first: NaiveDate, last: NaiveDate) -> Vec<Week> {
    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut day = first;

    while day <= last {
        let column = day.weekday().num_days_from_sunday() as usize;
        week[column] = Some(day);
        if column == 6 {
            weeks.push(week);
            week = [None; 7];
        }
        day += Duration::days(1);
    }

    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }

    weeks
}
