//! Text rendering of calendar pages.
//!
//! Pages are separated by a form feed so the document paginates when
//! printed.

use std::collections::BTreeMap;

use calprint_core::{Event, Importer};
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::layout::{Mode, Page, is_weekend};

const PAGE_BREAK: &str = "\x0c\n";
const RULE_WIDTH: usize = 78;
const DAY_COLUMN_WIDTH: usize = 17;
const MONTH_CELL_WIDTH: usize = 10;

/// Events of one page, grouped by the days they cover.
pub type DayEvents = BTreeMap<NaiveDate, Vec<Event>>;

/// Query every importer for the page's window and place events on days.
///
/// Events within a day are sorted by start; multi-day events appear on
/// each day they cover.
pub fn collect_events(importers: &[Box<dyn Importer>], page: &Page) -> DayEvents {
    let window = page.window();
    let mut by_day = DayEvents::new();

    for importer in importers {
        for event in importer.load_range(&window) {
            for day in page.days().filter(|day| covers_day(&event, *day)) {
                by_day.entry(day).or_default().push(event.clone());
            }
        }
    }

    for events in by_day.values_mut() {
        events.sort_by_key(|e| e.start());
    }

    by_day
}

/// Whether `event` falls on `day` (UTC day, end exclusive).
fn covers_day(event: &Event, day: NaiveDate) -> bool {
    let day_start = day.and_time(NaiveTime::default()).and_utc();
    let day_end = day_start + Duration::days(1);
    let (start, end) = (event.start().to_utc(), event.end().to_utc());

    if start == end {
        return start >= day_start && start < day_end;
    }
    start < day_end && end > day_start
}

/// Render all pages into one document.
pub fn render_document(mode: Mode, pages: &[Page], importers: &[Box<dyn Importer>]) -> String {
    pages
        .iter()
        .map(|page| {
            let events = collect_events(importers, page);
            match mode {
                Mode::Weekly => render_week_page(page, &events),
                Mode::Monthly => render_month_page(page, &events),
            }
        })
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

pub fn render_week_page(page: &Page, events: &DayEvents) -> String {
    let mut lines = vec![page.title.clone(), "=".repeat(RULE_WIDTH)];

    for day in page.days() {
        let marker = if is_weekend(day) { "*" } else { " " };
        let label = format!("{} {} {}", day.format("%Y/%m/%d"), day.format("%a"), marker);
        let entries: Vec<String> = events
            .get(&day)
            .map(|evs| evs.iter().map(format_entry).collect())
            .unwrap_or_default();

        if entries.is_empty() {
            lines.push(format!("{:<width$}|", label, width = DAY_COLUMN_WIDTH));
        }
        for (i, entry) in entries.iter().enumerate() {
            let left = if i == 0 { label.as_str() } else { "" };
            lines.push(format!("{:<width$}| {}", left, entry, width = DAY_COLUMN_WIDTH));
        }
        lines.push("-".repeat(RULE_WIDTH));
    }

    lines.join("\n") + "\n"
}

pub fn render_month_page(page: &Page, events: &DayEvents) -> String {
    let mut lines = vec![page.title.clone(), "=".repeat(MONTH_CELL_WIDTH * 7)];

    let header: String = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        .iter()
        .map(|name| format!("{:<width$}", name, width = MONTH_CELL_WIDTH))
        .collect();
    lines.push(header.trim_end().to_string());

    for week in &page.weeks {
        let row: String = week
            .iter()
            .map(|cell| {
                let text = match cell {
                    Some(day) => {
                        let count = events.get(day).map_or(0, Vec::len);
                        let marker = if is_weekend(*day) { "*" } else { "" };
                        if count > 0 {
                            format!("{}{} ({})", day.format("%-d"), marker, count)
                        } else {
                            format!("{}{}", day.format("%-d"), marker)
                        }
                    }
                    None => String::new(),
                };
                format!("{:<width$}", text, width = MONTH_CELL_WIDTH)
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }

    if !events.is_empty() {
        lines.push(String::new());
        for (day, day_events) in events {
            for event in day_events {
                lines.push(format!("{}  {}", day.format("%b %d"), format_entry(event)));
            }
        }
    }

    lines.join("\n") + "\n"
}

fn format_entry(event: &Event) -> String {
    let time = if is_all_day(event) {
        "all-day".to_string()
    } else {
        event.start().format("%H:%M").to_string()
    };
    format!("{:<7}  {}", time, event.title())
}

pub fn is_all_day(event: &Event) -> bool {
    let duration = event.duration();
    event.start().time() == NaiveTime::default()
        && duration > Duration::zero()
        && duration.num_seconds() % Duration::days(1).num_seconds() == 0
}
