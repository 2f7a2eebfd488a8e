use anyhow::Result;
use calprint_core::{Event, Window};
use chrono::{Duration, Local, NaiveDate};
use owo_colors::OwoColorize;

use crate::preset::Preset;
use crate::render::is_all_day;

use super::{load_importers, parse_date};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days listed when `--to` is not given.
const DEFAULT_DAYS: i64 = 3;

pub fn run(preset: Preset, from: Option<&str>, to: Option<&str>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let from = match from {
        Some(s) => parse_date(s, DATE_FORMAT, "--from date")?,
        None => today,
    };
    let to = match to {
        Some(s) => parse_date(s, DATE_FORMAT, "--to date")?,
        None => from + Duration::days(DEFAULT_DAYS),
    };

    let importers = load_importers(&preset)?;
    let window = Window::for_dates(from, to);

    let mut all_events: Vec<(String, Event)> = Vec::new();
    for importer in &importers {
        for event in importer.load_range(&window) {
            all_events.push((importer.source().to_string(), event));
        }
    }

    all_events.sort_by_key(|(_, event)| event.start());

    if json {
        let events: Vec<&Event> = all_events.iter().map(|(_, e)| e).collect();
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if all_events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group events by day and print
    let mut current_date: Option<NaiveDate> = None;

    for (source, event) in &all_events {
        let date = event.start().date_naive();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date, today).bold());
            current_date = Some(date);
        }

        let tag = format!("[{}]", source);
        println!("  {} {} {}", format_time(event), event.title(), tag.dimmed());
    }

    Ok(())
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn format_time(event: &Event) -> String {
    if is_all_day(event) {
        "all-day".to_string()
    } else {
        format!("{:>7}", event.start().format("%H:%M"))
    }
}
