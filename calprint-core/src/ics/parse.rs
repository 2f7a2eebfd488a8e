//! ICS parsing using the icalendar crate's parser.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{CalPrintError, CalPrintResult};
use crate::event::Event;

/// Parse a whole feed into events, in feed order.
///
/// Only VEVENTs are read. RRULEs are ignored: each VEVENT yields exactly
/// one event at its recorded DTSTART.
pub fn parse_events(content: &str) -> CalPrintResult<Vec<Event>> {
    let content = content.trim_start_matches('\u{feff}');
    if !content.trim_start().starts_with("BEGIN:VCALENDAR") {
        return Err(CalPrintError::IcsParse(
            "Feed does not start with BEGIN:VCALENDAR".into(),
        ));
    }

    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| CalPrintError::IcsParse(e.to_string()))?;

    let mut vevents = Vec::new();
    for component in &calendar.components {
        collect_vevents(component, &mut vevents);
    }

    vevents.into_iter().map(to_event).collect()
}

fn collect_vevents<'c, 'a>(component: &'c Component<'a>, out: &mut Vec<&'c Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
        return;
    }
    for child in &component.components {
        collect_vevents(child, out);
    }
}

fn to_event(vevent: &Component) -> CalPrintResult<Event> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(no UID)".to_string());

    let start_prop = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| CalPrintError::IcsParse(format!("Event {} has no DTSTART", uid)))?;
    let start_raw = DatePerhapsTime::try_from(start_prop).map_err(|_| {
        CalPrintError::IcsParse(format!(
            "Event {} has an invalid DTSTART: {}",
            uid,
            start_prop.val.as_ref()
        ))
    })?;
    let all_day = matches!(start_raw, DatePerhapsTime::Date(_));
    let start = to_fixed(start_raw);

    let end = match vevent.find_prop("DTEND") {
        Some(prop) => DatePerhapsTime::try_from(prop).map(to_fixed).map_err(|_| {
            CalPrintError::IcsParse(format!(
                "Event {} has an invalid DTEND: {}",
                uid,
                prop.val.as_ref()
            ))
        })?,
        None => match vevent.find_prop("DURATION") {
            Some(prop) => start + parse_duration(prop.val.as_ref()).ok_or_else(|| {
                CalPrintError::IcsParse(format!(
                    "Event {} has an invalid DURATION: {}",
                    uid,
                    prop.val.as_ref()
                ))
            })?,
            // RFC 5545: a date-only event without end lasts the whole day
            None if all_day => start + Duration::days(1),
            None => start,
        },
    };

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default();
    let detail = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default();

    Ok(Event::new(start, end, title, detail))
}

/// Resolve a DTSTART/DTEND value to a timestamp with offset.
///
/// Date-only and floating values are read as UTC. Zoned values keep the
/// offset that zone has at that local time.
fn to_fixed(dpt: DatePerhapsTime) -> DateTime<FixedOffset> {
    match dpt {
        DatePerhapsTime::Date(date) => midnight_utc(date),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.fixed_offset(),
            CalendarDateTime::Floating(naive) => naive.and_utc().fixed_offset(),
            CalendarDateTime::WithTimezone { date_time, tzid } => zoned(date_time, &tzid),
        },
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(chrono::NaiveTime::default())
        .and_utc()
        .fixed_offset()
}

fn zoned(local: NaiveDateTime, tzid: &str) -> DateTime<FixedOffset> {
    let name = tzid.trim_matches('"').trim_start_matches('/');
    match name.parse::<Tz>() {
        Ok(tz) => match tz.from_local_datetime(&local).earliest() {
            Some(dt) => dt.fixed_offset(),
            // Local time falls in a DST gap: keep the wall time with the
            // offset in force before the gap (RFC 5545 3.3.5).
            None => {
                let before = tz
                    .offset_from_utc_datetime(&(local - Duration::days(1)))
                    .fix();
                DateTime::from_naive_utc_and_offset(local - before, before)
            }
        },
        Err(_) => {
            log::warn!("Unknown TZID '{}', reading {} as UTC", tzid, local);
            Utc.from_utc_datetime(&local).fixed_offset()
        }
    }
}

/// Parse an RFC 5545 DURATION value (`P1D`, `PT1H30M`, `-PT15M`).
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.trim_start_matches('+')),
    };

    let parsed = iso8601::duration(rest).ok()?;
    let std_duration: std::time::Duration = parsed.into();
    let duration = Duration::from_std(std_duration).ok()?;

    Some(if negative { -duration } else { duration })
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
