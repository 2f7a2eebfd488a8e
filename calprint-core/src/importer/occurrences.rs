//! Range resolution over loaded events.

use std::iter::FusedIterator;
use std::slice;

use chrono::{Datelike, NaiveDate};

use crate::event::Event;
use crate::window::Window;

/// Lazy iterator over the events of one importer that overlap a window.
///
/// Events starting on February 29 also resolve in non-leap years: when
/// the stored event misses the window and the window's year has no
/// February 29, a copy moved to February 28 of that year is tried
/// instead. No other recurrence is expanded.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    events: slice::Iter<'a, Event>,
    window: Window,
}

impl<'a> Occurrences<'a> {
    pub fn new(events: &'a [Event], window: Window) -> Self {
        Occurrences {
            events: events.iter(),
            window,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        for event in self.events.by_ref() {
            if self.window.overlaps(event.start(), event.end()) {
                return Some(event.clone());
            }
            if let Some(shifted) = leap_day_occurrence(event, &self.window) {
                return Some(shifted);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.events.size_hint().1)
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Feb 28 stand-in for a Feb 29 event queried against a non-leap year.
fn leap_day_occurrence(event: &Event, window: &Window) -> Option<Event> {
    let start = event.start();
    if start.month() != 2 || start.day() != 29 {
        return None;
    }

    let year = window.year();
    if is_leap_year(year) {
        return None;
    }

    let shifted = event.shifted_to(NaiveDate::from_ymd_opt(year, 2, 28)?)?;
    window
        .overlaps(shifted.start(), shifted.end())
        .then_some(shifted)
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn event(start: &str, end: &str, title: &str) -> Event {
        Event::new(at(start), at(end), title, "")
    }

    fn window(start: &str, end: &str) -> Window {
        Window::new(at(start), at(end))
    }

    fn leap_birthday() -> Vec<Event> {
        vec![event(
            "2024-02-29T00:00:00Z",
            "2024-03-01T00:00:00Z",
            "Leap Day Birthday",
        )]
    }

    #[test]
    fn yields_events_overlapping_window_in_load_order() {
        let events = vec![
            event("2025-03-05T10:00:00Z", "2025-03-05T11:00:00Z", "inside"),
            event("2025-02-01T10:00:00Z", "2025-02-01T11:00:00Z", "before"),
            event("2025-03-01T09:00:00Z", "2025-03-03T09:00:00Z", "spanning start"),
            event("2025-04-01T10:00:00Z", "2025-04-01T11:00:00Z", "after"),
            event("2025-03-07T23:00:00Z", "2025-03-09T01:00:00Z", "spanning end"),
        ];

        let titles: Vec<String> = Occurrences::new(
            &events,
            window("2025-03-02T00:00:00Z", "2025-03-08T23:59:59Z"),
        )
        .map(|e| e.title().to_string())
        .collect();

        assert_eq!(titles, vec!["inside", "spanning start", "spanning end"]);
    }

    #[test]
    fn touching_endpoints_count_as_overlap() {
        let events = vec![
            event("2025-03-01T00:00:00Z", "2025-03-02T00:00:00Z", "ends at start"),
            event("2025-03-03T00:00:00Z", "2025-03-04T00:00:00Z", "starts at end"),
        ];

        let count = Occurrences::new(
            &events,
            window("2025-03-02T00:00:00Z", "2025-03-03T00:00:00Z"),
        )
        .count();

        assert_eq!(count, 2);
    }

    #[test]
    fn no_loaded_events_yields_nothing() {
        let events: Vec<Event> = Vec::new();
        let mut occurrences = Occurrences::new(
            &events,
            window("2000-01-01T00:00:00Z", "2100-01-01T00:00:00Z"),
        );
        assert!(occurrences.next().is_none());
    }

    #[test]
    fn leap_day_event_shifts_to_feb_28_in_non_leap_year() {
        let events = leap_birthday();

        let found: Vec<Event> = Occurrences::new(
            &events,
            window("2023-02-28T00:00:00Z", "2023-03-01T00:00:00Z"),
        )
        .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].start().date_naive(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(found[0].end(), at("2023-03-01T00:00:00Z"));
        assert_eq!(found[0].title(), "Leap Day Birthday");
    }

    #[test]
    fn leap_day_event_is_unshifted_in_leap_year() {
        let events = leap_birthday();

        let found: Vec<Event> = Occurrences::new(
            &events,
            window("2024-02-29T00:00:00Z", "2024-03-01T00:00:00Z"),
        )
        .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0], events[0]);
    }

    #[test]
    fn leap_day_event_stays_hidden_in_other_leap_years() {
        let events = leap_birthday();

        let count = Occurrences::new(
            &events,
            window("2028-02-28T00:00:00Z", "2028-03-01T00:00:00Z"),
        )
        .count();

        assert_eq!(count, 0);
    }

    #[test]
    fn shifted_copy_must_still_overlap_window() {
        let events = leap_birthday();

        let count = Occurrences::new(
            &events,
            window("2023-06-01T00:00:00Z", "2023-06-30T00:00:00Z"),
        )
        .count();

        assert_eq!(count, 0);
    }

    #[test]
    fn shifted_copy_keeps_time_of_day_and_offset() {
        let events = vec![event(
            "2020-02-29T18:30:00+09:00",
            "2020-02-29T20:00:00+09:00",
            "Dinner",
        )];

        let found: Vec<Event> = Occurrences::new(
            &events,
            window("2021-02-28T00:00:00+09:00", "2021-02-28T23:59:59+09:00"),
        )
        .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start(), at("2021-02-28T18:30:00+09:00"));
        assert_eq!(found[0].end(), at("2021-02-28T20:00:00+09:00"));
    }

    #[test]
    fn leap_day_event_overlapping_directly_is_not_duplicated() {
        // Multi-year window starting in a non-leap year that also covers
        // the stored occurrence: the base rule matches, no copy is added.
        let events = leap_birthday();

        let count = Occurrences::new(
            &events,
            window("2023-01-01T00:00:00Z", "2024-12-31T00:00:00Z"),
        )
        .count();

        assert_eq!(count, 1);
    }

    #[test]
    fn restarting_rescans_all_events() {
        let events = vec![
            event("2025-03-05T10:00:00Z", "2025-03-05T11:00:00Z", "a"),
            event("2025-03-06T10:00:00Z", "2025-03-06T11:00:00Z", "b"),
        ];
        let w = window("2025-03-01T00:00:00Z", "2025-03-31T00:00:00Z");

        let first: Vec<Event> = Occurrences::new(&events, w).collect();
        let second: Vec<Event> = Occurrences::new(&events, w).collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }
}
