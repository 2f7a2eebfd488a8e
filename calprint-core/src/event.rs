//! Imported event type.
//!
//! An `Event` is a single occurrence pulled from a feed. It carries no
//! identity beyond its fields and is never mutated once an importer has
//! produced it.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single calendar occurrence with the offset the feed provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    title: String,
    detail: String,
}

impl Event {
    /// `start <= end` is not checked; malformed feeds pass through as-is.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Event {
            start,
            end,
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Start and end of the event.
    pub fn time(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.start, self.end)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Copy of this event moved to `date`, keeping local time-of-day,
    /// offset and duration.
    ///
    /// Returns `None` if the local time does not exist on `date` in the
    /// event's offset (cannot happen with a fixed offset, but chrono
    /// models it as fallible).
    pub fn shifted_to(&self, date: NaiveDate) -> Option<Event> {
        let start = date
            .and_time(self.start.time())
            .and_local_timezone(*self.start.offset())
            .single()?;

        Some(Event {
            start,
            end: start + self.duration(),
            title: self.title.clone(),
            detail: self.detail.clone(),
        })
    }
}
