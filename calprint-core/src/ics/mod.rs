//! ICS feed parsing.
//!
//! Turns an RFC 5545 calendar document into the flat [`Event`](crate::Event)
//! records the importers serve.

mod parse;

pub use parse::parse_events;
