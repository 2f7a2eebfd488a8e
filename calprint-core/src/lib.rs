//! Event import for calprint.
//!
//! This crate loads calendar feeds and answers "which events overlap this
//! window?" for the page renderer:
//! - `Event`, the flat record handed to the renderer
//! - `Importer` and its ICS variant, plus the `factory` building them from presets
//! - `Window`, the inclusive query range

pub mod error;
pub mod event;
pub mod factory;
pub mod fetch;
pub mod ics;
pub mod importer;
pub mod window;

pub use error::{CalPrintError, CalPrintResult};
pub use event::Event;
pub use factory::{ImporterConfig, build_importers};
pub use importer::{IcsImporter, Importer, Occurrences};
pub use window::Window;
