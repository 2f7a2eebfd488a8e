//! Event importers.
//!
//! An importer loads a source once and then answers any number of range
//! queries against what it loaded. [`IcsImporter`] is the only variant
//! today; the [`factory`](crate::factory) builds importers from preset
//! entries so new variants don't touch call sites.

mod ics;
mod occurrences;

pub use ics::IcsImporter;
pub use occurrences::Occurrences;

use crate::error::CalPrintResult;
use crate::window::Window;

/// Capability shared by all importers.
pub trait Importer {
    /// Fetch and parse the source, replacing the loaded events.
    ///
    /// On error the previously loaded events are kept.
    fn load(&mut self) -> CalPrintResult<()>;

    /// Events overlapping `window`, in load order.
    ///
    /// Calling this before [`load`](Importer::load) yields nothing.
    fn load_range(&self, window: &Window) -> Occurrences<'_>;

    /// Locator this importer reads from (path or URL).
    fn source(&self) -> &str;
}
