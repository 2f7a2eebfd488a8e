//! ICS feed importer (local file or http(s)/webcal URL).

use std::io;
use std::path::PathBuf;

use url::Url;

use crate::error::{CalPrintError, CalPrintResult};
use crate::event::Event;
use crate::fetch::{fetch_text, wget_user_agent};
use crate::ics::parse_events;
use crate::importer::{Importer, Occurrences};
use crate::window::Window;

/// Where a feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Url(Url),
    Path(PathBuf),
}

impl Source {
    fn from_locator(locator: &str) -> CalPrintResult<Self> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            let url = Url::parse(locator).map_err(|e| {
                CalPrintError::Config(format!("Invalid feed URL '{}': {}", locator, e))
            })?;
            return Ok(Source::Url(url));
        }

        if let Some(rest) = locator.strip_prefix("webcal://") {
            let url = Url::parse(&format!("https://{}", rest)).map_err(|e| {
                CalPrintError::Config(format!("Invalid feed URL '{}': {}", locator, e))
            })?;
            return Ok(Source::Url(url));
        }

        let expanded = shellexpand::tilde(locator).into_owned();
        Ok(Source::Path(PathBuf::from(expanded)))
    }
}

/// Importer backed by an ICS feed.
#[derive(Debug, Clone)]
pub struct IcsImporter {
    locator: String,
    source: Source,
    user_agent: Option<String>,
    events: Vec<Event>,
}

impl IcsImporter {
    /// Importer for `locator`: an `http(s)://` or `webcal://` URL, or a file path.
    ///
    /// Nothing is read until [`Importer::load`] is called.
    pub fn new(locator: &str) -> CalPrintResult<Self> {
        Ok(IcsImporter {
            locator: locator.to_string(),
            source: Source::from_locator(locator)?,
            user_agent: None,
            events: Vec::new(),
        })
    }

    /// Override the `User-Agent` sent for URL feeds.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Events from the last successful load, in feed order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn read(&self) -> CalPrintResult<String> {
        match &self.source {
            Source::Url(url) => {
                let user_agent = self.user_agent.clone().unwrap_or_else(wget_user_agent);
                Ok(fetch_text(url, &user_agent)?)
            }
            Source::Path(path) => std::fs::read_to_string(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CalPrintError::NotFound(path.clone()),
                _ => CalPrintError::Io(e),
            }),
        }
    }
}

impl Importer for IcsImporter {
    fn load(&mut self) -> CalPrintResult<()> {
        let content = self.read()?;
        let events = parse_events(&content)?;

        log::debug!("Loaded {} events from {}", events.len(), self.locator);

        self.events = events;
        Ok(())
    }

    fn load_range(&self, window: &Window) -> Occurrences<'_> {
        Occurrences::new(&self.events, *window)
    }

    fn source(&self) -> &str {
        &self.locator
    }
}
