//! Error types for calprint.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchFailure;

/// Errors that can occur while building importers or loading events.
#[derive(Error, Debug)]
pub enum CalPrintError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The failure carries the full request/response dump; see [`FetchFailure::report`].
    #[error("Feed fetch failed: {0}")]
    Fetch(Box<FetchFailure>),

    #[error("Feed not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalPrintError {
    /// The network diagnostic, if this error came from a failed fetch.
    pub fn fetch_failure(&self) -> Option<&FetchFailure> {
        match self {
            CalPrintError::Fetch(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<FetchFailure> for CalPrintError {
    fn from(failure: FetchFailure) -> Self {
        CalPrintError::Fetch(Box::new(failure))
    }
}

/// Result type alias for calprint operations.
pub type CalPrintResult<T> = Result<T, CalPrintError>;
