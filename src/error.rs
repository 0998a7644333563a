//! Scrape error types.

use thiserror::Error;

use crate::browser::BrowserError;

/// Result type for scrape operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors that abort a scrape run.
///
/// Per-item failures never surface here: they are logged and replaced with
/// default values so one bad item does not abort the batch.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Item list `{selector}` never appeared on {url}: {source}")]
    ListingNotFound {
        url: String,
        selector: String,
        #[source]
        source: BrowserError,
    },
    #[error("Could not find any item links on {0}")]
    EmptyListing(String),
    #[error("Invalid listing URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}
