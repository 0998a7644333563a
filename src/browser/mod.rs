//! Browser automation boundary.
//!
//! The scrapers only talk to a page through the [`Driver`] and [`PageElement`]
//! traits. Two implementations exist: [`ChromeDriver`] drives a real
//! Chrome/Chromium over the DevTools protocol (chromiumoxide), and
//! [`SnapshotDriver`] serves static HTML snapshots so the scrapers can run
//! without a browser.

mod chrome;
mod config;
pub mod discovery;
mod snapshot;

pub use chrome::ChromeDriver;
#[cfg(feature = "browser")]
pub use chrome::ChromeElement;
pub use config::BrowserEngineConfig;
pub use snapshot::{SnapshotDriver, SnapshotElement};

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Interval between presence checks while waiting for an element.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Result type for browser operations.
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Errors from the browser automation layer.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("Timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },
    #[error("Invalid selector `{0}`")]
    Selector(String),
    #[error("No page loaded")]
    NoPage,
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Browser support not compiled. Rebuild with: cargo build --features browser")]
    Unavailable,
}

/// A live page the scrapers can navigate and query.
///
/// Exactly one page is driven at a time; implementations are not expected to
/// support concurrent calls.
#[async_trait]
pub trait Driver: Send + Sync {
    type Element: PageElement;

    /// Load `url` in the page, replacing the current document.
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// All elements matching a CSS selector, in document order.
    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self::Element>>;

    /// First element matching a CSS selector, if any.
    async fn find(&self, selector: &str) -> BrowserResult<Option<Self::Element>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    /// Poll until an element matching `selector` is present. The timeout bounds
    /// the whole wait, including a lookup still in flight.
    ///
    /// Lookup errors while polling are treated as "not present yet", since the
    /// document may still be swapping under us.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let poll = async {
            loop {
                match self.find(selector).await {
                    Ok(Some(_)) => return,
                    Ok(None) => {}
                    Err(e) => debug!("Lookup of `{}` failed while waiting: {}", selector, e),
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| BrowserError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
    }

    /// Release the underlying session. Safe to call more than once.
    async fn close(&mut self) -> BrowserResult<()>;
}

/// An element handle obtained from a [`Driver`].
#[async_trait]
pub trait PageElement: Send + Sync + Sized {
    /// Descendant elements matching a CSS selector, in document order.
    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self>>;

    /// First descendant matching a CSS selector, if any.
    async fn find(&self, selector: &str) -> BrowserResult<Option<Self>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    /// Rendered text content, trimmed.
    async fn text(&self) -> BrowserResult<String>;

    /// Value of an attribute, `None` when absent.
    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>>;

    /// Scroll the element to the vertical center of the viewport.
    async fn scroll_into_view(&self) -> BrowserResult<()>;

    /// Dispatch a click on the element.
    async fn click(&self) -> BrowserResult<()>;
}
