//! Scrapers for DSpace 8 (Angular) collection listings and item pages.

mod dspace;
mod links;
mod record;

pub use dspace::{DSpaceScraper, ScrapeEvent};
pub use links::{
    LinkCollector, ITEM_CONTAINER_SELECTOR, NEXT_PAGE_SELECTOR, TITLE_LINK_SELECTOR,
};
pub use record::{RecordExtractor, METADATA_ROW_SELECTOR, METADATA_TABLE_SELECTOR};

use std::time::Duration;

/// Caps and timings shared by the scrapers.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Maximum number of items to collect.
    pub max_items: usize,
    /// Pause after a page load so Angular can finish rendering.
    pub settle: Duration,
    /// Additional pause after clicking the next-page control.
    pub click_settle: Duration,
    /// Bound on waits for an element to appear.
    pub wait_timeout: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_items: 10,
            settle: Duration::from_millis(500),
            click_settle: Duration::from_millis(1000),
            wait_timeout: Duration::from_secs(10),
        }
    }
}

impl ScrapeSettings {
    /// Settings without any pauses, for static documents.
    pub fn immediate(max_items: usize) -> Self {
        Self {
            max_items,
            settle: Duration::ZERO,
            click_settle: Duration::ZERO,
            wait_timeout: Duration::ZERO,
        }
    }
}

/// Give client-side rendering time to settle.
// TODO: poll for a stable item count instead of sleeping a fixed interval
pub(crate) async fn settle(pause: Duration) {
    if !pause.is_zero() {
        tokio::time::sleep(pause).await;
    }
}
