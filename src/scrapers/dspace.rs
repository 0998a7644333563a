//! Full collection harvest: link collection followed by per-item extraction.

use tracing::{info, warn};

use crate::browser::Driver;
use crate::error::ScrapeResult;
use crate::models::{full_view_url, Record};

use super::{LinkCollector, RecordExtractor, ScrapeSettings};

/// Progress notifications emitted during a harvest.
#[derive(Debug)]
pub enum ScrapeEvent<'a> {
    /// Link collection finished with these item URLs.
    LinksCollected(&'a [String]),
    /// A record was extracted for the item at `index`.
    RecordExtracted {
        index: usize,
        url: &'a str,
        record: &'a Record,
    },
}

/// Harvester for one DSpace collection.
///
/// Owns the browser session and releases it when a run finishes, whether the
/// run succeeded or not.
pub struct DSpaceScraper<D: Driver> {
    driver: D,
    listing_url: String,
    settings: ScrapeSettings,
}

impl<D: Driver> DSpaceScraper<D> {
    pub fn new(driver: D, listing_url: impl Into<String>, settings: ScrapeSettings) -> Self {
        Self {
            driver,
            listing_url: listing_url.into(),
            settings,
        }
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Collect item links and extract one record per item.
    pub async fn scrape(self) -> ScrapeResult<Vec<Record>> {
        self.scrape_with(|_| {}).await
    }

    /// Like [`scrape`](Self::scrape), reporting progress to `on_event`.
    pub async fn scrape_with<F>(mut self, mut on_event: F) -> ScrapeResult<Vec<Record>>
    where
        F: FnMut(ScrapeEvent<'_>),
    {
        info!("Loading collection list: {}", self.listing_url);
        let result = self.harvest(&mut on_event).await;
        self.release().await;
        result
    }

    /// Only run link collection.
    pub async fn collect_links(mut self) -> ScrapeResult<Vec<String>> {
        let result = LinkCollector::new(&self.driver, &self.settings)
            .collect(&self.listing_url)
            .await;
        self.release().await;
        result
    }

    async fn harvest<F>(&self, on_event: &mut F) -> ScrapeResult<Vec<Record>>
    where
        F: FnMut(ScrapeEvent<'_>),
    {
        let urls = LinkCollector::new(&self.driver, &self.settings)
            .collect(&self.listing_url)
            .await?;
        info!("Found {} papers. Extracting metadata...", urls.len());
        on_event(ScrapeEvent::LinksCollected(&urls));

        let extractor = RecordExtractor::new(&self.driver, &self.settings);
        let mut records = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            let record = extractor.extract(&full_view_url(url)).await;
            info!("      Title: {}", record.title);
            on_event(ScrapeEvent::RecordExtracted {
                index,
                url,
                record: &record,
            });
            records.push(record);
        }

        Ok(records)
    }

    async fn release(&mut self) {
        if let Err(e) = self.driver.close().await {
            warn!("Failed to close browser session: {}", e);
        }
    }
}
