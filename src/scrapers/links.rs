//! Item link collection across the paginated collection listing.

use tracing::{debug, info};
use url::Url;

use crate::browser::{Driver, PageElement};
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{canonical_item_url, ItemUrls};

use super::{settle, ScrapeSettings};

/// Angular component wrapping each entry of the item list.
pub const ITEM_CONTAINER_SELECTOR: &str = "ds-listable-object-component-loader";

/// Title link inside an item container.
pub const TITLE_LINK_SELECTOR: &str = "a.item-list-title";

/// Enabled "Next" control of the pagination bar.
pub const NEXT_PAGE_SELECTOR: &str = r#"li.page-item:not(.disabled) > a[aria-label="Next"]"#;

/// Walks the listing pages and gathers unique item URLs, up to the cap.
pub struct LinkCollector<'a, D: Driver> {
    driver: &'a D,
    settings: &'a ScrapeSettings,
}

impl<'a, D: Driver> LinkCollector<'a, D> {
    pub fn new(driver: &'a D, settings: &'a ScrapeSettings) -> Self {
        Self { driver, settings }
    }

    /// Collect item URLs starting at `listing_url`, in discovery order.
    ///
    /// Fails when the item list never renders on the first page, or renders
    /// empty. Running out of pages is a normal end.
    pub async fn collect(&self, listing_url: &str) -> ScrapeResult<Vec<String>> {
        if self.settings.max_items == 0 {
            return Ok(Vec::new());
        }

        let base = Url::parse(listing_url).map_err(|e| ScrapeError::InvalidUrl {
            url: listing_url.to_string(),
            message: e.to_string(),
        })?;

        self.driver.navigate(listing_url).await?;

        info!("Waiting for Angular to populate the item list...");
        self.driver
            .wait_for(ITEM_CONTAINER_SELECTOR, self.settings.wait_timeout)
            .await
            .map_err(|source| ScrapeError::ListingNotFound {
                url: listing_url.to_string(),
                selector: ITEM_CONTAINER_SELECTOR.to_string(),
                source,
            })?;
        settle(self.settings.settle).await;

        let mut urls = ItemUrls::with_cap(self.settings.max_items);
        let mut page = 1;

        loop {
            let items = self.driver.find_all(ITEM_CONTAINER_SELECTOR).await?;
            if items.is_empty() {
                if urls.is_empty() {
                    return Err(ScrapeError::EmptyListing(listing_url.to_string()));
                }
                info!("No items found on page {}. Stopping pagination.", page);
                break;
            }

            for item in &items {
                let Some(href) = title_href(item).await else {
                    continue;
                };
                let absolute = resolve_href(&base, &href);

                if urls.insert(&absolute) {
                    info!("  [{}] Found: {}", urls.len(), canonical_item_url(&absolute));
                }
                if urls.is_full() {
                    info!("Reached limit of {} items.", self.settings.max_items);
                    return Ok(urls.into_vec());
                }
            }

            if !self.advance().await? {
                info!("No more pages to scrape.");
                break;
            }
            page += 1;

            // The old list may still be attached; this only guards slow renders
            if let Err(e) = self
                .driver
                .wait_for(ITEM_CONTAINER_SELECTOR, self.settings.wait_timeout)
                .await
            {
                debug!("Item list not present on page {}: {}", page, e);
            }
        }

        Ok(urls.into_vec())
    }

    /// Click the enabled "Next" control. Returns false on the last page.
    pub async fn advance(&self) -> ScrapeResult<bool> {
        let Some(next) = self.driver.find(NEXT_PAGE_SELECTOR).await? else {
            return Ok(false);
        };

        next.scroll_into_view().await?;
        next.click().await?;
        settle(self.settings.settle + self.settings.click_settle).await;
        Ok(true)
    }
}

/// Title link href of an item container. Containers without one are skipped.
async fn title_href<E: PageElement>(item: &E) -> Option<String> {
    let link = match item.find(TITLE_LINK_SELECTOR).await {
        Ok(Some(link)) => link,
        Ok(None) => {
            debug!("Skipping item without a title link");
            return None;
        }
        Err(e) => {
            debug!("Skipping item, title link lookup failed: {}", e);
            return None;
        }
    };

    match link.attribute("href").await {
        Ok(Some(href)) if !href.trim().is_empty() => Some(href.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            debug!("Skipping item, could not read href: {}", e);
            None
        }
    }
}

/// Make a (possibly relative) href absolute against the listing page.
fn resolve_href(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
