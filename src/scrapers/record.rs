//! Metadata extraction from an item's full-view table.

use tracing::{trace, warn};

use crate::browser::{BrowserResult, Driver, PageElement};
use crate::models::Record;

use super::{settle, ScrapeSettings};

/// Metadata table of the full item view.
pub const METADATA_TABLE_SELECTOR: &str = "table.table-striped";

/// Rows of the metadata table.
pub const METADATA_ROW_SELECTOR: &str = "table.table-striped tbody tr";

/// Reads one item's full metadata view into a [`Record`].
pub struct RecordExtractor<'a, D: Driver> {
    driver: &'a D,
    settings: &'a ScrapeSettings,
}

impl<'a, D: Driver> RecordExtractor<'a, D> {
    pub fn new(driver: &'a D, settings: &'a ScrapeSettings) -> Self {
        Self { driver, settings }
    }

    /// Load `url` and extract its record.
    ///
    /// Never fails: load or table errors are logged and whatever was read so
    /// far (defaults otherwise) is returned.
    pub async fn extract(&self, url: &str) -> Record {
        let mut record = Record::default();

        if let Err(e) = self.load(url).await {
            warn!("Could not load metadata table at {}: {}", url, e);
            return record;
        }

        if let Err(e) = self.scan_table(&mut record).await {
            warn!("Error parsing table at {}: {}", url, e);
        }

        record
    }

    /// Extract from the page already loaded in the driver.
    pub async fn extract_current(&self) -> Record {
        let mut record = Record::default();
        if let Err(e) = self.scan_table(&mut record).await {
            warn!("Error parsing table: {}", e);
        }
        record
    }

    async fn load(&self, url: &str) -> BrowserResult<()> {
        self.driver.navigate(url).await?;
        self.driver
            .wait_for(METADATA_TABLE_SELECTOR, self.settings.wait_timeout)
            .await?;
        settle(self.settings.settle).await;
        Ok(())
    }

    /// Fill `record` from the table rows. Rows with fewer than two cells and
    /// unknown labels are ignored.
    async fn scan_table(&self, record: &mut Record) -> BrowserResult<()> {
        let rows = self.driver.find_all(METADATA_ROW_SELECTOR).await?;

        for row in &rows {
            let cells = row.find_all("td").await?;
            if cells.len() < 2 {
                continue;
            }

            let label = cells[0].text().await?;
            let value = cells[1].text().await?;
            if !record.apply_row(&label, &value) {
                trace!("Ignoring metadata label {}", label);
            }
        }

        Ok(())
    }
}
