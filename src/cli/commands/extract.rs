//! Offline extraction from a saved item page.

use std::path::Path;

use anyhow::Context;

use crate::browser::{Driver, SnapshotDriver};
use crate::config::Config;
use crate::output::to_pretty_json;
use crate::scrapers::{RecordExtractor, ScrapeSettings};

/// Pseudo-URL the saved page is served under.
const SNAPSHOT_URL: &str = "file:///snapshot/full";

/// Print the record extracted from a saved full-view HTML page.
pub async fn cmd_extract(config: &Config, file: &Path) -> anyhow::Result<()> {
    let mut driver = SnapshotDriver::from_file(SNAPSHOT_URL, file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    // A static document has nothing left to render
    let settings = ScrapeSettings::immediate(config.max_items);

    let record = RecordExtractor::new(&driver, &settings)
        .extract(SNAPSHOT_URL)
        .await;
    driver.close().await?;

    let json = to_pretty_json(&record)?;
    println!("{}", String::from_utf8_lossy(&json).trim_end());
    Ok(())
}
