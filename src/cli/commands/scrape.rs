//! Harvest commands.

use anyhow::Context;
use console::style;
use indicatif::ProgressBar;

use crate::cli::helpers::{collection_spinner, extraction_progress, launch_browser, short_title};
use crate::config::Config;
use crate::output::{to_pretty_json, write_records};
use crate::scrapers::{DSpaceScraper, ScrapeEvent};

use super::TargetArgs;

/// Harvest the configured collection and write the results.
pub async fn cmd_scrape(
    mut config: Config,
    target: &TargetArgs,
    output: Option<&str>,
    stdout: bool,
) -> anyhow::Result<()> {
    target.apply(&mut config);
    if let Some(output) = output {
        config.output = output.to_string();
    }

    let listing_url = config.listing_url()?;
    let driver = launch_browser(&config.browser).await?;
    let scraper = DSpaceScraper::new(driver, listing_url.as_str(), config.scrape_settings());

    println!(
        "{} Loading collection list: {}",
        style("→").cyan(),
        listing_url
    );

    let spinner = collection_spinner(format!(
        "Collecting up to {} item links...",
        config.max_items
    ));
    let mut progress: Option<ProgressBar> = None;

    let records = scraper
        .scrape_with(|event| match event {
            ScrapeEvent::LinksCollected(urls) => {
                spinner.finish_and_clear();
                println!(
                    "{} Found {} papers. Extracting metadata...",
                    style("→").cyan(),
                    urls.len()
                );
                progress = Some(extraction_progress(urls.len() as u64));
            }
            ScrapeEvent::RecordExtracted { record, .. } => {
                if let Some(ref pb) = progress {
                    pb.set_message(short_title(&record.title, 60));
                    pb.inc(1);
                }
            }
        })
        .await;

    spinner.finish_and_clear();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let records = records.context("Scraping failed")?;

    println!(
        "{} Scraping completed. Total papers scraped: {}",
        style("✓").green(),
        records.len()
    );

    if stdout {
        let json = to_pretty_json(&records)?;
        println!("{}", String::from_utf8_lossy(&json).trim_end());
        return Ok(());
    }

    let path = config.output_path();
    write_records(&path, &records)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    println!(
        "{} Done! {} items saved to {}",
        style("✓").green(),
        records.len(),
        path.display()
    );

    Ok(())
}

/// Collect and print item links without visiting them.
pub async fn cmd_links(mut config: Config, target: &TargetArgs) -> anyhow::Result<()> {
    target.apply(&mut config);

    let listing_url = config.listing_url()?;
    let driver = launch_browser(&config.browser).await?;
    let scraper = DSpaceScraper::new(driver, listing_url, config.scrape_settings());

    let urls = scraper
        .collect_links()
        .await
        .context("Link collection failed")?;

    for url in &urls {
        println!("{}", url);
    }
    eprintln!("{} {} item links", style("✓").green(), urls.len());

    Ok(())
}
