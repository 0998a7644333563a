//! End-to-end harvest over static snapshots: listing, item pages, output file.

use dspace_harvest::browser::SnapshotDriver;
use dspace_harvest::output::{read_records, write_records};
use dspace_harvest::scrapers::{DSpaceScraper, ScrapeEvent, ScrapeSettings};
use dspace_harvest::{Record, ScrapeError};

const LISTING: &str = "https://repo.test/handle/1822/21293";

fn listing(items: &[&str], next: bool) -> String {
    let links: String = items
        .iter()
        .map(|href| {
            format!(
                "<ds-listable-object-component-loader>\
                 <a class=\"item-list-title\" href=\"{href}\">x</a>\
                 </ds-listable-object-component-loader>"
            )
        })
        .collect();
    let pagination = if next {
        "<ul><li class=\"page-item\"><a aria-label=\"Next\">&gt;</a></li></ul>"
    } else {
        ""
    };
    format!("<html><body>{links}{pagination}</body></html>")
}

fn item_page(title: &str, authors: &[&str]) -> String {
    let mut rows = format!("<tr><td>dc.title</td><td>{title}</td></tr>");
    for author in authors {
        rows.push_str(&format!(
            "<tr><td>dc.contributor.author</td><td>{author}</td></tr>"
        ));
    }
    format!("<html><body><table class=\"table-striped\"><tbody>{rows}</tbody></table></body></html>")
}

fn fixture() -> SnapshotDriver {
    SnapshotDriver::new()
        .with_pages(
            LISTING,
            [
                listing(&["/items/one?show=full", "/items/two"], true),
                listing(&["/items/three"], false),
            ],
        )
        .with_page(
            "https://repo.test/items/one/full",
            item_page("Primeiro", &["Author A", "Author B"]),
        )
        .with_page("https://repo.test/items/two/full", item_page("Segundo", &[]))
        // items/three has no recorded page and falls back to defaults
}

#[tokio::test]
async fn test_scrape_collects_records_in_discovery_order() {
    let driver = fixture();
    let handle = driver.clone();

    let records = DSpaceScraper::new(driver, LISTING, ScrapeSettings::immediate(10))
        .scrape()
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title, "Primeiro");
    assert_eq!(records[0].authors, vec!["Author A", "Author B"]);
    assert_eq!(records[1].title, "Segundo");
    assert!(records[1].authors.is_empty());
    assert_eq!(records[2], Record::default());

    assert!(handle.is_closed());
    assert_eq!(
        &handle.visited()[1..],
        &[
            "https://repo.test/items/one/full",
            "https://repo.test/items/two/full",
            "https://repo.test/items/three/full",
        ]
    );
}

#[tokio::test]
async fn test_scrape_respects_cap() {
    let driver = fixture();
    let handle = driver.clone();

    let records = DSpaceScraper::new(driver, LISTING, ScrapeSettings::immediate(1))
        .scrape()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(handle.visited().len(), 2);
}

#[tokio::test]
async fn test_session_released_on_failure() {
    let driver = SnapshotDriver::new().with_page(LISTING, "<html><body></body></html>");
    let handle = driver.clone();

    let err = DSpaceScraper::new(driver, LISTING, ScrapeSettings::immediate(10))
        .scrape()
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::ListingNotFound { .. }));
    assert!(handle.is_closed());
}

#[tokio::test]
async fn test_collect_links_releases_session() {
    let driver = fixture();
    let handle = driver.clone();

    let urls = DSpaceScraper::new(driver, LISTING, ScrapeSettings::immediate(10))
        .collect_links()
        .await
        .unwrap();

    assert_eq!(urls.len(), 3);
    assert!(handle.is_closed());
}

#[tokio::test]
async fn test_events_report_progress() {
    let mut collected = 0;
    let mut extracted = Vec::new();

    DSpaceScraper::new(fixture(), LISTING, ScrapeSettings::immediate(10))
        .scrape_with(|event| match event {
            ScrapeEvent::LinksCollected(urls) => collected = urls.len(),
            ScrapeEvent::RecordExtracted { index, url, .. } => {
                extracted.push((index, url.to_string()))
            }
        })
        .await
        .unwrap();

    assert_eq!(collected, 3);
    assert_eq!(extracted[0], (0, "https://repo.test/items/one".to_string()));
    assert_eq!(extracted.len(), 3);
}

#[tokio::test]
async fn test_results_file_roundtrip() {
    let records = DSpaceScraper::new(fixture(), LISTING, ScrapeSettings::immediate(10))
        .scrape()
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scraper_results.json");
    write_records(&path, &records).unwrap();

    assert_eq!(read_records(&path).unwrap(), records);
}
