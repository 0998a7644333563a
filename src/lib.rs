//! dspace-harvest - paper metadata harvester for DSpace repositories.
//!
//! Drives a headless browser through a collection's client-rendered listing,
//! follows each item to its full metadata view and extracts title, date, DOI,
//! abstract and authors into [`models::Record`]s.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod scrapers;

pub use error::{ScrapeError, ScrapeResult};
pub use models::Record;
