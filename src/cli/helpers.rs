//! Shared helper functions for CLI commands.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::browser::{BrowserEngineConfig, ChromeDriver};

/// Progress bar for per-item extraction.
pub fn extraction_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Spinner shown while the listing is paginated.
pub fn collection_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Launch Chrome with a readable error for the terminal.
pub async fn launch_browser(config: &BrowserEngineConfig) -> anyhow::Result<ChromeDriver> {
    ChromeDriver::launch(config).await.map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nChrome/Chromium is required. Install it, or point --chrome at a \
             Chrome for Testing build: https://googlechromelabs.github.io/chrome-for-testing/",
            e
        )
    })
}

/// Truncate a title for single-line display.
pub fn short_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let truncated: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", truncated)
}
