//! Browser discovery command.

use std::path::Path;

use console::style;

use crate::browser::discovery::find_chrome_executable;
use crate::config::Config;

/// Report the executable the scraper would launch.
pub fn cmd_find_browser(config: &Config, chrome: Option<&Path>) -> anyhow::Result<()> {
    let fallback = chrome.or(config.browser.executable.as_deref());

    match find_chrome_executable(fallback) {
        Some(path) => println!("{} {}", style("✓").green(), path.display()),
        None => {
            println!(
                "{} Chrome/Chromium not found; the launcher will try its own default lookup",
                style("!").yellow()
            );
            println!("  Install Chrome or Chromium, or pass --chrome <PATH>");
        }
    }

    Ok(())
}
