//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod browser;
mod extract;
mod scrape;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::{load_config, Config};

#[derive(Parser)]
#[command(name = "dspace-harvest")]
#[command(about = "Harvest paper metadata from a DSpace repository collection")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Options selecting the collection and browser, overriding the config file.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Repository handle prefix (e.g. https://repositorium.uminho.pt/handle)
    #[arg(long)]
    repository: Option<String>,

    /// Collection handle (e.g. 1822/21293)
    #[arg(long)]
    collection: Option<String>,

    /// Maximum number of items to harvest
    #[arg(short = 'n', long)]
    max_items: Option<usize>,

    /// Chrome/Chromium executable used when none is installed
    #[arg(long, env = "DSPACE_HARVEST_CHROME")]
    chrome: Option<PathBuf>,

    /// Connect to a running browser's DevTools endpoint instead of launching one
    #[arg(long)]
    remote: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

impl TargetArgs {
    /// Overlay these flags onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref repository) = self.repository {
            config.repository_url = repository.clone();
        }
        if let Some(ref collection) = self.collection {
            config.collection = collection.clone();
        }
        if let Some(max_items) = self.max_items {
            config.max_items = max_items;
        }
        if let Some(ref chrome) = self.chrome {
            config.browser.executable = Some(chrome.clone());
        }
        if let Some(ref remote) = self.remote {
            config.browser.remote_url = Some(remote.clone());
        }
        if self.headed {
            config.browser.headless = false;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Collect item links and extract metadata for each, writing JSON results
    Scrape {
        #[command(flatten)]
        target: TargetArgs,

        /// Output file (default: scraper_results.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Print results to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Collect item links only and print them
    Links {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Extract a record from a saved full-view HTML page (no browser needed)
    Extract {
        /// Saved HTML of an item's full metadata view
        file: PathBuf,
    },

    /// Show which Chrome/Chromium executable would be used
    FindBrowser {
        /// Fallback executable to check
        #[arg(long, env = "DSPACE_HARVEST_CHROME")]
        chrome: Option<PathBuf>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .await
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Scrape {
            target,
            output,
            stdout,
        } => scrape::cmd_scrape(config, &target, output.as_deref(), stdout).await,
        Commands::Links { target } => scrape::cmd_links(config, &target).await,
        Commands::Extract { file } => extract::cmd_extract(&config, &file).await,
        Commands::FindBrowser { chrome } => browser::cmd_find_browser(&config, chrome.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_scrape_flags() {
        let cli = Cli::try_parse_from([
            "dspace-harvest",
            "-v",
            "scrape",
            "--collection",
            "1822/99",
            "-n",
            "3",
            "--headed",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert!(cli.verbose);

        let Commands::Scrape { target, output, .. } = cli.command else {
            panic!("expected scrape command");
        };
        assert_eq!(output.as_deref(), Some("out.json"));

        let mut config = Config::default();
        target.apply(&mut config);
        assert_eq!(config.collection, "1822/99");
        assert_eq!(config.max_items, 3);
        assert!(!config.browser.headless);
        assert_eq!(config.repository_url, crate::config::DEFAULT_REPOSITORY_URL);
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["dspace-harvest", "crawl"]).is_err());
    }
}
