//! Configuration management for dspace-harvest using the prefer crate.
//!
//! Precedence, lowest first: built-in defaults, the config file (explicit
//! `--config` path or auto-discovered), environment overrides, CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::discovery::CHROME_ENV;
use crate::browser::BrowserEngineConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::scrapers::ScrapeSettings;

/// Name used for config file discovery.
pub const CONFIG_NAME: &str = "dspace-harvest";

/// Default repository handle prefix (UMinho RepositoriUM, DSpace 8).
pub const DEFAULT_REPOSITORY_URL: &str = "https://repositorium.uminho.pt/handle";

/// Default collection handle.
pub const DEFAULT_COLLECTION: &str = "1822/21293";

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "scraper_results.json";

/// Harvester configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Handle prefix of the repository, e.g. `https://host/handle`.
    #[serde(default = "default_repository_url")]
    pub repository_url: String,
    /// Collection handle appended to `repository_url`.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Maximum number of items to harvest.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Where the JSON results are written.
    #[serde(default = "default_output")]
    pub output: String,
    /// Pause after navigation for client-side rendering, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Extra pause after clicking the next-page control, in milliseconds.
    #[serde(default = "default_click_settle_ms")]
    pub click_settle_ms: u64,
    /// Bound on element-presence waits, in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    /// Browser launch settings.
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_repository_url() -> String {
    DEFAULT_REPOSITORY_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_max_items() -> usize {
    10
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_settle_ms() -> u64 {
    500
}

fn default_click_settle_ms() -> u64 {
    1000
}

fn default_wait_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            collection: default_collection(),
            max_items: default_max_items(),
            output: default_output(),
            settle_ms: default_settle_ms(),
            click_settle_ms: default_click_settle_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
            browser: BrowserEngineConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no config file is found or it fails to parse.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default().with_env_overrides()
                        }
                    }
                } else {
                    Self::default().with_env_overrides()
                }
            }
            Err(_) => Self::default().with_env_overrides(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(chrome) = std::env::var_os(CHROME_ENV).filter(|v| !v.is_empty()) {
            self.browser.executable = Some(PathBuf::from(chrome));
        }
        self
    }

    /// Directory of the config file, used for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved against the config file's directory, or
    ///   left relative to the working directory when there is no config file
    pub fn resolve_path(&self, path_str: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        match self.base_dir() {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Resolved output file path.
    pub fn output_path(&self) -> PathBuf {
        self.resolve_path(&self.output)
    }

    /// Listing page of the configured collection.
    pub fn listing_url(&self) -> ScrapeResult<String> {
        let raw = format!(
            "{}/{}",
            self.repository_url.trim_end_matches('/'),
            self.collection.trim_matches('/')
        );
        let parsed = url::Url::parse(&raw).map_err(|e| ScrapeError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed.to_string()),
            other => Err(ScrapeError::InvalidUrl {
                url: raw,
                message: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Timing and cap settings for the scrapers.
    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            max_items: self.max_items,
            settle: Duration::from_millis(self.settle_ms),
            click_settle: Duration::from_millis(self.click_settle_ms),
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
        }
    }
}

/// Load from an explicit path, or auto-discover.
///
/// An explicit path that cannot be read or parsed is an error; a discovered
/// one is only warned about.
pub async fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            tracing::debug!("Loading config from {}", expanded.display());
            Config::load_from_path(&expanded).await
        }
        None => Ok(Config::load().await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_items, 10);
        assert_eq!(config.output, "scraper_results.json");
        assert_eq!(
            config.listing_url().unwrap(),
            "https://repositorium.uminho.pt/handle/1822/21293"
        );

        let settings = config.scrape_settings();
        assert_eq!(settings.settle, Duration::from_millis(500));
        assert_eq!(settings.click_settle, Duration::from_millis(1000));
        assert_eq!(settings.wait_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_listing_url_joins_without_double_slash() {
        let config = Config {
            repository_url: "https://repo.example.org/handle/".to_string(),
            collection: "/123/456/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.listing_url().unwrap(),
            "https://repo.example.org/handle/123/456"
        );
    }

    #[test]
    fn test_listing_url_rejects_bad_scheme() {
        let config = Config {
            repository_url: "ftp://repo.example.org/handle".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.listing_url(),
            Err(ScrapeError::InvalidUrl { .. })
        ));

        let config = Config {
            repository_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.listing_url().is_err());
    }

    #[test]
    fn test_parse_formats() {
        let toml = r#"
            collection = "1822/1"
            max_items = 3

            [browser]
            headless = false
        "#;
        let config = Config::parse(toml, "toml").unwrap();
        assert_eq!(config.collection, "1822/1");
        assert_eq!(config.max_items, 3);
        assert!(!config.browser.headless);
        assert_eq!(config.settle_ms, 500);

        let yaml = "max_items: 7\nsettle_ms: 0\n";
        let config = Config::parse(yaml, "yml").unwrap();
        assert_eq!(config.max_items, 7);
        assert_eq!(config.settle_ms, 0);

        let config = Config::parse(r#"{"output": "out.json"}"#, "conf").unwrap();
        assert_eq!(config.output, "out.json");
        assert_eq!(config.collection, DEFAULT_COLLECTION);

        assert!(Config::parse("max_items = \"many\"", "toml").is_err());
    }

    #[tokio::test]
    async fn test_load_from_path_resolves_output_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dspace-harvest.toml");
        std::fs::write(&path, "output = \"results/papers.json\"\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.output_path(),
            dir.path().join("results/papers.json")
        );
    }

    #[tokio::test]
    async fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).await.is_err());
    }
}
