//! Browser engine configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the scraper drive the page.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable, used when none is found in the
    /// default install locations (e.g. a portable Chrome for Testing build).
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// DevTools request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Viewport width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Viewport height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            executable: None,
            timeout: default_timeout(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserEngineConfig {
    /// Whether the session attaches to an existing browser instead of owning
    /// one. Closing a remote session must leave that browser running.
    pub fn is_remote(&self) -> bool {
        self.remote_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Command-line arguments passed to a launched Chrome, extras last.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5 + self.chrome_args.len());
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.push(format!(
            "--window-size={},{}",
            self.window_width, self.window_height
        ));
        args.push("--disable-gpu".to_string());
        // Needed for headless Chrome in containers/restricted environments
        args.push("--no-sandbox".to_string());
        args.push("--disable-dev-shm-usage".to_string());
        args.extend(self.chrome_args.iter().cloned());
        args
    }
}

fn default_headless() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}
