//! Chrome DevTools driver backed by chromiumoxide.

#[cfg(feature = "browser")]
use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

#[cfg(feature = "browser")]
use chromiumoxide::element::Element;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};

use super::config::BrowserEngineConfig;
#[cfg(feature = "browser")]
use super::discovery::find_chrome_executable;
#[cfg(feature = "browser")]
use super::PageElement;
use super::{BrowserError, BrowserResult, Driver};

/// Scrolls `this` to the vertical center of the viewport.
#[cfg(feature = "browser")]
const SCROLL_INTO_VIEW_FN: &str = "function() { this.scrollIntoView({block: 'center'}); }";

#[cfg(feature = "browser")]
fn protocol(e: chromiumoxide::error::CdpError) -> BrowserError {
    BrowserError::Protocol(e.to_string())
}

/// A single-page Chrome session.
///
/// A launched browser process is killed when the driver is dropped;
/// [`Driver::close`] shuts it down gracefully. A remote browser is never shut
/// down, only the page this driver opened is closed.
#[cfg(feature = "browser")]
pub struct ChromeDriver {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    remote: bool,
}

#[cfg(feature = "browser")]
impl ChromeDriver {
    /// Launch a browser (or connect to `remote_url`) and open a blank page.
    pub async fn launch(config: &BrowserEngineConfig) -> BrowserResult<Self> {
        let (browser, mut handler) = match config.remote_url {
            Some(ref remote_url) if config.is_remote() => {
                Self::connect_remote(remote_url, config).await?
            }
            _ => Self::launch_local(config).await?,
        };

        // The CDP event loop must be polled for any command to complete
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(format!("could not open page: {}", e)));
            }
        };

        Ok(Self {
            browser: Some(browser),
            page,
            handler,
            remote: config.is_remote(),
        })
    }

    async fn launch_local(
        config: &BrowserEngineConfig,
    ) -> BrowserResult<(Browser, chromiumoxide::Handler)> {
        info!("Launching browser (headless={})", config.headless);

        // Headless mode is passed explicitly as --headless=new
        let mut builder = BrowserConfig::builder()
            .with_head()
            .request_timeout(Duration::from_secs(config.timeout));

        if let Some(path) = find_chrome_executable(config.executable.as_deref()) {
            builder = builder.chrome_executable(path);
        }

        for arg in config.launch_args() {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("invalid browser config: {}", e)))?;

        Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))
    }

    async fn connect_remote(
        url: &str,
        config: &BrowserEngineConfig,
    ) -> BrowserResult<(Browser, chromiumoxide::Handler)> {
        info!(
            "Connecting to remote browser at {} (timeout: {}s)",
            url, config.timeout
        );

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(config.timeout),
            ..Default::default()
        };

        Browser::connect_with_config(url, handler_config)
            .await
            .map_err(|e| BrowserError::Launch(format!("remote browser: {}", e)))
    }
}

#[cfg(feature = "browser")]
impl Drop for ChromeDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl Driver for ChromeDriver {
    type Element = ChromeElement;

    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<ChromeElement>> {
        let elements = self.page.find_elements(selector).await.map_err(protocol)?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        if self.remote {
            // Browser.close would terminate the shared remote instance
            debug!("Closing page on remote browser");
            if let Err(e) = self.page.clone().close().await {
                warn!("Page did not close cleanly: {}", e);
            }
        } else {
            debug!("Closing browser");
            if let Err(e) = browser.close().await {
                warn!("Browser did not close cleanly: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed waiting for browser exit: {}", e);
            }
        }

        drop(browser);
        self.handler.abort();
        Ok(())
    }
}

/// Element handle inside a [`ChromeDriver`] page.
#[cfg(feature = "browser")]
pub struct ChromeElement(Element);

#[cfg(feature = "browser")]
#[async_trait]
impl PageElement for ChromeElement {
    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self>> {
        let elements = self.0.find_elements(selector).await.map_err(protocol)?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    async fn text(&self) -> BrowserResult<String> {
        let text = self.0.inner_text().await.map_err(protocol)?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        self.0.attribute(name).await.map_err(protocol)
    }

    async fn scroll_into_view(&self) -> BrowserResult<()> {
        self.0
            .call_js_fn(SCROLL_INTO_VIEW_FN, false)
            .await
            .map_err(protocol)?;
        Ok(())
    }

    async fn click(&self) -> BrowserResult<()> {
        self.0.click().await.map_err(protocol)?;
        Ok(())
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromeDriver;

#[cfg(not(feature = "browser"))]
impl ChromeDriver {
    pub async fn launch(_config: &BrowserEngineConfig) -> BrowserResult<Self> {
        Err(BrowserError::Unavailable)
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl Driver for ChromeDriver {
    type Element = super::SnapshotElement;

    async fn navigate(&self, _url: &str) -> BrowserResult<()> {
        Err(BrowserError::Unavailable)
    }

    async fn find_all(&self, _selector: &str) -> BrowserResult<Vec<Self::Element>> {
        Err(BrowserError::Unavailable)
    }

    async fn close(&mut self) -> BrowserResult<()> {
        Ok(())
    }
}
