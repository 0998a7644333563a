//! Static HTML snapshot driver.
//!
//! Serves pre-recorded documents instead of driving a browser. Each URL maps to
//! one or more snapshots; clicking a `aria-label="Next"` control swaps in the
//! following snapshot, which is how the client-side pagination of the listing
//! pages is modelled. Clicking "Next" on the last snapshot is a navigation
//! error. Used by the offline `extract` command and by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{BrowserError, BrowserResult, Driver, PageElement};

#[derive(Debug, Default)]
struct SnapshotState {
    routes: HashMap<String, Vec<Arc<str>>>,
    /// Current URL and index of the snapshot being shown.
    current: Option<(String, usize)>,
    visited: Vec<String>,
    clicks: usize,
    closed: bool,
}

impl SnapshotState {
    fn current_source(&self) -> BrowserResult<Arc<str>> {
        let (url, index) = self.current.as_ref().ok_or(BrowserError::NoPage)?;
        self.routes
            .get(url)
            .and_then(|pages| pages.get(*index))
            .cloned()
            .ok_or(BrowserError::NoPage)
    }
}

/// Driver over in-memory HTML documents.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDriver {
    state: Arc<Mutex<SnapshotState>>,
}

impl SnapshotDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single document for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_pages(url, [html])
    }

    /// Register a sequence of documents for `url`, advanced by clicking "Next".
    pub fn with_pages<I, S>(self, url: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|p| {
                let html: String = p.into();
                Arc::<str>::from(html)
            })
            .collect();
        self.lock().routes.insert(url.into(), pages);
        self
    }

    /// Register the contents of an HTML file for `url`.
    pub fn from_file(url: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::new().with_page(url, html))
    }

    /// URLs passed to `navigate`, in order.
    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    /// Number of clicks dispatched on any element.
    pub fn clicks(&self) -> usize {
        self.lock().clicks
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, SnapshotState> {
        lock_state(&self.state)
    }
}

// A poisoned lock only means a test panicked mid-call; the state is still usable
fn lock_state(state: &Mutex<SnapshotState>) -> MutexGuard<'_, SnapshotState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|_| BrowserError::Selector(selector.to_string()))
}

/// Document-order element indices matching `selector`, optionally scoped to
/// descendants of the element at `scope`.
fn select_indices(source: &str, scope: Option<usize>, selector: &Selector) -> Vec<usize> {
    let html = Html::parse_document(source);
    let all: Vec<ElementRef> = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();
    let positions: HashMap<_, usize> = all.iter().enumerate().map(|(i, e)| (e.id(), i)).collect();

    let matches: Vec<ElementRef> = match scope {
        Some(index) => match all.get(index) {
            Some(root) => root.select(selector).filter(|e| e.id() != root.id()).collect(),
            None => Vec::new(),
        },
        None => html.select(selector).collect(),
    };

    matches
        .iter()
        .filter_map(|e| positions.get(&e.id()).copied())
        .collect()
}

/// Run `f` on the element at `index` of `source`.
fn with_element<T>(source: &str, index: usize, f: impl FnOnce(ElementRef) -> T) -> Option<T> {
    let html = Html::parse_document(source);
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .nth(index)
        .map(f)
}

#[async_trait]
impl Driver for SnapshotDriver {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        let mut state = self.lock();
        state.visited.push(url.to_string());
        if !state.routes.contains_key(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "no snapshot recorded for this URL".to_string(),
            });
        }
        state.current = Some((url.to_string(), 0));
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
        let selector = parse_selector(selector)?;
        let source = self.lock().current_source()?;
        Ok(select_indices(&source, None, &selector)
            .into_iter()
            .map(|index| SnapshotElement {
                source: Arc::clone(&source),
                index,
                state: Arc::clone(&self.state),
            })
            .collect())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        self.lock().closed = true;
        Ok(())
    }
}

/// Element of a snapshot document, addressed by its document-order index.
#[derive(Debug, Clone)]
pub struct SnapshotElement {
    source: Arc<str>,
    index: usize,
    state: Arc<Mutex<SnapshotState>>,
}

#[async_trait]
impl PageElement for SnapshotElement {
    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self>> {
        let selector = parse_selector(selector)?;
        Ok(select_indices(&self.source, Some(self.index), &selector)
            .into_iter()
            .map(|index| SnapshotElement {
                source: Arc::clone(&self.source),
                index,
                state: Arc::clone(&self.state),
            })
            .collect())
    }

    async fn text(&self) -> BrowserResult<String> {
        Ok(
            with_element(&self.source, self.index, |e| e.text().collect::<String>())
                .unwrap_or_default()
                .trim()
                .to_string(),
        )
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        Ok(with_element(&self.source, self.index, |e| {
            e.value().attr(name).map(str::to_string)
        })
        .flatten())
    }

    async fn scroll_into_view(&self) -> BrowserResult<()> {
        Ok(())
    }

    async fn click(&self) -> BrowserResult<()> {
        let is_next = with_element(&self.source, self.index, |e| {
            e.value().attr("aria-label") == Some("Next")
        })
        .unwrap_or(false);

        let mut state = lock_state(&self.state);
        state.clicks += 1;
        if !is_next {
            return Ok(());
        }

        let SnapshotState {
            routes, current, ..
        } = &mut *state;
        let (url, index) = current.as_mut().ok_or(BrowserError::NoPage)?;
        let pages = routes.get(url.as_str()).map_or(0, Vec::len);
        if *index + 1 >= pages {
            return Err(BrowserError::Navigation {
                url: url.clone(),
                message: format!("no snapshot recorded after page {}", *index + 1),
            });
        }
        *index += 1;
        debug!("Snapshot {} advanced to page {}", url, *index + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"<html><body>
        <ul>
          <li class="item"><a class="title" href="/a?x=1"> First </a></li>
          <li class="item"><span>no link</span></li>
          <li class="item"><a class="title" href="/b">Second</a></li>
        </ul>
        <table class="t"><tbody>
          <tr><td>k</td><td> v </td></tr>
        </tbody></table>
        <a aria-label="Next" href="#">next</a>
    </body></html>"##;

    #[tokio::test]
    async fn test_find_all_in_document_order() {
        let driver = SnapshotDriver::new().with_page("http://x/", DOC);
        driver.navigate("http://x/").await.unwrap();

        let items = driver.find_all("li.item").await.unwrap();
        assert_eq!(items.len(), 3);

        let link = items[0].find("a.title").await.unwrap().unwrap();
        assert_eq!(link.text().await.unwrap(), "First");
        assert_eq!(
            link.attribute("href").await.unwrap().as_deref(),
            Some("/a?x=1")
        );
        assert!(items[1].find("a.title").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_table_cells_survive_scoped_queries() {
        let driver = SnapshotDriver::new().with_page("http://x/", DOC);
        driver.navigate("http://x/").await.unwrap();

        let rows = driver.find_all("table.t tbody tr").await.unwrap();
        assert_eq!(rows.len(), 1);
        let cells = rows[0].find_all("td").await.unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].text().await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_unknown_url_fails_navigation() {
        let driver = SnapshotDriver::new();
        let err = driver.navigate("http://missing/").await.unwrap_err();
        assert!(matches!(err, BrowserError::Navigation { .. }));
        assert!(matches!(
            driver.find_all("a").await.unwrap_err(),
            BrowserError::NoPage
        ));
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let driver = SnapshotDriver::new().with_page("http://x/", DOC);
        driver.navigate("http://x/").await.unwrap();
        assert!(matches!(
            driver.find_all("li[").await.unwrap_err(),
            BrowserError::Selector(_)
        ));
    }

    #[tokio::test]
    async fn test_next_click_advances_until_last_page() {
        let driver = SnapshotDriver::new().with_pages(
            "http://x/",
            [
                r#"<p id="one"></p><a aria-label="Next">n</a>"#,
                r#"<p id="two"></p><a aria-label="Next">n</a>"#,
            ],
        );
        driver.navigate("http://x/").await.unwrap();

        let next = driver.find("a[aria-label='Next']").await.unwrap().unwrap();
        next.click().await.unwrap();
        assert!(driver.find("#two").await.unwrap().is_some());

        let next = driver.find("a[aria-label='Next']").await.unwrap().unwrap();
        assert!(matches!(
            next.click().await.unwrap_err(),
            BrowserError::Navigation { .. }
        ));
        assert!(driver.find("#two").await.unwrap().is_some());
        assert_eq!(driver.clicks(), 2);
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let driver = SnapshotDriver::new().with_page("http://x/", DOC);
        driver.navigate("http://x/").await.unwrap();

        driver
            .wait_for("table.t", std::time::Duration::from_millis(10))
            .await
            .unwrap();
        let err = driver
            .wait_for("table.missing", std::time::Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Timeout { .. }));
    }
}
