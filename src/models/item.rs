//! Item URL handling.

use std::collections::HashSet;

/// Suffix that switches a DSpace item page to its full metadata view.
const FULL_VIEW_SUFFIX: &str = "/full";

/// Drop the query string (everything from the first `?`).
pub fn canonical_item_url(href: &str) -> &str {
    href.split_once('?').map_or(href, |(base, _)| base)
}

/// URL of the full metadata view for an item.
pub fn full_view_url(item_url: &str) -> String {
    format!("{}{}", item_url.trim_end_matches('/'), FULL_VIEW_SUFFIX)
}

/// Ordered set of canonical item URLs with an upper bound on its size.
#[derive(Debug, Clone)]
pub struct ItemUrls {
    urls: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl ItemUrls {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            urls: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Add the canonical form of `href`. Returns false for duplicates and when
    /// the cap has already been reached.
    pub fn insert(&mut self, href: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let url = canonical_item_url(href);
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    pub fn is_full(&self) -> bool {
        self.urls.len() >= self.cap
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
