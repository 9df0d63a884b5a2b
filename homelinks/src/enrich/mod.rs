//! Best-effort title and icon lookup for new bookmarks
//!
//! Enrichment never fails: any network or parse problem resolves to the
//! URL host as title and the first icon service as icon.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

pub mod http;
pub mod http_client;

pub use http::HttpEnricher;

/// Result of looking up a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub icon_url: String,
}

/// Title and icon lookup for a URL
#[allow(async_fn_in_trait)]
pub trait Enricher: Send + Sync {
    /// Look up the page title and an icon, falling back on failure
    async fn page_info(&self, url: &Url) -> PageInfo;

    /// Find a reachable icon for the URL host
    async fn find_icon(&self, url: &Url) -> String;
}

/// Enricher that never touches the network
#[derive(Debug, Clone)]
pub struct OfflineEnricher {
    icon_sources: Vec<String>,
}

impl OfflineEnricher {
    pub fn new(icon_sources: Vec<String>) -> Self {
        Self { icon_sources }
    }
}

impl Default for OfflineEnricher {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_ICON_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl Enricher for OfflineEnricher {
    async fn page_info(&self, url: &Url) -> PageInfo {
        fallback_page_info(url, &self.icon_sources)
    }

    async fn find_icon(&self, url: &Url) -> String {
        default_icon(url, &self.icon_sources)
    }
}

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("valid title pattern")
});

/// Extract the trimmed contents of the first `<title>` element
pub fn extract_title(html: &str) -> Option<String> {
    let title = TITLE_RE.captures(html)?.get(1)?.as_str().trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Expand an icon service template for `domain`
pub fn icon_source_url(template: &str, domain: &str) -> String {
    template.replace("{domain}", domain)
}

pub(crate) fn host_label(url: &Url) -> String {
    url.host_str()
        .map(str::to_string)
        .unwrap_or_else(|| url.as_str().to_string())
}

/// Icon from the first configured service, empty when none are configured
pub fn default_icon(url: &Url, icon_sources: &[String]) -> String {
    icon_sources
        .first()
        .map(|template| icon_source_url(template, &host_label(url)))
        .unwrap_or_default()
}

/// Host as title and the first icon service as icon
pub fn fallback_page_info(url: &Url, icon_sources: &[String]) -> PageInfo {
    PageInfo {
        title: host_label(url),
        icon_url: default_icon(url, icon_sources),
    }
}
