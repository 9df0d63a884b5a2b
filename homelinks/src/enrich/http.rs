//! Network enrichment through a page proxy and public icon services
//!
//! The page is fetched with `GET {proxy}?url=<page>`, which must answer
//! `{"contents": "<html>"}`. Icon services are probed one after another
//! with `HEAD`; the first successful answer wins and the first service is
//! used when none answer.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http_client::create_shared_client;
use super::{Enricher, PageInfo, default_icon, extract_title, host_label, icon_source_url};
use crate::config::EnrichmentConfig;

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    contents: Option<String>,
}

/// Enricher backed by HTTP requests
pub struct HttpEnricher {
    client: Arc<Client>,
    proxy_url: String,
    icon_sources: Vec<String>,
    timeout: Duration,
}

impl HttpEnricher {
    pub fn new(config: &EnrichmentConfig) -> anyhow::Result<Self> {
        let client = create_shared_client(config.timeout())?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Arc<Client>, config: &EnrichmentConfig) -> Self {
        Self {
            client,
            proxy_url: config.proxy_url.clone(),
            icon_sources: config.icon_sources.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn http_client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    async fn fetch_title(&self, url: &Url) -> anyhow::Result<String> {
        let proxy = Url::parse_with_params(&self.proxy_url, &[("url", url.as_str())])?;
        let response = tokio::time::timeout(self.timeout, self.client.get(proxy).send())
            .await
            .map_err(|_| anyhow::anyhow!("page request timed out"))??;

        if !response.status().is_success() {
            anyhow::bail!("page proxy returned {}", response.status());
        }

        let body: ProxyResponse = response.json().await?;
        let title = body
            .contents
            .as_deref()
            .and_then(extract_title)
            .unwrap_or_else(|| host_label(url));
        Ok(title)
    }

    async fn probe_icon(&self, candidate: &str) -> bool {
        let Ok(candidate_url) = Url::parse(candidate) else {
            return false;
        };
        match tokio::time::timeout(self.timeout, self.client.head(candidate_url).send()).await {
            Ok(Ok(response)) if response.status().is_success() => true,
            Ok(Ok(response)) => {
                tracing::debug!("Icon source {candidate} returned {}", response.status());
                false
            }
            Ok(Err(e)) => {
                tracing::debug!("Icon source {candidate} failed: {e}");
                false
            }
            Err(_) => {
                tracing::debug!("Icon source {candidate} timed out");
                false
            }
        }
    }
}

impl Enricher for HttpEnricher {
    async fn page_info(&self, url: &Url) -> PageInfo {
        tracing::info!("Fetching page info for {url}");
        match self.fetch_title(url).await {
            Ok(title) => {
                let icon_url = self.find_icon(url).await;
                tracing::info!("Fetched page info: {title}");
                PageInfo { title, icon_url }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch page info for {url}: {e}");
                super::fallback_page_info(url, &self.icon_sources)
            }
        }
    }

    async fn find_icon(&self, url: &Url) -> String {
        let domain = host_label(url);
        for template in &self.icon_sources {
            let candidate = icon_source_url(template, &domain);
            if self.probe_icon(&candidate).await {
                return candidate;
            }
        }
        default_icon(url, &self.icon_sources)
    }
}
