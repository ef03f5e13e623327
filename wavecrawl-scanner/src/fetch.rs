use crate::error::{Result, ScanError};
use reqwest::Client;
use scraper::{Html, Selector};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Source of the raw hrefs found on a page.
///
/// Implementations return every anchor `href` verbatim. Filtering and
/// canonicalization happen later, in the normalizer.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Fetches pages over HTTP with one client shared by every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wavecrawl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(50) // Connection pooling
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<String>> {
        let target = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", target);
        let start = Instant::now();
        let response = self.client.get(target).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let links = extract_links(&body);
        debug!(
            "Fetched {} ({}) in {:?}: {} links",
            url,
            status.as_u16(),
            start.elapsed(),
            links.len()
        );
        Ok(links)
    }
}

/// Extract every anchor `href` from `html`, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
