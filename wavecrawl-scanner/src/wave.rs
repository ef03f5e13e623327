use crate::error::{Result, ScanError};
use crate::fetch::PageFetcher;
use crate::result::LinkSet;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Fetch every URL concurrently and collect all the hrefs they contain.
///
/// One task is spawned per URL with no cap on fan-out. The call returns once
/// every task has finished. A failed fetch contributes no links and never
/// affects the other tasks. The returned set has `normalized_links` empty.
pub async fn scan<F: PageFetcher>(fetcher: Arc<F>, domain: &str, urls: &[String]) -> LinkSet {
    let raw_links: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| {
            let fetcher = fetcher.clone();
            let raw_links = raw_links.clone();

            tokio::spawn(async move {
                let links = fetcher.fetch(&url).await.inspect_err(|e| {
                    debug!("Fetch failed for {}: {}", url, e);
                })?;
                let found = links.len();
                raw_links.lock().await.extend(links);
                Ok::<_, ScanError>(found)
            })
        })
        .collect();

    let mut link_set = LinkSet::new(domain);
    for outcome in join_all(handles).await {
        match flatten(outcome) {
            Ok(_) => link_set.fetched += 1,
            Err(ScanError::JoinError(e)) => {
                debug!("Fetch task did not complete: {}", e);
                link_set.failed += 1;
            }
            Err(_) => link_set.failed += 1,
        }
    }

    link_set.raw_links = std::mem::take(&mut *raw_links.lock().await);
    link_set
}

fn flatten(outcome: std::result::Result<Result<usize>, tokio::task::JoinError>) -> Result<usize> {
    outcome?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory site: URL -> hrefs on that page. Unknown URLs fail.
    struct StaticSite {
        pages: HashMap<String, Vec<String>>,
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StaticSite {
        fn new(pages: Vec<(&str, Vec<&str>)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, links)| {
                        (url.to_string(), links.into_iter().map(str::to_string).collect())
                    })
                    .collect(),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl PageFetcher for StaticSite {
        async fn fetch(&self, url: &str) -> Result<Vec<String>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScanError::Other(format!("no page at {}", url)))
        }
    }

    /// Panics on `/boom`, serves a single link everywhere else.
    struct PanickingSite;

    impl PageFetcher for PanickingSite {
        async fn fetch(&self, url: &str) -> Result<Vec<String>> {
            if url.ends_with("/boom") {
                panic!("fetcher blew up");
            }
            Ok(vec!["/survivor".to_string()])
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scan_aggregates_links_from_every_page() {
        let site = Arc::new(StaticSite::new(vec![
            ("https://example.com/a", vec!["/x", "/y"]),
            ("https://example.com/b", vec!["/y", "/z"]),
        ]));

        let mut links = scan(
            site,
            "https://example.com",
            &urls(&["https://example.com/a", "https://example.com/b"]),
        )
        .await;

        let mut raw = links.raw_links.clone();
        raw.sort();
        assert_eq!(raw, vec!["/x", "/y", "/y", "/z"]);
        assert!(links.normalized_links.is_empty());
        assert_eq!(links.unique().len(), 3);
        assert_eq!(links.fetched, 2);
        assert_eq!(links.failed, 0);
    }

    #[tokio::test]
    async fn test_scan_isolates_fetch_failures() {
        let site = Arc::new(StaticSite::new(vec![
            ("https://example.com/ok1", vec!["/from-ok1"]),
            ("https://example.com/ok2", vec!["/from-ok2"]),
        ]));

        let links = scan(
            site,
            "https://example.com",
            &urls(&[
                "https://example.com/ok1",
                "https://example.com/gone1",
                "https://example.com/ok2",
                "https://example.com/gone2",
                "https://example.com/gone3",
            ]),
        )
        .await;

        let mut raw = links.raw_links.clone();
        raw.sort();
        assert_eq!(raw, vec!["/from-ok1", "/from-ok2"]);
        assert_eq!(links.fetched, 2);
        assert_eq!(links.failed, 3);
    }

    #[tokio::test]
    async fn test_scan_runs_all_fetches_concurrently() {
        let inputs: Vec<String> = (0..8)
            .map(|i| format!("https://example.com/p{}", i))
            .collect();
        let pages = inputs.iter().map(|url| (url.as_str(), vec!["/next"])).collect();
        let site = Arc::new(StaticSite::new(pages).with_delay(Duration::from_millis(50)));

        let links = scan(site.clone(), "https://example.com", &inputs).await;

        assert_eq!(links.raw_links.len(), 8);
        assert_eq!(site.peak.load(Ordering::SeqCst), 8);
        assert_eq!(site.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scan_survives_a_panicking_task() {
        let links = scan(
            Arc::new(PanickingSite),
            "https://example.com",
            &urls(&["https://example.com/boom", "https://example.com/fine"]),
        )
        .await;

        assert_eq!(links.raw_links, vec!["/survivor"]);
        assert_eq!(links.fetched, 1);
        assert_eq!(links.failed, 1);
    }

    #[tokio::test]
    async fn test_scan_empty_input_fetches_nothing() {
        let site = Arc::new(StaticSite::new(vec![]));
        let links = scan(site, "https://example.com", &[]).await;

        assert!(links.raw_links.is_empty());
        assert_eq!(links.fetched + links.failed, 0);
        assert_eq!(links.domain, "https://example.com");
    }
}
