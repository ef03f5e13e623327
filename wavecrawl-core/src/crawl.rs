use std::sync::Arc;
use tracing::info;
use wavecrawl_scanner::{PageFetcher, scan, unique};

/// Number of sequential waves every crawl runs.
pub const WAVE_COUNT: usize = 3;

/// What a single crawl request points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Authority every discovered link is re-anchored on.
    pub domain: String,
    /// First page fetched.
    pub seed_url: String,
}

impl CrawlTarget {
    /// The seed of a request-driven crawl is always the domain itself.
    pub fn from_domain(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            seed_url: domain.clone(),
            domain,
        }
    }
}

/// Counters for one wave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveSummary {
    pub wave: usize,
    pub inputs: usize,
    pub fetched: usize,
    pub failed: usize,
    pub raw_links: usize,
    pub unique_links: usize,
}

#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub domain: String,
    /// Unique normalized URLs discovered across all waves, unordered.
    pub urls: Vec<String>,
    pub waves: Vec<WaveSummary>,
}

impl CrawlReport {
    pub fn total(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Run the fixed three-wave crawl for `target`.
///
/// Wave 0 fetches the seed. Each later wave fetches the unique set the
/// previous wave produced. No visited set is carried between waves, so a page
/// can be fetched again by a later wave. The final URL set deduplicates the
/// raw links of every wave together.
pub async fn execute_crawl<F: PageFetcher>(fetcher: Arc<F>, target: &CrawlTarget) -> CrawlReport {
    info!("Starting crawl of {}", target.domain);

    let mut inputs = vec![target.seed_url.clone()];
    let mut raw_links = Vec::new();
    let mut waves = Vec::with_capacity(WAVE_COUNT);

    for wave in 0..WAVE_COUNT {
        let mut link_set = scan(fetcher.clone(), &target.domain, &inputs).await;
        let next_inputs = link_set.unique().to_vec();

        let summary = WaveSummary {
            wave,
            inputs: inputs.len(),
            fetched: link_set.fetched,
            failed: link_set.failed,
            raw_links: link_set.raw_links.len(),
            unique_links: next_inputs.len(),
        };
        info!(
            "Wave {} complete: {} fetched, {} failed, {} links ({} unique)",
            summary.wave, summary.fetched, summary.failed, summary.raw_links, summary.unique_links
        );
        waves.push(summary);

        raw_links.append(&mut link_set.raw_links);
        inputs = next_inputs;
    }

    let urls = unique(&target.domain, &raw_links);
    info!("Crawl of {} complete. Discovered {} URLs", target.domain, urls.len());

    CrawlReport {
        domain: target.domain.clone(),
        urls,
        waves,
    }
}
