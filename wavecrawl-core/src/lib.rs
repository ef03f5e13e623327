pub mod crawl;

pub use crawl::{CrawlReport, CrawlTarget, WAVE_COUNT, WaveSummary, execute_crawl};
