use crate::normalize::unique;

/// The links gathered by one wave of fetches.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    pub domain: String,
    /// Every href seen during the wave, repeats included, in no particular order.
    pub raw_links: Vec<String>,
    /// Derived from `raw_links` by [`LinkSet::unique`].
    pub normalized_links: Vec<String>,
    pub fetched: usize,
    pub failed: usize,
}

impl LinkSet {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_raw_links(domain: impl Into<String>, raw_links: Vec<String>) -> Self {
        Self {
            domain: domain.into(),
            raw_links,
            ..Self::default()
        }
    }

    /// Recomputes `normalized_links` from `raw_links` and returns it.
    pub fn unique(&mut self) -> &[String] {
        self.normalized_links = unique(&self.domain, &self.raw_links);
        &self.normalized_links
    }
}
