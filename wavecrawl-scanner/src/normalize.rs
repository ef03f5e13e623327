use std::collections::HashSet;
use url::Url;

/// Path fragments that mark a link as something other than a crawlable page.
const REJECTED_MARKERS: [&str; 4] = ["mailto:", "tel:", "javascript:", "window."];

/// Rewrites discovered links onto a single site.
///
/// Every link that survives normalization is `https`, lives on the domain's
/// host and port, and carries neither a query string nor a fragment.
#[derive(Debug, Clone)]
pub struct Normalizer {
    root: Url,
}

impl Normalizer {
    /// Builds a normalizer for `domain`. Returns `None` when the domain is not
    /// an absolute URL with a host, or cannot be served over https.
    pub fn new(domain: &str) -> Option<Self> {
        let mut root = Url::parse(domain).ok()?;
        root.host_str()?;
        root.set_scheme("https").ok()?;
        root.set_username("").ok()?;
        root.set_password(None).ok()?;
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        Some(Self { root })
    }

    /// Normalizes a single raw link. `None` means the link could not be parsed.
    pub fn normalize(&self, raw_link: &str) -> Option<String> {
        let link = match Url::parse(raw_link) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.root.join(raw_link).ok()?,
            Err(_) => return None,
        };

        // Opaque links (mailto:, tel:, javascript:) have no hierarchical path
        let mut path = if link.cannot_be_a_base() { "" } else { link.path() };
        if is_rejectable(path) {
            path = "/";
        }

        if let Some(host) = link.host_str()
            && (Some(host) != self.root.host_str() || link.port() != self.root.port())
        {
            path = "/";
        }

        let mut normalized = self.root.clone();
        normalized.set_path(path);
        Some(normalized.into())
    }

    /// Normalizes every link and collapses the result to a set. Invalid links
    /// are dropped.
    pub fn unique<I>(&self, links: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        links
            .into_iter()
            .filter_map(|link| self.normalize(link.as_ref()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect()
    }
}

fn is_rejectable(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }

    let has_extension = path
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'));

    has_extension || REJECTED_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Normalize `raw_link` against `domain`.
pub fn normalize(domain: &str, raw_link: &str) -> Option<String> {
    Normalizer::new(domain)?.normalize(raw_link)
}

/// Normalize and deduplicate `links` against `domain`. Output order is unspecified.
pub fn unique<I>(domain: &str, links: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    match Normalizer::new(domain) {
        Some(normalizer) => normalizer.unique(links),
        None => Vec::new(),
    }
}
