use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use wavecrawl_core::{CrawlTarget, execute_crawl};
use wavecrawl_scanner::PageFetcher;

use crate::server::AppState;

/// Body of a crawl request. `urls` is accepted for compatibility and ignored;
/// the crawl always starts from `domain`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// Envelope returned for every request, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResponse {
    pub domain: String,
    pub urls: Option<Vec<String>>,
    pub error: String,
    pub status: Status,
    pub total: usize,
}

impl CrawlResponse {
    pub fn success(domain: String, urls: Vec<String>) -> Self {
        Self {
            domain,
            total: urls.len(),
            urls: Some(urls),
            error: String::new(),
            status: Status::Success,
        }
    }

    pub fn failure(domain: String, error: String) -> Self {
        Self {
            domain,
            urls: None,
            error,
            status: Status::Error,
            total: 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("No data received")]
    Empty,

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("No urls received")]
    NoUrls { domain: String },
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let domain = match self {
            RequestError::NoUrls { domain } => domain,
            RequestError::Empty | RequestError::Decode(_) => String::new(),
        };

        (
            StatusCode::BAD_REQUEST,
            Json(CrawlResponse::failure(domain, message)),
        )
            .into_response()
    }
}

/// Decode a request body. Blank bodies are reported as [`RequestError::Empty`].
pub fn decode_request(body: &[u8]) -> Result<CrawlRequest, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RequestError::Empty);
    }
    Ok(serde_json::from_slice(body)?)
}

/// `POST /`: crawl the requested domain and return every URL found.
pub async fn crawl_handler<F: PageFetcher>(
    State(state): State<AppState<F>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CrawlResponse>, RequestError> {
    let request = body
        .map_err(|e| {
            warn!("Could not read request body: {}", e);
            RequestError::Empty
        })
        .and_then(|bytes| decode_request(&bytes))
        .inspect_err(|e| warn!("Rejected crawl request: {}", e))?;

    let target = CrawlTarget::from_domain(request.domain);
    let report = execute_crawl(state.fetcher.clone(), &target).await;

    if report.is_empty() {
        warn!("Crawl of {} discovered nothing", target.domain);
        return Err(RequestError::NoUrls {
            domain: target.domain,
        });
    }

    let mut urls = report.urls;
    urls.sort();
    info!("Returning {} URLs for {}", urls.len(), target.domain);

    Ok(Json(CrawlResponse::success(target.domain, urls)))
}
