use anyhow::Context;
use axum::{Router, routing::post};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use wavecrawl_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use wavecrawl_scanner::{HttpFetcher, PageFetcher};

use crate::handlers::crawl_handler;

pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Timeout applied by the shared HTTP client to every page fetch.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Application state shared across handlers
pub struct AppState<F> {
    pub fetcher: Arc<F>,
}

impl<F> AppState<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
        }
    }
}

pub fn create_router<F: PageFetcher>(state: AppState<F>) -> Router {
    Router::new()
        .route("/", post(crawl_handler::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct CrawlServer {
    pub app: Router,
    pub addr: SocketAddr,
}

impl CrawlServer {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::with_timeout(config.timeout_secs)
            .context("failed to build HTTP client")?;
        Ok(Self::with_fetcher(config.bind, fetcher))
    }

    pub fn with_fetcher<F: PageFetcher>(addr: SocketAddr, fetcher: F) -> Self {
        Self {
            app: create_router(AppState::new(fetcher)),
            addr,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server shutdown")
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
