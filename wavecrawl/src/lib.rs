pub mod handlers;
pub mod server;

// Re-export commonly used items for convenience
pub use handlers::{CrawlRequest, CrawlResponse, RequestError, Status, crawl_handler, decode_request};
pub use server::{AppState, CrawlServer, ServerConfig, create_router, shutdown_signal};
