use once_cell::sync::Lazy;
use std::sync::Arc;
use timely_mcp::services::credentials::TokenSession;
use timely_mcp::services::logger::Logger;
use timely_mcp::services::timely::TimelyClient;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Client pointed at a mock server with a pre-seeded token, so no broker
/// traffic happens unless a test is exercising the session itself.
#[allow(dead_code)]
pub fn seeded_client(base_url: &str) -> Arc<TimelyClient> {
    let logger = Logger::new("test");
    let http = reqwest::Client::new();
    let session = Arc::new(TokenSession::with_token(
        logger.child("nango"),
        http.clone(),
        "test-token",
    ));
    Arc::new(TimelyClient::new(logger, http, session, base_url))
}
