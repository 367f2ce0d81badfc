use std::time::Duration;

use reqwest::Client;

/// Browser-like User-Agent sent to the image host; the site refuses
/// obviously scripted requests.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout applied to every outbound HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared client used for page fetches and image downloads.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}
