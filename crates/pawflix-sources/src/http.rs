use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("pawflix/", env!("CARGO_PKG_VERSION"));

/// Shared client builder. No timeout unless one is configured.
pub fn create_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| Client::new())
}
