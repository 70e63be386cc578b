use crate::http::create_client;
use crate::traits::LatestFeed;
use async_trait::async_trait;
use anyhow::{anyhow, Result};
use pawflix_models::FeedPage;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Client for the unofficial latest-movies feed (`/movies/latest/page-{n}.json`).
#[derive(Clone)]
pub struct LatestFeedClient {
    client: Arc<Client>,
    base_url: String,
}

impl LatestFeedClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Arc::new(create_client(None)),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}/movies/latest/page-{}.json", self.base_url, page)
    }
}

#[async_trait]
impl LatestFeed for LatestFeedClient {
    async fn get_page(&self, page: u32) -> Result<FeedPage> {
        let url = self.page_url(page);
        debug!(url = %url, "Fetching feed page");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch feed page {}: {}", page, response.status()));
        }
        Ok(response.json().await?)
    }

    /// True only for a 200 carrying a non-empty `result` array.
    async fn page_exists(&self, page: u32) -> bool {
        let url = self.page_url(page);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(page, error = %e, "Feed probe failed");
                return false;
            }
        };
        if response.status() != StatusCode::OK {
            return false;
        }
        match response.json::<FeedPage>().await {
            Ok(body) => !body.result.is_empty(),
            Err(_) => false,
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("{} returned {}", url, response.status()));
        }
        Ok(response.json().await?)
    }

    async fn head_status(&self, url: &str) -> Result<u16> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let client = LatestFeedClient::new("https://feed.test/".to_string());
        assert_eq!(client.page_url(7), "https://feed.test/movies/latest/page-7.json");
    }
}
