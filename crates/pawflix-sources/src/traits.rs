use crate::error::{CatalogError, IdentityError};
use crate::identity::{AccountInfo, AuthTokens};
use async_trait::async_trait;
use pawflix_models::{CatalogItem, CatalogPage, FeedPage, MovieDetails, SeasonDetails, TvDetails};

/// Read-only access to the movie/TV catalog.
///
/// Listing operations drop results without a poster; the paging counters
/// of the response are kept as reported.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn trending_today(&self) -> Result<Vec<CatalogItem>, CatalogError>;
    async fn trending_week(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn top_rated_movies(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError>;

    async fn search_movies(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError>;
    /// Movies and TV only; people are dropped.
    async fn search_multi(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError>;

    async fn web_series(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    /// Korean TV by popularity.
    async fn dramas(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    /// Japanese animated TV by popularity.
    async fn anime(&self, page: u32) -> Result<CatalogPage, CatalogError>;
    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError>;

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError>;
    async fn tv_details(&self, id: u64) -> Result<TvDetails, CatalogError>;
    async fn tv_season(&self, id: u64, season: u32) -> Result<SeasonDetails, CatalogError>;

    /// Movie results for an IMDb id.
    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Hosted email/password identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError>;
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError>;
    async fn lookup(&self, id_token: &str) -> Result<AccountInfo, IdentityError>;
    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<(), IdentityError>;
    async fn send_email_verification(&self, id_token: &str) -> Result<(), IdentityError>;
    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError>;
}

/// The unofficial latest-movies feed probed by the maintenance tools.
#[async_trait]
pub trait LatestFeed: Send + Sync {
    async fn get_page(&self, page: u32) -> anyhow::Result<FeedPage>;
    async fn page_exists(&self, page: u32) -> bool;
    async fn fetch_json(&self, url: &str) -> anyhow::Result<serde_json::Value>;
    /// HTTP status of a HEAD request.
    async fn head_status(&self, url: &str) -> anyhow::Result<u16>;
}
