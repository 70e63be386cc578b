use crate::error::CatalogError;
use crate::http::create_client;
use crate::tmdb::filters::{movies_and_tv, with_posters, with_posters_vec};
use crate::traits::Catalog;
use async_trait::async_trait;
use pawflix_models::{CatalogItem, CatalogPage, MovieDetails, SeasonDetails, TvDetails, ANIMATION_GENRE_ID};
use reqwest::{Client, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<CatalogItem>,
}

/// Catalog endpoints with their fixed query parameters.
#[derive(Debug, Clone, Copy)]
enum Endpoint<'a> {
    TrendingToday,
    TrendingWeek,
    Popular(u32),
    TopRated(u32),
    Upcoming(u32),
    SearchMovies(&'a str, u32),
    SearchMulti(&'a str, u32),
    WebSeries(u32),
    Dramas(u32),
    Anime(u32),
    Genre(u32, u32),
    MovieDetails(u64),
    TvDetails(u64),
    TvSeason(u64, u32),
    FindByImdb(&'a str),
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

fn popularity() -> (&'static str, String) {
    ("sort_by", "popularity.desc".to_string())
}

impl Endpoint<'_> {
    fn path(&self) -> String {
        match self {
            Endpoint::TrendingToday => "/trending/movie/day".to_string(),
            Endpoint::TrendingWeek => "/trending/movie/week".to_string(),
            Endpoint::Popular(_) => "/movie/popular".to_string(),
            Endpoint::TopRated(_) => "/movie/top_rated".to_string(),
            Endpoint::Upcoming(_) => "/movie/upcoming".to_string(),
            Endpoint::SearchMovies(..) => "/search/movie".to_string(),
            Endpoint::SearchMulti(..) => "/search/multi".to_string(),
            Endpoint::WebSeries(_) => "/tv/popular".to_string(),
            Endpoint::Dramas(_) | Endpoint::Anime(_) => "/discover/tv".to_string(),
            Endpoint::Genre(..) => "/discover/movie".to_string(),
            Endpoint::MovieDetails(id) => format!("/movie/{}", id),
            Endpoint::TvDetails(id) => format!("/tv/{}", id),
            Endpoint::TvSeason(id, season) => format!("/tv/{}/season/{}", id, season),
            Endpoint::FindByImdb(imdb_id) => format!("/find/{}", imdb_id),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Endpoint::TrendingToday | Endpoint::TrendingWeek => Vec::new(),
            Endpoint::TvDetails(_) | Endpoint::TvSeason(..) => Vec::new(),
            Endpoint::Popular(page)
            | Endpoint::TopRated(page)
            | Endpoint::Upcoming(page)
            | Endpoint::WebSeries(page) => vec![page_param(page)],
            Endpoint::SearchMovies(query, page) | Endpoint::SearchMulti(query, page) => {
                vec![("query", query.to_string()), page_param(page)]
            }
            Endpoint::Dramas(page) => vec![
                page_param(page),
                ("with_original_language", "ko".to_string()),
                popularity(),
            ],
            Endpoint::Anime(page) => vec![
                page_param(page),
                ("with_genres", ANIMATION_GENRE_ID.to_string()),
                ("with_original_language", "ja".to_string()),
                popularity(),
            ],
            Endpoint::Genre(genre_id, page) => vec![
                page_param(page),
                ("with_genres", genre_id.to_string()),
                popularity(),
            ],
            Endpoint::MovieDetails(_) => {
                vec![("append_to_response", "credits,similar,videos".to_string())]
            }
            Endpoint::FindByImdb(_) => vec![("external_source", "imdb_id".to_string())],
        }
    }
}

/// Error for a non-success status; the body's `status_message` is preferred
/// over the raw body.
fn status_error(status: StatusCode, body: &str) -> CatalogError {
    if status == StatusCode::NOT_FOUND {
        return CatalogError::NotFound;
    }
    let message = serde_json::from_str::<TmdbErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or_else(|| body.to_string());
    CatalogError::Api {
        status: status.as_u16(),
        message,
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Option<Duration>) -> Self {
        Self {
            client: Arc::new(create_client(timeout)),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_request(&self, endpoint: &Endpoint<'_>) -> Result<Request, CatalogError> {
        if self.api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }

        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut query = vec![("api_key", self.api_key.clone())];
        query.extend(endpoint.params());

        Ok(self.client.get(&url).query(&query).build()?)
    }

    async fn get_json<T>(&self, endpoint: Endpoint<'_>) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let request = self.build_request(&endpoint)?;
        debug!(endpoint = ?endpoint, "Catalog request");

        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn get_page(&self, endpoint: Endpoint<'_>) -> Result<CatalogPage, CatalogError> {
        let page: CatalogPage = self.get_json(endpoint).await?;
        debug!(page = page.page, results = page.results.len(), total_pages = page.total_pages, "Catalog page");
        Ok(page)
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn trending_today(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let page = self.get_page(Endpoint::TrendingToday).await?;
        Ok(with_posters_vec(page.results))
    }

    async fn trending_week(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let page = self.get_page(Endpoint::TrendingWeek).await?;
        Ok(with_posters_vec(page.results))
    }

    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::Popular(page)).await.map(with_posters)
    }

    async fn top_rated_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::TopRated(page)).await.map(with_posters)
    }

    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::Upcoming(page)).await.map(with_posters)
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::SearchMovies(query, page)).await.map(with_posters)
    }

    async fn search_multi(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::SearchMulti(query, page)).await.map(movies_and_tv)
    }

    async fn web_series(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::WebSeries(page)).await.map(with_posters)
    }

    async fn dramas(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::Dramas(page)).await.map(with_posters)
    }

    async fn anime(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::Anime(page)).await.map(with_posters)
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_page(Endpoint::Genre(genre_id, page)).await.map(with_posters)
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.get_json(Endpoint::MovieDetails(id)).await
    }

    async fn tv_details(&self, id: u64) -> Result<TvDetails, CatalogError> {
        self.get_json(Endpoint::TvDetails(id)).await
    }

    async fn tv_season(&self, id: u64, season: u32) -> Result<SeasonDetails, CatalogError> {
        self.get_json(Endpoint::TvSeason(id, season)).await
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let found: FindResponse = self.get_json(Endpoint::FindByImdb(imdb_id)).await?;
        Ok(found.movie_results)
    }
}
