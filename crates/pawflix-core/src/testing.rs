//! In-memory source fakes shared by the unit tests.

use async_trait::async_trait;
use pawflix_models::{CatalogItem, CatalogPage, MovieDetails, SeasonDetails, TvDetails};
use pawflix_sources::{Catalog, CatalogError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub(crate) fn movie(id: u64, title: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: Some(title.to_string()),
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: Some("1999-10-15".to_string()),
        vote_average: 8.4,
        ..Default::default()
    }
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub items: Vec<CatalogItem>,
    pub total_pages: u32,
    pub failing: HashSet<&'static str>,
    pub imdb: HashMap<String, Vec<CatalogItem>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            total_pages: 1,
            ..Default::default()
        }
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, detail: String) -> Result<(), CatalogError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}{}", operation, detail));
        if self.failing.contains(operation) {
            return Err(CatalogError::Api {
                status: 500,
                message: format!("{} unavailable", operation),
            });
        }
        Ok(())
    }

    fn page(&self, operation: &'static str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.record(operation, format!(":{}", page))?;
        Ok(CatalogPage {
            page,
            results: self.items.clone(),
            total_pages: self.total_pages,
            total_results: self.items.len() as u32,
        })
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn trending_today(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record("trending_today", String::new())?;
        Ok(self.items.clone())
    }

    async fn trending_week(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record("trending_week", String::new())?;
        Ok(self.items.clone())
    }

    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("popular_movies", page)
    }

    async fn top_rated_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("top_rated_movies", page)
    }

    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("upcoming_movies", page)
    }

    async fn search_movies(&self, _query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("search_movies", page)
    }

    async fn search_multi(&self, _query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("search_multi", page)
    }

    async fn web_series(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("web_series", page)
    }

    async fn dramas(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("dramas", page)
    }

    async fn anime(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.page("anime", page)
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<CatalogPage, CatalogError> {
        self.record("discover_by_genre", format!(":{}", genre_id))?;
        self.page("discover_page", page)
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.record("movie_details", format!(":{}", id))?;
        serde_json::from_value(serde_json::json!({"id": id, "title": "Fight Club", "runtime": 139}))
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn tv_details(&self, id: u64) -> Result<TvDetails, CatalogError> {
        self.record("tv_details", format!(":{}", id))?;
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Breaking Bad",
            "number_of_seasons": 2,
            "seasons": [
                {"season_number": 1, "episode_count": 7, "name": "Season 1"},
                {"season_number": 2, "episode_count": 13, "name": "Season 2"}
            ]
        }))
        .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn tv_season(&self, id: u64, season: u32) -> Result<SeasonDetails, CatalogError> {
        self.record("tv_season", format!(":{}:{}", id, season))?;
        serde_json::from_value(serde_json::json!({
            "season_number": season,
            "name": format!("Season {}", season),
            "episodes": [{"episode_number": 1, "name": "Pilot"}]
        }))
        .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record("find_by_imdb_id", format!(":{}", imdb_id))?;
        Ok(self.imdb.get(imdb_id).cloned().unwrap_or_default())
    }
}
