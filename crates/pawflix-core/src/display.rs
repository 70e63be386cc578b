use crate::category::derive_category_with;
use chrono::Datelike;
use pawflix_models::{genre_label, CatalogItem, DisplayCategory, MediaType};
use serde::Serialize;

pub const PLACEHOLDER_POSTER: &str = "https://placehold.co/500x750/1e293b/ffffff?text=No+Image";
pub const DEFAULT_IMAGE_SIZE: &str = "w500";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Builds poster and backdrop URLs against the image CDN.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{size}{path}`, or the placeholder when there is no path.
    pub fn url(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base_url, size, path),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        self.url(path, DEFAULT_IMAGE_SIZE)
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

pub fn display_year(item: &CatalogItem) -> i32 {
    item.release_year().unwrap_or_else(current_year)
}

pub fn rating_label(vote_average: f64) -> String {
    if vote_average > 0.0 {
        format!("{:.1}", vote_average)
    } else {
        "N/A".to_string()
    }
}

/// First three known genres, joined for a card subtitle.
pub fn genre_labels(genre_ids: &[u32]) -> String {
    genre_ids
        .iter()
        .take(3)
        .filter_map(|id| genre_label(*id))
        .collect::<Vec<_>>()
        .join(" • ")
}

/// What a result card shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Card {
    pub id: u64,
    pub title: String,
    pub year: i32,
    pub rating: String,
    pub genres: String,
    pub category: DisplayCategory,
    pub media_type: MediaType,
    pub poster_url: String,
}

impl Card {
    /// `fallback_media` applies to listings whose items carry no `media_type`.
    pub fn from_item(item: &CatalogItem, fallback_media: MediaType, images: &ImageUrls) -> Self {
        let media_type = item
            .media_type
            .and_then(|kind| kind.media_type())
            .unwrap_or(fallback_media);

        Self {
            id: item.id,
            title: item.display_title().to_string(),
            year: display_year(item),
            rating: rating_label(item.vote_average),
            genres: genre_labels(&item.genre_ids),
            category: derive_category_with(item, Some(media_type)),
            media_type,
            poster_url: images.poster(item.poster_path.as_deref()),
        }
    }
}
