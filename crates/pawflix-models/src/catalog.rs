use crate::media::MediaType;
use serde::{Deserialize, Serialize};

/// `media_type` as the catalog reports it on mixed result sets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Movie,
    Tv,
    Person,
    #[serde(other)]
    Other,
}

impl ResultKind {
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            ResultKind::Movie => Some(MediaType::Movie),
            ResultKind::Tv => Some(MediaType::Tv),
            ResultKind::Person | ResultKind::Other => None,
        }
    }
}

/// A single catalog result. Movies carry `title`/`release_date`,
/// TV titles carry `name`/`first_air_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<ResultKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<Vec<String>>,
}

impl CatalogItem {
    /// `title`, then `name`, then "Unknown".
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or("Unknown")
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Release or first-air date, whichever the item carries.
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.first_air_date.as_deref().filter(|d| !d.is_empty()))
    }

    pub fn release_year(&self) -> Option<i32> {
        self.date()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }

    pub fn is_from(&self, country: &str) -> bool {
        self.origin_country
            .as_ref()
            .is_some_and(|c| c.iter().any(|code| code.eq_ignore_ascii_case(country)))
    }
}

/// One page of a paginated catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl CatalogPage {
    /// Keep only results matching `keep`, preserving the paging counters.
    pub fn retain(mut self, keep: impl Fn(&CatalogItem) -> bool) -> Self {
        self.results.retain(|item| keep(item));
        self
    }

    /// Page count capped at `max_pages` (the catalog never serves past 500).
    pub fn clamped_total_pages(&self, max_pages: u32) -> u32 {
        self.total_pages.min(max_pages).max(1)
    }
}
