use pawflix_models::{CatalogItem, CatalogPage, MediaType, MovieDetails, SeasonDetails, TvDetails};
use pawflix_sources::{Catalog, CatalogError};
use serde::Serialize;
use tracing::{debug, warn};

/// Cards shown on the home page.
pub const HOME_TRENDING_LIMIT: usize = 12;

/// The three sections of the movies page. A section whose fetch failed is
/// empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MovieSections {
    pub popular: Vec<CatalogItem>,
    pub top_rated: Vec<CatalogItem>,
    pub upcoming: Vec<CatalogItem>,
}

impl MovieSections {
    pub fn is_empty(&self) -> bool {
        self.popular.is_empty() && self.top_rated.is_empty() && self.upcoming.is_empty()
    }
}

fn section(name: &str, result: Result<CatalogPage, CatalogError>) -> Vec<CatalogItem> {
    match result {
        Ok(page) => {
            debug!("{} section: {} items", name, page.results.len());
            page.results
        }
        Err(e) => {
            warn!("Failed to load {} movies: {}", name, e);
            Vec::new()
        }
    }
}

/// Fetch popular, top rated and upcoming concurrently. Failures are
/// isolated per section.
pub async fn browse_movies(catalog: &dyn Catalog) -> MovieSections {
    let (popular, top_rated, upcoming) = tokio::join!(
        catalog.popular_movies(1),
        catalog.top_rated_movies(1),
        catalog.upcoming_movies(1),
    );

    MovieSections {
        popular: section("popular", popular),
        top_rated: section("top rated", top_rated),
        upcoming: section("upcoming", upcoming),
    }
}

/// This week's trending movies, capped at `limit`.
pub async fn home_trending(catalog: &dyn Catalog, limit: usize) -> Result<Vec<CatalogItem>, CatalogError> {
    let mut items = catalog.trending_week().await?;
    items.truncate(limit);
    Ok(items)
}

pub async fn trending(catalog: &dyn Catalog, today: bool) -> Result<Vec<CatalogItem>, CatalogError> {
    if today {
        catalog.trending_today().await
    } else {
        catalog.trending_week().await
    }
}

/// A paged catalog view.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Popular,
    TopRated,
    Upcoming,
    WebSeries,
    Dramas,
    Anime,
    Genre(u32),
    Search { query: String, multi: bool },
}

impl Listing {
    /// Media type assumed for results that do not report one.
    pub fn media_type(&self) -> MediaType {
        match self {
            Listing::WebSeries | Listing::Dramas | Listing::Anime => MediaType::Tv,
            _ => MediaType::Movie,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Listing::Popular => "Popular Movies".to_string(),
            Listing::TopRated => "Top Rated Movies".to_string(),
            Listing::Upcoming => "Upcoming Movies".to_string(),
            Listing::WebSeries => "Web Series".to_string(),
            Listing::Dramas => "K-Dramas".to_string(),
            Listing::Anime => "Anime".to_string(),
            Listing::Genre(id) => pawflix_models::genre_name(*id)
                .map(|name| format!("{} Movies", name))
                .unwrap_or_else(|| format!("Genre {}", id)),
            Listing::Search { query, .. } => format!("Results for \"{}\"", query),
        }
    }
}

/// Fetch one page of `listing`. The requested page is clamped into
/// `1..=max_pages` and the reported page count is capped at `max_pages`.
/// A blank search query yields an empty page without a request.
pub async fn fetch_listing(
    catalog: &dyn Catalog,
    listing: &Listing,
    page: u32,
    max_pages: u32,
) -> Result<CatalogPage, CatalogError> {
    let page = page.clamp(1, max_pages.max(1));
    debug!(?listing, page, "Fetching listing");

    let mut result = match listing {
        Listing::Popular => catalog.popular_movies(page).await?,
        Listing::TopRated => catalog.top_rated_movies(page).await?,
        Listing::Upcoming => catalog.upcoming_movies(page).await?,
        Listing::WebSeries => catalog.web_series(page).await?,
        Listing::Dramas => catalog.dramas(page).await?,
        Listing::Anime => catalog.anime(page).await?,
        Listing::Genre(id) => catalog.discover_by_genre(*id, page).await?,
        Listing::Search { query, multi } => {
            let query = query.trim();
            if query.is_empty() {
                return Ok(CatalogPage {
                    page: 1,
                    ..Default::default()
                });
            }
            if *multi {
                catalog.search_multi(query, page).await?
            } else {
                catalog.search_movies(query, page).await?
            }
        }
    };

    result.total_pages = result.clamped_total_pages(max_pages);
    Ok(result)
}

/// Everything the detail page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum Details {
    Movie(MovieDetails),
    Tv {
        show: TvDetails,
        season: Option<SeasonDetails>,
    },
}

/// Load details for `id`. For TV the selected season (default 1) is
/// fetched too; a failed season fetch leaves `season` empty.
pub async fn load_details(
    catalog: &dyn Catalog,
    media_type: MediaType,
    id: u64,
    season: Option<u32>,
) -> Result<Details, CatalogError> {
    match media_type {
        MediaType::Movie => Ok(Details::Movie(catalog.movie_details(id).await?)),
        MediaType::Tv => {
            let show = catalog.tv_details(id).await?;
            let number = season.unwrap_or(1);
            let season = match catalog.tv_season(id, number).await {
                Ok(season) => Some(season),
                Err(e) => {
                    warn!("Failed to load season {} of {}: {}", number, id, e);
                    None
                }
            };
            Ok(Details::Tv { show, season })
        }
    }
}
