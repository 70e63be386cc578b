use crate::display::{current_year, ImageUrls};
use anyhow::{Context, Result};
use futures::future::join_all;
use pawflix_models::{FeedEntry, LatestMovie};
use pawflix_sources::{Catalog, LatestFeed};
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const BAKE_FALLBACK_YEAR: i32 = 2024;
pub const BACKFILL_BATCH_SIZE: usize = 5;
pub const BACKFILL_PAUSE: Duration = Duration::from_millis(200);
pub const PAGE_LIMIT_CHECKPOINTS: [u32; 3] = [100, 500, 1000];

const PLACEHOLDER_BASE: &str = "https://placehold.co/600x900/1e293b/38bdf8?text=";
const NO_DESCRIPTION: &str = "No description available.";
const PAGE_LIMIT_CEILING: u32 = 1000;

/// Split a trailing ` YYYY` off a feed title.
pub fn strip_title_year(title: &str) -> (&str, Option<i32>) {
    if let Some((idx, ws)) = title.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        let tail = &title[idx + ws.len_utf8()..];
        if tail.len() == 4 && tail.bytes().all(|b| b.is_ascii_digit()) {
            return (&title[..idx], tail.parse().ok());
        }
    }
    (title, None)
}

/// First run of four digits anywhere in `text`.
pub fn first_year_in(text: &str) -> Option<i32> {
    text.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|s| s.parse().ok())
}

/// Characters URI-component encoding leaves as-is but `urlencoding` escapes.
const URI_COMPONENT_UNRESERVED: [(&str, &str); 5] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

pub fn placeholder_image(title: &str) -> String {
    let mut encoded = urlencoding::encode(title).into_owned();
    for (escaped, raw) in URI_COMPONENT_UNRESERVED {
        encoded = encoded.replace(escaped, raw);
    }
    format!("{}{}", PLACEHOLDER_BASE, encoded)
}

/// Nine lowercase base-36 characters.
fn random_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn entry_id(entry: &FeedEntry) -> String {
    entry
        .imdb_id
        .clone()
        .or_else(|| entry.tmdb_id.clone())
        .unwrap_or_else(random_id)
}

/// Map a feed entry into the baked catalog record. The title is kept
/// verbatim; the year is the first four-digit run in it.
pub fn bake_entry(entry: &FeedEntry) -> LatestMovie {
    LatestMovie {
        id: entry_id(entry),
        title: entry.title.clone(),
        image: placeholder_image(&entry.title),
        rating: 0.0,
        year: first_year_in(&entry.title).unwrap_or(BAKE_FALLBACK_YEAR),
        category: "Movie".to_string(),
        embed_url: None,
        description: NO_DESCRIPTION.to_string(),
    }
}

/// Map a feed entry for live display: the trailing year moves out of the
/// title and the embed URL is kept.
pub fn to_display_movie(entry: &FeedEntry) -> LatestMovie {
    let (title, year) = strip_title_year(&entry.title);
    LatestMovie {
        id: entry_id(entry),
        title: title.to_string(),
        image: placeholder_image(title),
        rating: 0.0,
        year: year.unwrap_or_else(current_year),
        category: "Movie".to_string(),
        embed_url: entry.embed_url.clone(),
        description: NO_DESCRIPTION.to_string(),
    }
}

/// Outcome of probing how deep the feed goes.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PageLimitReport {
    /// Pages 1, 2, 4, ... that existed before the first miss.
    pub existing: Vec<u32>,
    pub checkpoints: Vec<(u32, bool)>,
}

impl PageLimitReport {
    pub fn deepest(&self) -> Option<u32> {
        self.existing.last().copied()
    }
}

/// Double the page number while pages exist (giving up past 1000), then
/// check the fixed checkpoints.
pub async fn find_page_limit(feed: &dyn LatestFeed) -> PageLimitReport {
    let mut report = PageLimitReport::default();

    let mut page = 1;
    while feed.page_exists(page).await {
        debug!(page, "Feed page exists");
        report.existing.push(page);
        if page > PAGE_LIMIT_CEILING {
            break;
        }
        page *= 2;
    }

    for checkpoint in PAGE_LIMIT_CHECKPOINTS {
        let exists = feed.page_exists(checkpoint).await;
        report.checkpoints.push((checkpoint, exists));
    }

    report
}

/// Fetch pages `1..=pages` one after another and bake every entry. Failed
/// pages are logged and skipped; `on_page` sees each page's outcome.
pub async fn bake_latest(
    feed: &dyn LatestFeed,
    pages: u32,
    mut on_page: impl FnMut(u32, Result<usize, &anyhow::Error>),
) -> Vec<LatestMovie> {
    let mut movies = Vec::new();

    for page in 1..=pages {
        match feed.get_page(page).await {
            Ok(body) => {
                on_page(page, Ok(body.result.len()));
                movies.extend(body.result.iter().map(bake_entry));
            }
            Err(e) => {
                warn!("Error fetching page {}: {}", page, e);
                on_page(page, Err(&e));
            }
        }
    }

    info!("Baked {} movies from {} pages", movies.len(), pages);
    movies
}

pub fn write_baked(path: &Path, movies: &[LatestMovie]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(movies)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} movies to {}", movies.len(), path.display());
    Ok(())
}

pub fn read_baked(path: &Path) -> Result<Vec<LatestMovie>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Malformed movie file {}", path.display()))
}

/// Poster of the first movie matching an IMDb id.
pub async fn poster_for_imdb(catalog: &dyn Catalog, images: &ImageUrls, imdb_id: &str) -> Option<String> {
    match catalog.find_by_imdb_id(imdb_id).await {
        Ok(results) => results
            .first()
            .and_then(|m| m.poster_path.as_deref())
            .filter(|p| !p.is_empty())
            .map(|p| images.url(Some(p), "w500")),
        Err(e) => {
            debug!(imdb_id, error = %e, "Poster lookup failed");
            None
        }
    }
}

/// Replace placeholder images of entries with IMDb ids by catalog posters,
/// looking up `BACKFILL_BATCH_SIZE` entries at a time. `on_lookup` sees
/// whether each lookup found a poster. Returns the number updated.
pub async fn backfill_posters(
    catalog: &dyn Catalog,
    images: &ImageUrls,
    movies: &mut [LatestMovie],
    mut on_lookup: impl FnMut(bool),
) -> usize {
    let mut updated = 0;

    for batch in movies.chunks_mut(BACKFILL_BATCH_SIZE) {
        let ids: Vec<String> = batch.iter().map(|movie| movie.id.clone()).collect();
        let posters = join_all(ids.iter().map(|id| async move {
            if id.starts_with("tt") {
                Some(poster_for_imdb(catalog, images, id).await)
            } else {
                None
            }
        }))
        .await;

        for (movie, poster) in batch.iter_mut().zip(posters) {
            match poster {
                Some(Some(url)) => {
                    movie.image = url;
                    updated += 1;
                    on_lookup(true);
                }
                Some(None) => on_lookup(false),
                None => {}
            }
        }

        tokio::time::sleep(BACKFILL_PAUSE).await;
    }

    info!("Updated {} images", updated);
    updated
}

/// Shape of the first successful endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EndpointReport {
    pub url: String,
    pub keys: Vec<String>,
    pub sample: Option<serde_json::Value>,
}

fn object_keys(value: &serde_json::Value) -> Vec<String> {
    value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

/// Try each URL in turn and describe the first that answers with JSON:
/// keys of `result[0]`, of `result.items[0]`, or of the top-level object.
pub async fn inspect_endpoints(feed: &dyn LatestFeed, urls: &[String]) -> Option<EndpointReport> {
    for url in urls {
        let body = match feed.fetch_json(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch from {}: {}", url, e);
                continue;
            }
        };

        let result = &body["result"];
        let first = result
            .as_array()
            .and_then(|items| items.first())
            .or_else(|| result["items"].as_array().and_then(|items| items.first()));

        let report = match first {
            Some(first) => EndpointReport {
                url: url.clone(),
                keys: object_keys(first),
                sample: Some(first.clone()),
            },
            None => EndpointReport {
                url: url.clone(),
                keys: object_keys(&body),
                sample: None,
            },
        };
        return Some(report);
    }

    warn!("All endpoints failed");
    None
}

/// HEAD each URL; the first answering 200 wins.
pub async fn probe_image_urls(feed: &dyn LatestFeed, urls: &[String]) -> Option<String> {
    for url in urls {
        match feed.head_status(url).await {
            Ok(200) => return Some(url.clone()),
            Ok(status) => debug!(url = %url, status, "Image probe miss"),
            Err(e) => debug!(url = %url, error = %e, "Image probe failed"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{movie, FakeCatalog};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use pawflix_models::FeedPage;
    use std::collections::{HashMap, HashSet};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeFeed {
        pages: HashMap<u32, FeedPage>,
        live: HashSet<u32>,
        json: HashMap<String, serde_json::Value>,
        heads: HashMap<String, u16>,
    }

    #[async_trait]
    impl LatestFeed for FakeFeed {
        async fn get_page(&self, page: u32) -> anyhow::Result<FeedPage> {
            self.pages
                .get(&page)
                .cloned()
                .ok_or_else(|| anyhow!("page {} returned 404", page))
        }

        async fn page_exists(&self, page: u32) -> bool {
            self.live.contains(&page)
        }

        async fn fetch_json(&self, url: &str) -> anyhow::Result<serde_json::Value> {
            self.json.get(url).cloned().ok_or_else(|| anyhow!("connection refused"))
        }

        async fn head_status(&self, url: &str) -> anyhow::Result<u16> {
            self.heads.get(url).copied().ok_or_else(|| anyhow!("timeout"))
        }
    }

    fn entry(imdb: Option<&str>, tmdb: Option<&str>, title: &str) -> FeedEntry {
        FeedEntry {
            imdb_id: imdb.map(String::from),
            tmdb_id: tmdb.map(String::from),
            title: title.to_string(),
            embed_url: Some("https://embed.test/movie".to_string()),
            quality: Some("HD".to_string()),
        }
    }

    fn baked(id: &str) -> LatestMovie {
        bake_entry(&entry(Some(id), None, "Movie"))
    }

    #[test]
    fn test_title_year_parsing() {
        assert_eq!(strip_title_year("Dune Part Two 2024"), ("Dune Part Two", Some(2024)));
        assert_eq!(strip_title_year("Blade Runner 2049 Remastered"), ("Blade Runner 2049 Remastered", None));
        assert_eq!(first_year_in("Blade Runner 2049 Remastered"), Some(2049));
        assert_eq!(first_year_in("No Year"), None);
        assert_eq!(strip_title_year("Anora\t2024"), ("Anora", Some(2024)));
        assert_eq!(strip_title_year("Flow\u{a0}2024"), ("Flow", Some(2024)));
        assert_eq!(strip_title_year("1917"), ("1917", None));
    }

    #[test]
    fn test_placeholder_image_matches_uri_component_encoding() {
        assert_eq!(
            placeholder_image("Don't Look Up (2021)!"),
            "https://placehold.co/600x900/1e293b/38bdf8?text=Don't%20Look%20Up%20(2021)!"
        );
        assert_eq!(
            placeholder_image("M*A*S*H & Co"),
            "https://placehold.co/600x900/1e293b/38bdf8?text=M*A*S*H%20%26%20Co"
        );
        assert_eq!(
            placeholder_image("100%21"),
            "https://placehold.co/600x900/1e293b/38bdf8?text=100%2521"
        );
    }

    #[test]
    fn test_bake_entry_mapping() {
        let movie = bake_entry(&entry(None, Some("1295179"), "The Brutalist 2024"));
        assert_eq!(movie.id, "1295179");
        assert_eq!(movie.title, "The Brutalist 2024");
        assert_eq!(movie.year, 2024);
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.category, "Movie");
        assert_eq!(movie.description, "No description available.");
        assert_eq!(
            movie.image,
            "https://placehold.co/600x900/1e293b/38bdf8?text=The%20Brutalist%202024"
        );

        let anonymous = bake_entry(&entry(None, None, "Untitled"));
        assert_eq!(anonymous.id.len(), 9);
        assert_eq!(anonymous.year, BAKE_FALLBACK_YEAR);
    }

    #[test]
    fn test_display_movie_strips_year() {
        let movie = to_display_movie(&entry(Some("tt23743204"), Some("1"), "Anora 2024"));
        assert_eq!(movie.id, "tt23743204");
        assert_eq!(movie.title, "Anora");
        assert_eq!(movie.year, 2024);
        assert!(movie.embed_url.is_some());

        let undated = to_display_movie(&entry(Some("tt1"), None, "Anora"));
        assert_eq!(undated.year, current_year());
    }

    #[tokio::test]
    async fn test_find_page_limit() {
        let feed = FakeFeed {
            live: (1..=300).collect(),
            ..Default::default()
        };
        let report = find_page_limit(&feed).await;
        assert_eq!(report.existing, vec![1, 2, 4, 8, 16, 32, 64, 128, 256]);
        assert_eq!(report.deepest(), Some(256));
        assert_eq!(report.checkpoints, vec![(100, true), (500, false), (1000, false)]);
    }

    #[tokio::test]
    async fn test_find_page_limit_stops_past_ceiling() {
        let feed = FakeFeed {
            live: (1..=5000).collect(),
            ..Default::default()
        };
        let report = find_page_limit(&feed).await;
        assert_eq!(report.deepest(), Some(1024));
    }

    #[tokio::test]
    async fn test_bake_latest_skips_failed_pages() {
        let mut feed = FakeFeed::default();
        feed.pages.insert(
            1,
            FeedPage {
                result: vec![entry(Some("tt1"), None, "One 2023"), entry(Some("tt2"), None, "Two")],
            },
        );
        feed.pages.insert(3, FeedPage { result: vec![entry(Some("tt3"), None, "Three")] });

        let mut outcomes = Vec::new();
        let movies = bake_latest(&feed, 3, |page, outcome| outcomes.push((page, outcome.ok()))).await;

        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].year, 2023);
        assert_eq!(outcomes, vec![(1, Some(2)), (2, None), (3, Some(1))]);
    }

    #[tokio::test]
    async fn test_baked_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("latest_movies.json");
        let movies = vec![baked("tt1"), baked("tt2")];
        write_baked(&path, &movies).unwrap();
        assert_eq!(read_baked(&path).unwrap(), movies);
    }

    #[tokio::test]
    async fn test_backfill_posters_only_for_imdb_ids() {
        let mut catalog = FakeCatalog::default();
        catalog.imdb.insert("tt1".to_string(), vec![movie(10, "Found")]);

        let mut movies = vec![baked("tt1"), baked("tt2"), baked("1295179")];
        let mut lookups = Vec::new();
        let updated = backfill_posters(&catalog, &ImageUrls::default(), &mut movies, |hit| lookups.push(hit)).await;

        assert_eq!(updated, 1);
        assert_eq!(movies[0].image, "https://image.tmdb.org/t/p/w500/10.jpg");
        assert!(movies[1].image.starts_with(PLACEHOLDER_BASE));
        assert_eq!(lookups.len(), 2);
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_inspect_endpoints_uses_first_success() {
        let mut feed = FakeFeed::default();
        feed.json.insert(
            "https://b.test/new".to_string(),
            serde_json::json!({"result": {"items": [{"imdb_id": "tt1", "title": "One"}]}}),
        );
        let urls = vec!["https://a.test/latest".to_string(), "https://b.test/new".to_string()];

        let report = inspect_endpoints(&feed, &urls).await.unwrap();
        assert_eq!(report.url, "https://b.test/new");
        assert_eq!(report.keys, vec!["imdb_id".to_string(), "title".to_string()]);

        let none = inspect_endpoints(&feed, &urls[..1]).await;
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_probe_image_urls() {
        let mut feed = FakeFeed::default();
        feed.heads.insert("https://a.test/1.jpg".to_string(), 404);
        feed.heads.insert("https://b.test/1.jpg".to_string(), 200);
        let urls = vec![
            "https://down.test/1.jpg".to_string(),
            "https://a.test/1.jpg".to_string(),
            "https://b.test/1.jpg".to_string(),
        ];
        assert_eq!(
            probe_image_urls(&feed, &urls).await.as_deref(),
            Some("https://b.test/1.jpg")
        );
    }
}
