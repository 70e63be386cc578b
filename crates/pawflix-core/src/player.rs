use pawflix_models::MediaType;

pub const DEFAULT_EMBED_BASE_URL: &str = "https://rivestream.org/embed";

/// Embeddable third-party player URLs.
#[derive(Debug, Clone)]
pub struct Player {
    base_url: String,
}

impl Player {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn movie_url(&self, id: u64) -> String {
        format!("{}?type=movie&id={}", self.base_url, id)
    }

    pub fn episode_url(&self, id: u64, season: u32, episode: u32) -> String {
        format!(
            "{}?type=tv&id={}&season={}&episode={}",
            self.base_url, id, season, episode
        )
    }

    /// Season and episode default to 1 for TV and are ignored for movies.
    pub fn embed_url(
        &self,
        media_type: MediaType,
        id: u64,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> String {
        match media_type {
            MediaType::Movie => self.movie_url(id),
            MediaType::Tv => self.episode_url(id, season.unwrap_or(1), episode.unwrap_or(1)),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_EMBED_BASE_URL)
    }
}
