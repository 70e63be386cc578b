use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub const TMDB_API_KEY_ENV: &str = "PAWFLIX_TMDB_API_KEY";
pub const IDENTITY_API_KEY_ENV: &str = "PAWFLIX_IDENTITY_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Third-party catalog API (TMDB v3).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// The catalog refuses pages past 500; paged views clamp to this.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Hosted identity provider REST endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdentityConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerConfig {
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,
}

/// Unofficial latest-movies feed used by the maintenance tools.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    #[serde(default = "default_feed_pages")]
    pub pages: u32,
}

/// `level` is the filter used without `-v`; `RUST_LOG` still wins.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<PathBuf>,
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_max_pages() -> u32 {
    500
}

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1/token".to_string()
}

fn default_embed_base_url() -> String {
    "https://rivestream.org/embed".to_string()
}

fn default_feed_base_url() -> String {
    "https://vidsrc-embed.ru".to_string()
}

fn default_feed_pages() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            max_pages: default_max_pages(),
            timeout_secs: None,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_identity_base_url(),
            token_url: default_token_url(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            embed_base_url: default_embed_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            pages: default_feed_pages(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when present, defaults otherwise, then apply
    /// environment overrides.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(TMDB_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.catalog.api_key = key.trim().to_string();
            }
        }
        if let Ok(key) = std::env::var(IDENTITY_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.identity.api_key = key.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.catalog.image_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.image_base_url cannot be empty"));
        }
        if self.catalog.max_pages == 0 {
            return Err(anyhow::anyhow!("catalog.max_pages must be at least 1"));
        }
        if self.identity.base_url.trim().is_empty() || self.identity.token_url.trim().is_empty() {
            return Err(anyhow::anyhow!("identity endpoints cannot be empty"));
        }
        if self.player.embed_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("player.embed_base_url cannot be empty"));
        }
        if self.feed.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("feed.base_url cannot be empty"));
        }
        Ok(())
    }

    pub fn is_catalog_configured(&self) -> bool {
        !self.catalog.api_key.is_empty() && self.catalog.api_key != "YOUR_API_KEY"
    }

    pub fn is_identity_configured(&self) -> bool {
        !self.identity.api_key.is_empty() && self.identity.api_key != "YOUR_API_KEY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.catalog.api_key = "tmdb_key".to_string();
        config.identity.api_key = "identity_key".to_string();
        config.feed.pages = 5;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.api_key, "tmdb_key");
        assert_eq!(loaded.identity.api_key, "identity_key");
        assert_eq!(loaded.feed.pages, 5);
        assert_eq!(loaded.catalog.max_pages, 500);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[catalog]\napi_key = \"abc\"\n").unwrap();

        let loaded = Config::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(loaded.catalog.api_key, "abc");
        assert_eq!(loaded.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(loaded.player.embed_base_url, "https://rivestream.org/embed");
        assert!(loaded.logging.is_none());
    }

    #[test]
    fn test_logging_level_defaults_to_info() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[logging]\nfile = \"/tmp/pawflix.log\"\n").unwrap();

        let loaded = Config::load_from_file(&file.path().to_path_buf()).unwrap();
        let logging = loaded.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.file, Some(PathBuf::from("/tmp/pawflix.log")));
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_catalog_configured());

        config.catalog.max_pages = 0;
        assert!(config.validate().is_err());

        config.catalog.max_pages = 500;
        config.player.embed_base_url = " ".to_string();
        assert!(config.validate().is_err());

        config.player.embed_base_url = "https://player.test/embed".to_string();
        config.catalog.api_key = "YOUR_API_KEY".to_string();
        assert!(config.validate().is_ok());
        assert!(!config.is_catalog_configured());

        config.catalog.api_key = "real".to_string();
        assert!(config.is_catalog_configured());
    }
}
