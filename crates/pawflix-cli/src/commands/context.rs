use color_eyre::eyre::eyre;
use color_eyre::Result;
use pawflix_config::{Config, PathManager, SessionStore};
use pawflix_core::{AccountService, FileStorage, ImageUrls, ListStore, Player};
use pawflix_sources::{IdentityClient, LatestFeedClient, TmdbClient};
use std::time::Duration;

/// Paths and configuration shared by every command.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
        Ok(Self { paths, config })
    }

    pub fn catalog(&self) -> Result<TmdbClient> {
        if !self.config.is_catalog_configured() {
            return Err(eyre!(
                "Catalog API key is not configured. Run 'pawflix config set-tmdb-key' or set {}.",
                pawflix_config::config::TMDB_API_KEY_ENV
            ));
        }
        let catalog = &self.config.catalog;
        Ok(TmdbClient::new(
            catalog.api_key.clone(),
            catalog.base_url.clone(),
            catalog.timeout_secs.map(Duration::from_secs),
        ))
    }

    pub fn max_pages(&self) -> u32 {
        self.config.catalog.max_pages
    }

    pub fn images(&self) -> ImageUrls {
        ImageUrls::new(self.config.catalog.image_base_url.clone())
    }

    pub fn player(&self) -> Player {
        Player::new(self.config.player.embed_base_url.clone())
    }

    pub fn feed(&self) -> LatestFeedClient {
        LatestFeedClient::new(self.config.feed.base_url.clone())
    }

    pub fn list_store(&self) -> ListStore<FileStorage> {
        ListStore::load(FileStorage::new(self.paths.local_storage_file()))
    }

    pub fn sessions(&self) -> Result<SessionStore> {
        let session_file = self.paths.session_file();
        let mut sessions = SessionStore::new(session_file.clone());
        sessions
            .load()
            .map_err(|e| eyre!("Failed to load session from {}: {}", session_file.display(), e))?;
        Ok(sessions)
    }

    pub fn accounts(&self) -> Result<AccountService<IdentityClient>> {
        if !self.config.is_identity_configured() {
            return Err(eyre!(
                "Identity API key is not configured. Run 'pawflix config set-identity-key' or set {}.",
                pawflix_config::config::IDENTITY_API_KEY_ENV
            ));
        }
        let identity = &self.config.identity;
        let client = IdentityClient::new(
            identity.api_key.clone(),
            identity.base_url.clone(),
            identity.token_url.clone(),
        );
        Ok(AccountService::new(client, self.sessions()?))
    }
}
