use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, `PAWFLIX_BASE_PATH`.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("PAWFLIX_BASE_PATH").ok().map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("pawflix");

        Ok(Self::from_base(base_dir))
    }

    /// Config files at the base level, data and logs in subdirectories.
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.toml")
    }

    /// Key/value file standing in for browser local storage.
    pub fn local_storage_file(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }

    /// Default output of `tools fetch-latest`.
    pub fn latest_movies_file(&self) -> PathBuf {
        self.data_dir.join("latest_movies.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("pawflix.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths, e.g. ~/.config/pawflix on Linux
        Self::new().unwrap_or_else(|_| Self::from_base(std::env::temp_dir().join("pawflix")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let pm = PathManager::from_base(PathBuf::from("/srv/pawflix"));
        assert_eq!(pm.config_file(), PathBuf::from("/srv/pawflix/config.toml"));
        assert_eq!(pm.session_file(), PathBuf::from("/srv/pawflix/session.toml"));
        assert_eq!(
            pm.local_storage_file(),
            PathBuf::from("/srv/pawflix/data/local_storage.json")
        );
        assert_eq!(pm.log_file(), PathBuf::from("/srv/pawflix/logs/pawflix.log"));
    }
}
