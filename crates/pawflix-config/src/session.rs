use anyhow::Result;
use chrono::{DateTime, Utc};
use pawflix_models::User;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Signed-in state: provider tokens plus the cached user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    /// Tokens expiring within five minutes count as expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now() + chrono::Duration::minutes(5)
    }
}

/// Flat TOML key/value file holding the session.
pub struct SessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

const SESSION_KEYS: &[&str] = &[
    "local_id",
    "id_token",
    "refresh_token",
    "token_expires",
    "user_name",
    "user_username",
    "user_email",
    "user_bio",
    "user_email_verified",
];

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let data: SessionData = toml::from_str(&content)?;
            self.values = data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = SessionData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn session(&self) -> Option<Session> {
        let expires_at = self
            .get("token_expires")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))?;

        Some(Session {
            local_id: self.get("local_id")?.clone(),
            id_token: self.get("id_token")?.clone(),
            refresh_token: self.get("refresh_token")?.clone(),
            expires_at,
            user: User {
                name: self.get("user_name").cloned().unwrap_or_default(),
                username: self.get("user_username").cloned().unwrap_or_default(),
                email: self.get("user_email").cloned().unwrap_or_default(),
                bio: self.get("user_bio").cloned().filter(|b| !b.is_empty()),
                email_verified: self
                    .get("user_email_verified")
                    .is_some_and(|v| v == "true"),
            },
        })
    }

    pub fn set_session(&mut self, session: &Session) {
        self.set("local_id".to_string(), session.local_id.clone());
        self.set("id_token".to_string(), session.id_token.clone());
        self.set("refresh_token".to_string(), session.refresh_token.clone());
        self.set("token_expires".to_string(), session.expires_at.to_rfc3339());
        self.set_user(&session.user);
    }

    pub fn set_user(&mut self, user: &User) {
        self.set("user_name".to_string(), user.name.clone());
        self.set("user_username".to_string(), user.username.clone());
        self.set("user_email".to_string(), user.email.clone());
        match &user.bio {
            Some(bio) => self.set("user_bio".to_string(), bio.clone()),
            None => self.remove("user_bio"),
        }
        self.set(
            "user_email_verified".to_string(),
            user.email_verified.to_string(),
        );
    }

    pub fn clear_session(&mut self) {
        for key in SESSION_KEYS {
            self.remove(key);
        }
    }

    pub fn has_session(&self) -> bool {
        self.get("id_token").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_session() -> Session {
        Session {
            local_id: "uid-1".to_string(),
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            user: User {
                name: "Tyler".to_string(),
                username: "tdurden".to_string(),
                email: "tyler@example.com".to_string(),
                bio: Some("Soap maker".to_string()),
                email_verified: true,
            },
        }
    }

    #[test]
    fn test_session_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = SessionStore::new(path.clone());
        let session = sample_session();
        store.set_session(&session);
        store.save().unwrap();

        let mut loaded = SessionStore::new(path);
        loaded.load().unwrap();
        let restored = loaded.session().unwrap();
        assert_eq!(restored.local_id, "uid-1");
        assert_eq!(restored.user, session.user);
        // Allow 1 second difference for serialization
        assert!((restored.expires_at - session.expires_at).num_seconds().abs() < 2);
        assert!(!restored.is_expired());
    }

    #[test]
    fn test_clear_session_keeps_other_keys() {
        let mut store = SessionStore::new(PathBuf::from("/tmp/pawflix-session-test"));
        store.set_session(&sample_session());
        store.set("theme".to_string(), "dark".to_string());

        store.clear_session();
        assert!(!store.has_session());
        assert!(store.session().is_none());
        assert_eq!(store.get("theme"), Some(&"dark".to_string()));
    }

    #[test]
    fn test_expired_session() {
        let mut session = sample_session();
        session.expires_at = Utc::now() + chrono::Duration::minutes(1);
        assert!(session.is_expired());
    }
}
