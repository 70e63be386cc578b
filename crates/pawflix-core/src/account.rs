use crate::lists::ListStore;
use crate::storage::KeyValueStore;
use pawflix_config::{Session, SessionStore};
use pawflix_models::User;
use pawflix_sources::{AuthTokens, IdentityError, IdentityErrorCode, IdentityProvider};
use thiserror::Error;
use tracing::{debug, info, warn};

const LOGIN_FAILED: &str = "Failed to login. Please check your credentials.";
const REGISTER_FAILED: &str = "Failed to create account. Please try again.";
const VERIFICATION_FAILED: &str = "Failed to send verification email";
const DELETE_FAILED: &str = "Failed to delete account. Please try again.";
const UPDATE_FAILED: &str = "Failed to update profile";

/// Account failures, rendered as the message shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please verify your email first")]
    EmailNotVerified,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is already in use")]
    EmailInUse,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("Security check: Please log out and log back in to delete your account.")]
    RequiresRecentLogin,

    #[error("You are not signed in")]
    NotSignedIn,

    #[error("{0}")]
    Failed(&'static str),

    #[error("Failed to save session: {0}")]
    Storage(String),
}

impl AccountError {
    /// Map a provider failure, falling back to the operation's generic message.
    fn from_identity(err: &IdentityError, generic: &'static str) -> Self {
        warn!("Identity provider error: {}", err);
        match err.code() {
            Some(IdentityErrorCode::InvalidCredential) => AccountError::InvalidCredentials,
            Some(IdentityErrorCode::EmailAlreadyInUse) => AccountError::EmailInUse,
            Some(IdentityErrorCode::WeakPassword) => AccountError::WeakPassword,
            Some(IdentityErrorCode::RequiresRecentLogin) => AccountError::RequiresRecentLogin,
            _ => AccountError::Failed(generic),
        }
    }
}

fn storage_error(e: anyhow::Error) -> AccountError {
    AccountError::Storage(e.to_string())
}

/// Sign-up, sign-in and profile flows against the identity provider, with
/// the signed-in session kept in a [`SessionStore`].
pub struct AccountService<P: IdentityProvider> {
    provider: P,
    sessions: SessionStore,
}

impl<P: IdentityProvider> AccountService<P> {
    /// `sessions` is expected to be loaded already.
    pub fn new(provider: P, sessions: SessionStore) -> Self {
        Self { provider, sessions }
    }

    pub fn is_logged_in(&self) -> bool {
        self.sessions.has_session()
    }

    /// Cached user of the stored session.
    pub fn current_user(&self) -> Option<User> {
        self.sessions.session().map(|s| s.user)
    }

    /// Create the account, set its display name and send the verification
    /// email. No session is kept: the user signs in after verifying.
    pub async fn register(
        &mut self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let name = name.trim();
        let username = username.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AccountError::MissingField("Name"));
        }
        if username.is_empty() {
            return Err(AccountError::MissingField("Username"));
        }
        if !email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("Password"));
        }

        let tokens = self
            .provider
            .sign_up(email, password)
            .await
            .map_err(|e| AccountError::from_identity(&e, REGISTER_FAILED))?;
        info!("Created account {}", tokens.local_id);

        self.provider
            .update_display_name(&tokens.id_token, name)
            .await
            .map_err(|e| AccountError::from_identity(&e, REGISTER_FAILED))?;
        self.provider
            .send_email_verification(&tokens.id_token)
            .await
            .map_err(|e| AccountError::from_identity(&e, REGISTER_FAILED))?;

        // Dropping the tokens is the sign-out; a stale session must not survive either.
        self.clear_local_session()?;

        Ok(User {
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            bio: None,
            email_verified: false,
        })
    }

    /// Sign in. Unverified accounts are signed out again immediately.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("Password"));
        }

        let tokens = self
            .provider
            .sign_in(email, password)
            .await
            .map_err(|e| AccountError::from_identity(&e, LOGIN_FAILED))?;
        let account = self
            .provider
            .lookup(&tokens.id_token)
            .await
            .map_err(|e| AccountError::from_identity(&e, LOGIN_FAILED))?;

        if !account.email_verified {
            info!("Rejecting sign-in for unverified {}", account.email);
            self.clear_local_session()?;
            return Err(AccountError::EmailNotVerified);
        }

        let user = User {
            name: account.display_name,
            username: String::new(),
            email: if account.email.is_empty() {
                email.to_string()
            } else {
                account.email
            },
            bio: None,
            email_verified: true,
        };
        self.store_session(tokens, user.clone())?;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), AccountError> {
        self.clear_local_session()?;
        info!("Signed out");
        Ok(())
    }

    /// The stored session, refreshed first when its token is about to expire.
    pub async fn active_session(&mut self) -> Result<Session, AccountError> {
        let session = self.sessions.session().ok_or(AccountError::NotSignedIn)?;
        if !session.is_expired() {
            return Ok(session);
        }

        debug!("Session token expired, refreshing");
        match self.provider.refresh(&session.refresh_token).await {
            Ok(tokens) => self.store_session(tokens, session.user),
            Err(e) => {
                warn!("Session refresh failed: {}", e);
                if matches!(e.code(), Some(IdentityErrorCode::TokenExpired)) {
                    self.clear_local_session()?;
                    return Err(AccountError::NotSignedIn);
                }
                Err(AccountError::Failed(LOGIN_FAILED))
            }
        }
    }

    /// Push a new display name to the provider when given, and merge the
    /// fields into the cached user.
    pub async fn update_profile(
        &mut self,
        name: Option<&str>,
        username: Option<&str>,
        bio: Option<&str>,
    ) -> Result<User, AccountError> {
        let session = self.active_session().await?;
        let mut user = session.user;

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            self.provider
                .update_display_name(&session.id_token, name)
                .await
                .map_err(|e| AccountError::from_identity(&e, UPDATE_FAILED))?;
            user.name = name.to_string();
        }
        if let Some(username) = username {
            user.username = username.trim().to_string();
        }
        if let Some(bio) = bio {
            user.bio = Some(bio.trim().to_string()).filter(|b| !b.is_empty());
        }

        self.sessions.set_user(&user);
        self.sessions.save().map_err(storage_error)?;
        Ok(user)
    }

    /// Resend the verification email for the signed-in account.
    pub async fn resend_verification(&mut self) -> Result<(), AccountError> {
        let session = self.active_session().await?;
        self.provider
            .send_email_verification(&session.id_token)
            .await
            .map_err(|e| AccountError::from_identity(&e, VERIFICATION_FAILED))?;
        info!("Verification email sent to {}", session.user.email);
        Ok(())
    }

    /// Resend the verification email for an account that cannot sign in
    /// yet. The short-lived tokens are discarded afterwards.
    pub async fn resend_verification_for(&mut self, email: &str, password: &str) -> Result<(), AccountError> {
        let tokens = self
            .provider
            .sign_in(email.trim(), password)
            .await
            .map_err(|e| AccountError::from_identity(&e, VERIFICATION_FAILED))?;
        self.provider
            .send_email_verification(&tokens.id_token)
            .await
            .map_err(|e| AccountError::from_identity(&e, VERIFICATION_FAILED))?;
        info!("Verification email sent to {}", email.trim());
        Ok(())
    }

    /// Delete the provider account. Lists and session are cleared only
    /// once the provider confirms; on failure both stay as they were.
    ///
    /// After a confirmed deletion both clears are attempted even if one
    /// fails; the first storage error is returned.
    pub async fn delete_account<S: KeyValueStore>(&mut self, lists: &mut ListStore<S>) -> Result<(), AccountError> {
        let session = self.active_session().await?;
        self.provider
            .delete_account(&session.id_token)
            .await
            .map_err(|e| AccountError::from_identity(&e, DELETE_FAILED))?;
        info!("Deleted account {}", session.local_id);

        let session_cleared = self.clear_local_session();
        let lists_cleared = lists.clear().map_err(storage_error);
        if let Err(e) = &lists_cleared {
            warn!("Account deleted but local lists could not be cleared: {}", e);
        }
        session_cleared.and(lists_cleared)
    }

    fn store_session(&mut self, tokens: AuthTokens, user: User) -> Result<Session, AccountError> {
        let session = Session {
            local_id: tokens.local_id,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
            user,
        };
        self.sessions.set_session(&session);
        self.sessions.save().map_err(storage_error)?;
        Ok(session)
    }

    fn clear_local_session(&mut self) -> Result<(), AccountError> {
        self.sessions.clear_session();
        self.sessions.save().map_err(storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use pawflix_models::{ListItem, ListName, MediaType};
    use pawflix_sources::AccountInfo;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeIdentity {
        verified: bool,
        display_name: Mutex<String>,
        failures: HashMap<&'static str, IdentityErrorCode>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeIdentity {
        fn verified() -> Self {
            Self {
                verified: true,
                ..Default::default()
            }
        }

        fn failing(mut self, operation: &'static str, code: IdentityErrorCode) -> Self {
            self.failures.insert(operation, code);
            self
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, operation: &'static str) -> Result<(), IdentityError> {
            self.calls.lock().unwrap().push(operation);
            match self.failures.get(operation) {
                Some(code) => Err(IdentityError::Provider {
                    code: code.clone(),
                    message: format!("{:?}", code),
                }),
                None => Ok(()),
            }
        }

        fn tokens(suffix: &str) -> AuthTokens {
            AuthTokens {
                local_id: "uid-1".to_string(),
                id_token: format!("id-{}", suffix),
                refresh_token: format!("refresh-{}", suffix),
                expires_at: Utc::now() + Duration::hours(1),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<AuthTokens, IdentityError> {
            self.record("sign_up")?;
            Ok(Self::tokens("signup"))
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthTokens, IdentityError> {
            self.record("sign_in")?;
            Ok(Self::tokens("signin"))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<AuthTokens, IdentityError> {
            self.record("refresh")?;
            Ok(Self::tokens("refreshed"))
        }

        async fn lookup(&self, _id_token: &str) -> Result<AccountInfo, IdentityError> {
            self.record("lookup")?;
            Ok(AccountInfo {
                local_id: "uid-1".to_string(),
                email: "tyler@example.com".to_string(),
                display_name: self.display_name.lock().unwrap().clone(),
                email_verified: self.verified,
            })
        }

        async fn update_display_name(&self, _id_token: &str, display_name: &str) -> Result<(), IdentityError> {
            self.record("update_display_name")?;
            *self.display_name.lock().unwrap() = display_name.to_string();
            Ok(())
        }

        async fn send_email_verification(&self, _id_token: &str) -> Result<(), IdentityError> {
            self.record("send_email_verification")
        }

        async fn delete_account(&self, _id_token: &str) -> Result<(), IdentityError> {
            self.record("delete_account")
        }
    }

    fn service(provider: FakeIdentity, dir: &TempDir) -> AccountService<FakeIdentity> {
        let mut sessions = SessionStore::new(dir.path().join("session.toml"));
        sessions.load().unwrap();
        AccountService::new(provider, sessions)
    }

    fn lists_with_fight_club() -> ListStore<MemoryStorage> {
        let mut lists = ListStore::load(MemoryStorage::new());
        lists
            .add_to_list(
                ListItem {
                    id: 550,
                    title: "Fight Club".to_string(),
                    poster_path: "/p.jpg".to_string(),
                    media_type: MediaType::Movie,
                    vote_average: 8.4,
                },
                ListName::Favourites,
            )
            .unwrap();
        lists
    }

    #[tokio::test]
    async fn test_register_signs_out_after_verification_email() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::default(), &dir);

        let user = accounts
            .register("Tyler", "tdurden", "tyler@example.com", "soap-company")
            .await
            .unwrap();
        assert_eq!(user.username, "tdurden");
        assert!(!user.email_verified);
        assert!(!accounts.is_logged_in());
        assert_eq!(
            accounts.provider.calls(),
            vec!["sign_up", "update_display_name", "send_email_verification"]
        );
    }

    #[tokio::test]
    async fn test_register_validation_and_error_mapping() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::default(), &dir);
        assert_eq!(
            accounts.register("Tyler", "t", "not-an-email", "pw").await,
            Err(AccountError::InvalidEmail)
        );
        assert_eq!(
            accounts.register("", "t", "tyler@example.com", "pw").await,
            Err(AccountError::MissingField("Name"))
        );

        let provider = FakeIdentity::default().failing("sign_up", IdentityErrorCode::EmailAlreadyInUse);
        let mut accounts = service(provider, &dir);
        let err = accounts
            .register("Tyler", "t", "tyler@example.com", "pw1234")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email is already in use");

        let provider = FakeIdentity::default().failing("sign_up", IdentityErrorCode::WeakPassword);
        let mut accounts = service(provider, &dir);
        let err = accounts
            .register("Tyler", "t", "tyler@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Password should be at least 6 characters");

        let provider = FakeIdentity::default().failing("sign_up", IdentityErrorCode::TooManyAttempts);
        let mut accounts = service(provider, &dir);
        let err = accounts
            .register("Tyler", "t", "tyler@example.com", "pw1234")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create account. Please try again.");
    }

    #[tokio::test]
    async fn test_login_rejects_unverified_email() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::default(), &dir);

        let err = accounts.login("tyler@example.com", "pw1234").await.unwrap_err();
        assert_eq!(err.to_string(), "Please verify your email first");
        assert!(!accounts.is_logged_in());
        assert_eq!(accounts.current_user(), None);
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let dir = TempDir::new().unwrap();
        let provider = FakeIdentity::verified();
        *provider.display_name.lock().unwrap() = "Tyler".to_string();
        let mut accounts = service(provider, &dir);

        let user = accounts.login("tyler@example.com", "pw1234").await.unwrap();
        assert_eq!(user.name, "Tyler");
        assert!(user.email_verified);

        // A fresh service over the same file sees the session
        let reopened = service(FakeIdentity::verified(), &dir);
        assert!(reopened.is_logged_in());
        assert_eq!(reopened.current_user().unwrap().email, "tyler@example.com");
    }

    #[tokio::test]
    async fn test_login_maps_invalid_credentials() {
        let dir = TempDir::new().unwrap();
        let provider = FakeIdentity::verified().failing("sign_in", IdentityErrorCode::InvalidCredential);
        let mut accounts = service(provider, &dir);
        let err = accounts.login("tyler@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        let provider = FakeIdentity::verified().failing("sign_in", IdentityErrorCode::Other("X".into()));
        let mut accounts = service(provider, &dir);
        let err = accounts.login("tyler@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to login. Please check your credentials.");
    }

    #[tokio::test]
    async fn test_update_profile_merges_cached_user() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::verified(), &dir);
        accounts.login("tyler@example.com", "pw1234").await.unwrap();

        let user = accounts
            .update_profile(Some("Narrator"), Some("jack"), Some("I am Jack's bio"))
            .await
            .unwrap();
        assert_eq!(user.name, "Narrator");
        assert_eq!(accounts.current_user(), Some(user));
        assert!(accounts.provider.calls().contains(&"update_display_name"));
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::verified(), &dir);
        accounts.login("tyler@example.com", "pw1234").await.unwrap();

        let mut session = accounts.sessions.session().unwrap();
        session.expires_at = Utc::now() - Duration::minutes(1);
        accounts.sessions.set_session(&session);

        let refreshed = accounts.active_session().await.unwrap();
        assert_eq!(refreshed.id_token, "id-refreshed");
        assert!(!refreshed.is_expired());
    }

    #[tokio::test]
    async fn test_delete_account_clears_lists_on_success() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::verified(), &dir);
        accounts.login("tyler@example.com", "pw1234").await.unwrap();

        let mut lists = lists_with_fight_club();
        accounts.delete_account(&mut lists).await.unwrap();
        assert!(lists.is_empty());
        assert!(!accounts.is_logged_in());
    }

    struct FailingRemoveStorage;

    impl KeyValueStore for FailingRemoveStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: String) -> anyhow::Result<()> {
            Ok(())
        }

        fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    #[tokio::test]
    async fn test_delete_account_signs_out_even_if_lists_fail_to_clear() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::verified(), &dir);
        accounts.login("tyler@example.com", "pw1234").await.unwrap();

        let mut lists = ListStore::load(FailingRemoveStorage);
        let result = accounts.delete_account(&mut lists).await;
        assert_eq!(result, Err(AccountError::Storage("disk full".to_string())));
        assert!(!accounts.is_logged_in());

        // the cleared session is on disk too
        let reloaded = service(FakeIdentity::verified(), &dir);
        assert!(!reloaded.is_logged_in());
    }

    #[tokio::test]
    async fn test_delete_account_failure_keeps_lists() {
        let dir = TempDir::new().unwrap();
        let provider = FakeIdentity::verified().failing("delete_account", IdentityErrorCode::RequiresRecentLogin);
        let mut accounts = service(provider, &dir);
        accounts.login("tyler@example.com", "pw1234").await.unwrap();

        let mut lists = lists_with_fight_club();
        let err = accounts.delete_account(&mut lists).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Security check: Please log out and log back in to delete your account."
        );
        assert_eq!(lists.check_list_status(550), Some(ListName::Favourites));
        assert!(accounts.is_logged_in());
    }

    #[tokio::test]
    async fn test_signed_out_operations_fail() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::verified(), &dir);
        assert_eq!(accounts.resend_verification().await, Err(AccountError::NotSignedIn));

        let mut lists = lists_with_fight_club();
        assert_eq!(
            accounts.delete_account(&mut lists).await,
            Err(AccountError::NotSignedIn)
        );
        assert_eq!(lists.len(), 1);
    }

    #[tokio::test]
    async fn test_resend_verification_for_unverified_account() {
        let dir = TempDir::new().unwrap();
        let mut accounts = service(FakeIdentity::default(), &dir);
        accounts
            .resend_verification_for("tyler@example.com", "pw1234")
            .await
            .unwrap();
        assert_eq!(accounts.provider.calls(), vec!["sign_in", "send_email_verification"]);
        assert!(!accounts.is_logged_in());
    }
}
