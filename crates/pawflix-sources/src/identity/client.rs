use crate::error::IdentityError;
use crate::http::create_client;
use crate::identity::api::{
    parse_error, AccountInfo, AuthTokens, IdTokenRequest, LookupResponse, OobCodeRequest,
    PasswordRequest, PasswordResponse, RefreshResponse, UpdateProfileRequest,
};
use crate::traits::IdentityProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// REST client for the hosted identity provider (`accounts:*` endpoints).
#[derive(Clone)]
pub struct IdentityClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    token_url: String,
}

impl IdentityClient {
    pub fn new(api_key: String, base_url: String, token_url: String) -> Self {
        Self {
            client: Arc::new(create_client(None)),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_url,
        }
    }

    async fn post<B, T>(&self, action: &str, body: &B) -> Result<T, IdentityError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if self.api_key.is_empty() {
            return Err(IdentityError::MissingApiKey);
        }

        let url = format!("{}/accounts:{}", self.base_url, action);
        debug!(action, "Identity request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let err = parse_error(status.as_u16(), &text);
            debug!(action, status = status.as_u16(), error = %err, "Identity request rejected");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| IdentityError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordResponse = self.post("signUp", &body).await?;
        Ok(response.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordResponse = self.post("signInWithPassword", &body).await?;
        Ok(response.into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError> {
        if self.api_key.is_empty() {
            return Err(IdentityError::MissingApiKey);
        }

        let response = self
            .client
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &text));
        }

        let refreshed: RefreshResponse =
            serde_json::from_str(&text).map_err(|e| IdentityError::Decode(e.to_string()))?;
        Ok(refreshed.into())
    }

    async fn lookup(&self, id_token: &str) -> Result<AccountInfo, IdentityError> {
        let response: LookupResponse = self.post("lookup", &IdTokenRequest { id_token }).await?;
        response.into_account()
    }

    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<(), IdentityError> {
        let body = UpdateProfileRequest {
            id_token,
            display_name,
            return_secure_token: false,
        };
        let _: serde_json::Value = self.post("update", &body).await?;
        Ok(())
    }

    async fn send_email_verification(&self, id_token: &str) -> Result<(), IdentityError> {
        let body = OobCodeRequest {
            request_type: "VERIFY_EMAIL",
            id_token,
        };
        let _: serde_json::Value = self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self.post("delete", &IdTokenRequest { id_token }).await?;
        Ok(())
    }
}
