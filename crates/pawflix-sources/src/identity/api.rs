use crate::error::{IdentityError, IdentityErrorCode};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens returned by sign-up, sign-in and refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthTokens {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthTokens {
    pub(crate) fn from_expires_in(
        local_id: String,
        id_token: String,
        refresh_token: String,
        expires_in: &str,
    ) -> Self {
        // Provider reports seconds as a string; keep two minutes of headroom.
        let seconds = expires_in.parse::<i64>().unwrap_or(3600);
        Self {
            local_id,
            id_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(seconds - 120),
        }
    }
}

/// Account as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountInfo {
    pub local_id: String,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordResponse {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

impl From<PasswordResponse> for AuthTokens {
    fn from(r: PasswordResponse) -> Self {
        AuthTokens::from_expires_in(r.local_id, r.id_token, r.refresh_token, &r.expires_in)
    }
}

/// The secure-token endpoint answers in snake_case.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub user_id: String,
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

impl From<RefreshResponse> for AuthTokens {
    fn from(r: RefreshResponse) -> Self {
        AuthTokens::from_expires_in(r.user_id, r.id_token, r.refresh_token, &r.expires_in)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdTokenRequest<'a> {
    pub id_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileRequest<'a> {
    pub id_token: &'a str,
    pub display_name: &'a str,
    pub return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OobCodeRequest<'a> {
    pub request_type: &'a str,
    pub id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

impl LookupResponse {
    pub fn into_account(self) -> Result<AccountInfo, IdentityError> {
        let user = self
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::Provider {
                code: IdentityErrorCode::TokenExpired,
                message: "USER_NOT_FOUND".to_string(),
            })?;
        Ok(AccountInfo {
            local_id: user.local_id,
            email: user.email,
            display_name: user.display_name,
            email_verified: user.email_verified,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetails,
}

/// Turn a non-success body into a provider error. Bodies that don't follow
/// the `{"error": {"message": ...}}` shape keep the status and raw text.
pub(crate) fn parse_error(status: u16, body: &str) -> IdentityError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => IdentityError::Provider {
            code: IdentityErrorCode::from_message(&parsed.error.message),
            message: parsed.error.message,
        },
        _ => IdentityError::Provider {
            code: IdentityErrorCode::Other(format!("HTTP_{}", status)),
            message: format!("{} - {}", status, body),
        },
    }
}
