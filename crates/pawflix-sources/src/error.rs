use thiserror::Error;

/// Failures talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog API key is not configured")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("content not found")]
    NotFound,

    #[error("catalog returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

/// Error codes the identity provider reports in `error.message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityErrorCode {
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    RequiresRecentLogin,
    TokenExpired,
    TooManyAttempts,
    Other(String),
}

impl IdentityErrorCode {
    /// Parse a provider message such as `WEAK_PASSWORD : Password should be ...`.
    pub fn from_message(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        match code {
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => {
                IdentityErrorCode::InvalidCredential
            }
            "EMAIL_EXISTS" => IdentityErrorCode::EmailAlreadyInUse,
            "WEAK_PASSWORD" => IdentityErrorCode::WeakPassword,
            "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => IdentityErrorCode::RequiresRecentLogin,
            "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
                IdentityErrorCode::TokenExpired
            }
            "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityErrorCode::TooManyAttempts,
            other => IdentityErrorCode::Other(other.to_string()),
        }
    }
}

/// Failures talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity API key is not configured")]
    MissingApiKey,

    #[error("identity provider rejected the request: {message}")]
    Provider {
        code: IdentityErrorCode,
        message: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode identity response: {0}")]
    Decode(String),
}

impl IdentityError {
    pub fn code(&self) -> Option<&IdentityErrorCode> {
        match self {
            IdentityError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IdentityError::Decode(e.to_string())
        } else {
            IdentityError::Network(e.to_string())
        }
    }
}
