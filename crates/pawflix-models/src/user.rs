use serde::{Deserialize, Serialize};

/// Cached copy of the signed-in account.
///
/// `name`, `email` and `email_verified` mirror the identity provider;
/// `username` and `bio` only exist in this cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl User {
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}
