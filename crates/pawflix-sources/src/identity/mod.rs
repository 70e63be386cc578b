pub mod api;
pub mod client;

pub use api::{AccountInfo, AuthTokens};
pub use client::IdentityClient;
