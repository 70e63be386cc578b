pub mod client;
pub mod filters;

pub use client::TmdbClient;
