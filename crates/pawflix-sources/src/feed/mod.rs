pub mod client;

pub use client::LatestFeedClient;
