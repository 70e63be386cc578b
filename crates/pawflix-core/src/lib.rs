pub mod account;
pub mod browse;
pub mod category;
pub mod display;
pub mod latest;
pub mod lists;
pub mod player;
pub mod storage;

#[cfg(test)]
mod testing;

pub use account::{AccountError, AccountService};
pub use browse::{browse_movies, fetch_listing, home_trending, load_details, trending, Details, Listing, MovieSections, HOME_TRENDING_LIMIT};
pub use category::{derive_category, derive_category_with};
pub use display::{display_year, genre_labels, rating_label, Card, ImageUrls, PLACEHOLDER_POSTER};
pub use lists::{ListStore, LISTS_STORAGE_KEY};
pub use player::Player;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
