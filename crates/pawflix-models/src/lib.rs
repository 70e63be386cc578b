pub mod catalog;
pub mod category;
pub mod details;
pub mod genre;
pub mod latest;
pub mod list;
pub mod media;
pub mod user;

pub use catalog::{CatalogItem, CatalogPage, ResultKind};
pub use category::DisplayCategory;
pub use details::{CastMember, Credits, Episode, Genre, MovieDetails, SeasonDetails, SeasonSummary, TvDetails, Video, Videos};
pub use genre::{genre_label, genre_name, ANIMATION_GENRE_ID, GENRES};
pub use latest::{FeedEntry, FeedPage, LatestMovie};
pub use list::{ListItem, ListName, Lists};
pub use media::MediaType;
pub use user::User;
