pub mod error;
pub mod feed;
pub mod http;
pub mod identity;
pub mod tmdb;
pub mod traits;

pub use error::{CatalogError, IdentityError, IdentityErrorCode};
pub use feed::LatestFeedClient;
pub use identity::{AccountInfo, AuthTokens, IdentityClient};
pub use tmdb::TmdbClient;
pub use traits::{Catalog, IdentityProvider, LatestFeed};
