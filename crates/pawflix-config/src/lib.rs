pub mod config;
pub mod paths;
pub mod session;

pub use config::{CatalogConfig, Config, FeedConfig, IdentityConfig, LoggingConfig, PlayerConfig};
pub use paths::{base_path_override, PathManager};
pub use session::{Session, SessionStore};
