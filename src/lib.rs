pub mod api;
pub mod config;
pub mod db;

pub use db::DbPool;

use config::Config;

/// Shared application state, constructed once in main and passed to every
/// handler. The connection pool lives here rather than in a global so tests
/// and alternate binaries can inject their own.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}
