//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use bl_core::config::Config;
use bl_db::pool::DbPool;
use bl_db::ReviewCatalog;
use bl_media::MediaStore;

/// Cheaply cloneable handle to everything a handler needs.
#[derive(Clone)]
pub struct AppContext {
    /// Review service over the connection pool.
    pub catalog: ReviewCatalog,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Destination for uploaded images.
    pub media: Arc<dyn MediaStore>,
}

impl AppContext {
    pub fn new(db: DbPool, config: Config, media: Arc<dyn MediaStore>) -> Self {
        Self {
            catalog: ReviewCatalog::new(db),
            config: Arc::new(config),
            media,
        }
    }
}
