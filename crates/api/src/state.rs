use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: nps_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image file store rooted at the configured web root.
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(pool: nps_db::DbPool, config: ServerConfig) -> Self {
        let media = MediaStore::new(config.web_root.clone(), config.max_image_bytes);
        Self {
            pool,
            config: Arc::new(config),
            media: Arc::new(media),
        }
    }
}
