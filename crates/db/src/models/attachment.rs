//! Image reference returned by deletes.

use sqlx::FromRow;

/// The `image_url` of a row that was just deleted, so the caller can remove
/// the file after the row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct DeletedImage {
    pub image_url: Option<String>,
}
