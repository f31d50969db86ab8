//! News article entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use nps_core::toggles::PublishState;
use nps_core::types::{DbId, Timestamp};

/// A row from the `news_articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsArticle {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub published_date: Timestamp,
    pub author: Option<String>,
    pub is_published: bool,
    /// Optimistic concurrency token; send it back unchanged on edit.
    pub row_version: i64,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl NewsArticle {
    pub fn publish_state(&self) -> PublishState {
        PublishState {
            is_published: self.is_published,
            published_date: self.published_date,
        }
    }
}

/// DTO for creating an article. Articles are drafts unless stated otherwise.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNewsArticle {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image_url: Option<String>,
    /// Defaults to the insert time when omitted.
    pub published_date: Option<Timestamp>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// DTO for a full-field edit of an article.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNewsArticle {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image_url: Option<String>,
    pub published_date: Timestamp,
    pub author: Option<String>,
    pub is_published: bool,
    /// The `row_version` the editor loaded.
    pub row_version: i64,
}

/// Counters shown above the admin news list.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct NewsCounts {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
}
