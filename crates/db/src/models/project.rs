//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use nps_core::tags::parse_tags;
use nps_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Comma-separated; see [`Project::tag_list`].
    pub tags: Option<String>,
    pub completion_date: Option<Timestamp>,
    pub is_active: bool,
    pub row_version: i64,
    pub created_at: Timestamp,
}

impl Project {
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(self.tags.as_deref())
    }
}

/// API representation of a project with its tags already split.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub tag_list: Vec<String>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        let tag_list = project.tag_list();
        Self { project, tag_list }
    }
}

/// DTO for creating a project. Projects start active unless stated otherwise.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description is required (max 1000 characters)"
    ))]
    pub description: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub completion_date: Option<Timestamp>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// DTO for a full-field edit of a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description is required (max 1000 characters)"
    ))]
    pub description: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub completion_date: Option<Timestamp>,
    pub is_active: bool,
    pub row_version: i64,
}

/// Counters shown above the admin project list.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct ProjectCounts {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub recent: i64,
}
