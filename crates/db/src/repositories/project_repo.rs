//! Repository for the `projects` table.

use sqlx::PgPool;
use nps_core::filters::ProjectPredicate;
use nps_core::types::{DbId, Timestamp};

use crate::models::attachment::DeletedImage;
use crate::models::project::{CreateProject, Project, ProjectCounts, UpdateProject};
use crate::versioned::Versioned;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, image_url, tags, completion_date, is_active, \
                       row_version, created_at";

/// Filter clause over `$1` (is_active) and `$2` (created_from).
const PREDICATE: &str = "($1::BOOLEAN IS NULL OR is_active = $1)
     AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)";

/// Provides CRUD, filtering and public listing queries for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, description, image_url, tags, completion_date, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.tags)
            .bind(input.completion_date)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// One page of projects matching `predicate`, most recently created first.
    pub async fn list(
        pool: &PgPool,
        predicate: &ProjectPredicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {PREDICATE}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(predicate.is_active)
            .bind(predicate.created_from)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, predicate: &ProjectPredicate) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM projects WHERE {PREDICATE}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(predicate.is_active)
            .bind(predicate.created_from)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Unfiltered counters; "recent" means created at or after `recent_from`.
    pub async fn counts(
        pool: &PgPool,
        recent_from: Timestamp,
    ) -> Result<ProjectCounts, sqlx::Error> {
        sqlx::query_as::<_, ProjectCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_active) AS active,
                COUNT(*) FILTER (WHERE NOT is_active) AS inactive,
                COUNT(*) FILTER (WHERE created_at >= $1) AS recent
             FROM projects",
        )
        .bind(recent_from)
        .fetch_one(pool)
        .await
    }

    /// The `limit` most recently created projects.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// A page of active projects, latest completion first. Projects without
    /// a completion date sort after dated ones.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE is_active = true
             ORDER BY completion_date DESC NULLS LAST, created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE is_active = true")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Replace every editable field, guarded by `input.row_version`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Versioned<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = $3,
                description = $4,
                image_url = $5,
                tags = $6,
                completion_date = $7,
                is_active = $8,
                row_version = row_version + 1
             WHERE id = $1 AND row_version = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.row_version)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.tags)
            .bind(input.completion_date)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(project) => Ok(Versioned::Updated(project)),
            None => Ok(Versioned::from_recheck(Self::exists(pool, id).await?)),
        }
    }

    /// Flip the active flag in a single statement.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                is_active = NOT is_active,
                row_version = row_version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project, returning its image path if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DeletedImage>, sqlx::Error> {
        sqlx::query_as::<_, DeletedImage>("DELETE FROM projects WHERE id = $1 RETURNING image_url")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
