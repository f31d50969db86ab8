//! Repository for the `news_articles` table.

use sqlx::PgPool;
use nps_core::toggles::PublishState;
use nps_core::types::{DbId, Timestamp};

use crate::models::attachment::DeletedImage;
use crate::models::news_article::{CreateNewsArticle, NewsArticle, NewsCounts, UpdateNewsArticle};
use crate::versioned::Versioned;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, image_url, published_date, author, is_published, \
                       row_version, created_at, updated_at";

/// Public visibility: published and due at `$1`.
const PUBLIC: &str = "is_published = true AND published_date <= $1";

/// Provides CRUD, publishing and public listing queries for news articles.
pub struct NewsArticleRepo;

impl NewsArticleRepo {
    /// Insert a new article, returning the created row.
    ///
    /// If `published_date` is `None` in the input, defaults to `NOW()`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNewsArticle,
    ) -> Result<NewsArticle, sqlx::Error> {
        let query = format!(
            "INSERT INTO news_articles (title, content, image_url, published_date, author, is_published)
             VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image_url)
            .bind(input.published_date)
            .bind(&input.author)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID regardless of publish state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_articles WHERE id = $1");
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM news_articles WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Every article, most recently created first (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, NewsArticle>(&query).fetch_all(pool).await
    }

    /// Total / published / draft counters.
    pub async fn counts(pool: &PgPool) -> Result<NewsCounts, sqlx::Error> {
        sqlx::query_as::<_, NewsCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_published) AS published,
                COUNT(*) FILTER (WHERE NOT is_published) AS draft
             FROM news_articles",
        )
        .fetch_one(pool)
        .await
    }

    /// The `limit` most recently created articles.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find an article only if it is publicly visible at `now`.
    pub async fn find_public_by_id(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news_articles WHERE id = $2 AND {PUBLIC}");
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(now)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The newest publicly visible article, shown as the lead story.
    pub async fn lead_public(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Option<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles
             WHERE {PUBLIC}
             ORDER BY published_date DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// A slice of publicly visible articles, newest publish date first.
    pub async fn list_public(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_articles
             WHERE {PUBLIC}
             ORDER BY published_date DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NewsArticle>(&query)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool, now: Timestamp) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM news_articles WHERE {PUBLIC}");
        let (count,): (i64,) = sqlx::query_as(&query).bind(now).fetch_one(pool).await?;
        Ok(count)
    }

    /// Replace every editable field, guarded by `input.row_version`.
    ///
    /// Sets `updated_at` and bumps `row_version` on success.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNewsArticle,
    ) -> Result<Versioned<NewsArticle>, sqlx::Error> {
        let query = format!(
            "UPDATE news_articles SET
                title = $3,
                content = $4,
                image_url = $5,
                published_date = $6,
                author = $7,
                is_published = $8,
                updated_at = NOW(),
                row_version = row_version + 1
             WHERE id = $1 AND row_version = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .bind(input.row_version)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image_url)
            .bind(input.published_date)
            .bind(&input.author)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await?;
        Self::settle(pool, id, row).await
    }

    /// Persist a new publish state computed from the row at `expected_version`.
    pub async fn set_publish_state(
        pool: &PgPool,
        id: DbId,
        state: PublishState,
        expected_version: i64,
    ) -> Result<Versioned<NewsArticle>, sqlx::Error> {
        let query = format!(
            "UPDATE news_articles SET
                is_published = $3,
                published_date = $4,
                updated_at = NOW(),
                row_version = row_version + 1
             WHERE id = $1 AND row_version = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NewsArticle>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(state.is_published)
            .bind(state.published_date)
            .fetch_optional(pool)
            .await?;
        Self::settle(pool, id, row).await
    }

    /// Delete an article, returning its image path if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DeletedImage>, sqlx::Error> {
        sqlx::query_as::<_, DeletedImage>(
            "DELETE FROM news_articles WHERE id = $1 RETURNING image_url",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Resolve a guarded write: a zero-row update re-checks existence.
    async fn settle(
        pool: &PgPool,
        id: DbId,
        row: Option<NewsArticle>,
    ) -> Result<Versioned<NewsArticle>, sqlx::Error> {
        match row {
            Some(article) => Ok(Versioned::Updated(article)),
            None => Ok(Versioned::from_recheck(Self::exists(pool, id).await?)),
        }
    }
}
