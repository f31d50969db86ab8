//! Aggregate queries for the admin dashboard.

use sqlx::PgPool;
use nps_core::types::Timestamp;

use crate::models::dashboard::{
    DashboardSummary, MessageStats, NewsStats, ProjectStats, DASHBOARD_LATEST_LIMIT,
};
use crate::repositories::{ContactMessageRepo, NewsArticleRepo, ProjectRepo};

/// Read-only statistics spanning all three content tables.
pub struct DashboardRepo;

impl DashboardRepo {
    /// News counters; "this month" counts articles created since `month_start`.
    pub async fn news_stats(pool: &PgPool, month_start: Timestamp) -> Result<NewsStats, sqlx::Error> {
        sqlx::query_as::<_, NewsStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_published) AS published,
                COUNT(*) FILTER (WHERE NOT is_published) AS draft,
                COUNT(*) FILTER (WHERE created_at >= $1) AS this_month
             FROM news_articles",
        )
        .bind(month_start)
        .fetch_one(pool)
        .await
    }

    pub async fn project_stats(
        pool: &PgPool,
        month_start: Timestamp,
    ) -> Result<ProjectStats, sqlx::Error> {
        sqlx::query_as::<_, ProjectStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_active) AS active,
                COUNT(*) FILTER (WHERE created_at >= $1) AS this_month
             FROM projects",
        )
        .bind(month_start)
        .fetch_one(pool)
        .await
    }

    /// Message counters; "today" is `[today_start, +1 day)`, "this week"
    /// starts at `week_start`.
    pub async fn message_stats(
        pool: &PgPool,
        today_start: Timestamp,
        week_start: Timestamp,
    ) -> Result<MessageStats, sqlx::Error> {
        sqlx::query_as::<_, MessageStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread,
                COUNT(*) FILTER (
                    WHERE created_at >= $1 AND created_at < $1 + INTERVAL '1 day'
                ) AS today,
                COUNT(*) FILTER (WHERE created_at >= $2) AS this_week
             FROM contact_messages",
        )
        .bind(today_start)
        .bind(week_start)
        .fetch_one(pool)
        .await
    }

    /// Counters plus the latest rows of each table.
    pub async fn summary(
        pool: &PgPool,
        today_start: Timestamp,
        week_start: Timestamp,
        month_start: Timestamp,
    ) -> Result<DashboardSummary, sqlx::Error> {
        Ok(DashboardSummary {
            news: Self::news_stats(pool, month_start).await?,
            projects: Self::project_stats(pool, month_start).await?,
            messages: Self::message_stats(pool, today_start, week_start).await?,
            latest_news: NewsArticleRepo::latest(pool, DASHBOARD_LATEST_LIMIT).await?,
            latest_projects: ProjectRepo::latest(pool, DASHBOARD_LATEST_LIMIT).await?,
            latest_messages: ContactMessageRepo::latest(pool, DASHBOARD_LATEST_LIMIT).await?,
        })
    }
}
