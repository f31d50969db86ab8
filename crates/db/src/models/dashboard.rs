//! Aggregates for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::contact_message::ContactMessage;
use crate::models::news_article::NewsArticle;
use crate::models::project::Project;

/// Rows listed in each "latest" panel.
pub const DASHBOARD_LATEST_LIMIT: i64 = 5;

#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct NewsStats {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub this_month: i64,
}

#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub active: i64,
    pub this_month: i64,
}

#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct MessageStats {
    pub total: i64,
    pub unread: i64,
    pub today: i64,
    pub this_week: i64,
}

/// Everything the dashboard shows in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub news: NewsStats,
    pub projects: ProjectStats,
    pub messages: MessageStats,
    pub latest_news: Vec<NewsArticle>,
    pub latest_projects: Vec<Project>,
    pub latest_messages: Vec<ContactMessage>,
}
