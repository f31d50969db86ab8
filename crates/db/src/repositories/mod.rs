//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contact_message_repo;
pub mod dashboard_repo;
pub mod news_article_repo;
pub mod project_repo;
pub mod role_repo;
pub mod user_repo;

pub use contact_message_repo::ContactMessageRepo;
pub use dashboard_repo::DashboardRepo;
pub use news_article_repo::NewsArticleRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
