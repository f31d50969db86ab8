//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A full-replacement update DTO carrying the `row_version` it was read at

pub mod attachment;
pub mod contact_message;
pub mod dashboard;
pub mod news_article;
pub mod project;
pub mod role;
pub mod user;
