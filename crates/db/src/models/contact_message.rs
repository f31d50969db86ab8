//! Contact message entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use nps_core::export::CsvMessage;
use nps_core::types::{DbId, Timestamp};

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub subject: String,
    pub email: String,
    pub message: String,
    pub created_at: Timestamp,
    pub is_read: bool,
}

impl ContactMessage {
    pub fn as_csv(&self) -> CsvMessage<'_> {
        CsvMessage {
            id: self.id,
            subject: &self.subject,
            email: &self.email,
            message: &self.message,
            created_at: self.created_at,
            is_read: self.is_read,
        }
    }
}

/// DTO for an anonymous contact-form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactMessage {
    #[validate(length(min = 1, max = 200, message = "Subject is required (max 200 characters)"))]
    pub subject: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 2000, message = "Message is required (max 2000 characters)"))]
    pub message: String,
}

impl CreateContactMessage {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            subject: self.subject.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Inbox counters shown above the admin message list.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct MessageCounts {
    pub total: i64,
    pub unread: i64,
    pub read: i64,
    pub today: i64,
}

/// Body of a bulk-delete request.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteMessages {
    pub ids: Vec<DbId>,
}
