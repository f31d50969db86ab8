//! Repository for the `contact_messages` table.

use sqlx::PgPool;
use nps_core::filters::MessagePredicate;
use nps_core::types::{DbId, Timestamp};

use crate::models::contact_message::{ContactMessage, CreateContactMessage, MessageCounts};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject, email, message, created_at, is_read";

/// Filter clause over `$1` (is_read), `$2` (created_from), `$3` (created_before).
const PREDICATE: &str = "($1::BOOLEAN IS NULL OR is_read = $1)
     AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)
     AND ($3::TIMESTAMPTZ IS NULL OR created_at < $3)";

/// Provides CRUD and inbox operations for contact messages.
pub struct ContactMessageRepo;

impl ContactMessageRepo {
    /// Insert a new unread message, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (subject, email, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&input.subject)
            .bind(&input.email)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of messages matching `predicate`, newest first.
    pub async fn list(
        pool: &PgPool,
        predicate: &MessagePredicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages
             WHERE {PREDICATE}
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(predicate.is_read)
            .bind(predicate.created_from)
            .bind(predicate.created_before)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of messages matching `predicate`.
    pub async fn count(pool: &PgPool, predicate: &MessagePredicate) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM contact_messages WHERE {PREDICATE}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(predicate.is_read)
            .bind(predicate.created_from)
            .bind(predicate.created_before)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Unfiltered inbox counters. "Today" is `[today_start, today_start + 1 day)`.
    pub async fn counts(
        pool: &PgPool,
        today_start: Timestamp,
    ) -> Result<MessageCounts, sqlx::Error> {
        sqlx::query_as::<_, MessageCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread,
                COUNT(*) FILTER (WHERE is_read) AS \"read\",
                COUNT(*) FILTER (
                    WHERE created_at >= $1 AND created_at < $1 + INTERVAL '1 day'
                ) AS today
             FROM contact_messages",
        )
        .bind(today_start)
        .fetch_one(pool)
        .await
    }

    /// Every message, newest first (used by the CSV export).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent messages.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark a message read only if it is currently unread.
    ///
    /// Returns `true` if a row was written, so a second call is a no-op.
    pub async fn mark_read_if_unread(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE contact_messages SET is_read = true WHERE id = $1 AND is_read = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the read flag explicitly. Returns `None` if the message does not exist.
    pub async fn set_read(
        pool: &PgPool,
        id: DbId,
        is_read: bool,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET is_read = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(is_read)
            .fetch_optional(pool)
            .await
    }

    /// Flip the read flag in a single statement.
    pub async fn toggle_read(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET is_read = NOT is_read WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a message by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every message whose id is in `ids`. Unknown ids are ignored.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
