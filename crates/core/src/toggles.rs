//! Boolean state flags: publish, active and read.
//!
//! Each flag is a two-state machine flipped directly. Publishing carries one
//! side effect: an article whose publish date went stale while it sat as a
//! draft is re-dated to "now" at the moment it is published. Unpublishing
//! never restores the previous date.

use chrono::Duration;

use crate::types::Timestamp;

/// A publish date older than this many hours counts as stale when publishing.
pub const STALE_PUBLISH_DATE_HOURS: i64 = 24;

/// Publish-related fields of a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishState {
    pub is_published: bool,
    pub published_date: Timestamp,
}

/// Flip the publish flag, re-dating a stale article when it becomes published.
pub fn toggle_publish(state: PublishState, now: Timestamp) -> PublishState {
    let is_published = !state.is_published;
    let stale_before = now - Duration::hours(STALE_PUBLISH_DATE_HOURS);
    let published_date = if is_published && state.published_date < stale_before {
        now
    } else {
        state.published_date
    };
    PublishState {
        is_published,
        published_date,
    }
}

/// Whether opening a message's detail view has to persist a read flag.
pub fn needs_auto_mark_read(is_read: bool) -> bool {
    !is_read
}

pub fn publish_notice(is_published: bool) -> &'static str {
    if is_published {
        "Article published"
    } else {
        "Article moved to drafts"
    }
}

pub fn active_notice(is_active: bool) -> &'static str {
    if is_active {
        "Project activated"
    } else {
        "Project deactivated"
    }
}

pub fn read_notice(is_read: bool) -> &'static str {
    if is_read {
        "Message marked as read"
    } else {
        "Message marked as unread"
    }
}
