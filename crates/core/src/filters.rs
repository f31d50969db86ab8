//! Listing filter keys and the predicates they select.
//!
//! Filters are single-select. Keys are matched case-insensitively and an
//! unrecognized key falls back to `all` instead of failing the request. The
//! resulting predicate is plain data (optional flag + optional time bounds)
//! which the repositories bind into SQL, so filtering happens before both
//! counting and sorting.
//!
//! All calendar arithmetic is in UTC.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::types::Timestamp;

/// Days covered by the `week` message filter (counted from today's midnight).
pub const WEEK_FILTER_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// Midnight (UTC) of the day containing `now`.
pub fn start_of_day(now: Timestamp) -> Timestamp {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Midnight (UTC) of the first day of the month containing `now`.
pub fn start_of_month(now: Timestamp) -> Timestamp {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// `now` minus one calendar month (clamped to the shorter month's end).
pub fn one_month_before(now: Timestamp) -> Timestamp {
    now.checked_sub_months(Months::new(1))
        .unwrap_or(now - Duration::days(30))
}

// ---------------------------------------------------------------------------
// Contact messages
// ---------------------------------------------------------------------------

/// Filter keys for the admin message inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Read,
    Today,
    Week,
}

impl MessageFilter {
    /// Parse a filter key. Unknown or missing keys mean [`MessageFilter::All`].
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("unread") => Self::Unread,
            Some("read") => Self::Read,
            Some("today") => Self::Today,
            Some("week") => Self::Week,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Today => "today",
            Self::Week => "week",
        }
    }

    /// The predicate this key selects, evaluated at `now`.
    pub fn predicate(&self, now: Timestamp) -> MessagePredicate {
        let today = start_of_day(now);
        match self {
            Self::All => MessagePredicate::default(),
            Self::Unread => MessagePredicate {
                is_read: Some(false),
                ..Default::default()
            },
            Self::Read => MessagePredicate {
                is_read: Some(true),
                ..Default::default()
            },
            Self::Today => MessagePredicate {
                created_from: Some(today),
                created_before: Some(today + Duration::days(1)),
                ..Default::default()
            },
            Self::Week => MessagePredicate {
                created_from: Some(today - Duration::days(WEEK_FILTER_DAYS)),
                ..Default::default()
            },
        }
    }
}

/// Row predicate for contact messages. `None` fields do not constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessagePredicate {
    pub is_read: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Exclusive upper bound on `created_at`.
    pub created_before: Option<Timestamp>,
}

impl MessagePredicate {
    /// Evaluate the predicate against a single row's fields.
    #[cfg(test)]
    pub fn matches(&self, is_read: bool, created_at: Timestamp) -> bool {
        self.is_read.map_or(true, |wanted| wanted == is_read)
            && self.created_from.map_or(true, |from| created_at >= from)
            && self.created_before.map_or(true, |before| created_at < before)
    }
}

// ---------------------------------------------------------------------------
// Projects (admin listing)
// ---------------------------------------------------------------------------

/// Filter keys for the admin project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectFilter {
    #[default]
    All,
    Active,
    Inactive,
    Recent,
}

impl ProjectFilter {
    /// Parse a filter key. Unknown or missing keys mean [`ProjectFilter::All`].
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("active") => Self::Active,
            Some("inactive") => Self::Inactive,
            Some("recent") => Self::Recent,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Recent => "recent",
        }
    }

    pub fn predicate(&self, now: Timestamp) -> ProjectPredicate {
        match self {
            Self::All => ProjectPredicate::default(),
            Self::Active => ProjectPredicate {
                is_active: Some(true),
                ..Default::default()
            },
            Self::Inactive => ProjectPredicate {
                is_active: Some(false),
                ..Default::default()
            },
            Self::Recent => ProjectPredicate {
                created_from: Some(one_month_before(now)),
                ..Default::default()
            },
        }
    }
}

/// Row predicate for projects. `None` fields do not constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectPredicate {
    pub is_active: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
}

impl ProjectPredicate {
    #[cfg(test)]
    pub fn matches(&self, is_active: bool, created_at: Timestamp) -> bool {
        self.is_active.map_or(true, |wanted| wanted == is_active)
            && self.created_from.map_or(true, |from| created_at >= from)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    const ALL_MESSAGE_FILTERS: [MessageFilter; 5] = [
        MessageFilter::All,
        MessageFilter::Unread,
        MessageFilter::Read,
        MessageFilter::Today,
        MessageFilter::Week,
    ];

    #[test]
    fn message_keys_parse_case_insensitively() {
        assert_eq!(MessageFilter::from_key(Some("UNREAD")), MessageFilter::Unread);
        assert_eq!(MessageFilter::from_key(Some(" week ")), MessageFilter::Week);
        for filter in ALL_MESSAGE_FILTERS {
            assert_eq!(MessageFilter::from_key(Some(filter.as_str())), filter);
        }
    }

    #[test]
    fn unknown_message_key_means_all() {
        assert_eq!(MessageFilter::from_key(Some("starred")), MessageFilter::All);
        assert_eq!(MessageFilter::from_key(Some("")), MessageFilter::All);
        assert_eq!(MessageFilter::from_key(None), MessageFilter::All);
    }

    #[test]
    fn today_covers_midnight_to_midnight() {
        let now = at(2026, 3, 10, 15, 30);
        let p = MessageFilter::Today.predicate(now);
        assert!(p.matches(false, at(2026, 3, 10, 0, 0)));
        assert!(p.matches(true, at(2026, 3, 10, 23, 59)));
        assert!(!p.matches(false, at(2026, 3, 9, 23, 59)));
        assert!(!p.matches(false, at(2026, 3, 11, 0, 0)));
    }

    #[test]
    fn week_starts_seven_days_before_today_midnight() {
        let now = at(2026, 3, 10, 15, 30);
        let p = MessageFilter::Week.predicate(now);
        assert!(p.matches(false, at(2026, 3, 3, 0, 0)));
        assert!(!p.matches(false, at(2026, 3, 2, 23, 59)));
        assert!(p.matches(true, now));
    }

    #[test]
    fn read_flags_select_by_state() {
        let now = at(2026, 3, 10, 12, 0);
        assert!(MessageFilter::Unread.predicate(now).matches(false, now));
        assert!(!MessageFilter::Unread.predicate(now).matches(true, now));
        assert!(MessageFilter::Read.predicate(now).matches(true, now));
        assert!(!MessageFilter::Read.predicate(now).matches(false, now));
    }

    #[test]
    fn every_message_filter_selects_a_subset_of_all() {
        let now = at(2026, 3, 10, 12, 0);
        let rows: Vec<(bool, Timestamp)> = (0..40)
            .map(|i| (i % 3 == 0, now - Duration::hours(i * 7)))
            .collect();

        let all: Vec<_> = rows
            .iter()
            .filter(|(r, c)| MessageFilter::All.predicate(now).matches(*r, *c))
            .collect();
        assert_eq!(all.len(), rows.len());

        for filter in ALL_MESSAGE_FILTERS {
            let predicate = filter.predicate(now);
            let filtered: Vec<_> = rows
                .iter()
                .filter(|(r, c)| predicate.matches(*r, *c))
                .collect();
            assert!(filtered.len() <= all.len(), "{filter:?}");
            assert!(filtered.iter().all(|row| all.contains(row)), "{filter:?}");
        }
    }

    #[test]
    fn project_keys_parse_and_fall_back() {
        assert_eq!(ProjectFilter::from_key(Some("Active")), ProjectFilter::Active);
        assert_eq!(ProjectFilter::from_key(Some("inactive")), ProjectFilter::Inactive);
        assert_eq!(ProjectFilter::from_key(Some("recent")), ProjectFilter::Recent);
        assert_eq!(ProjectFilter::from_key(Some("archived")), ProjectFilter::All);
    }

    #[test]
    fn recent_projects_are_within_one_calendar_month() {
        let now = at(2026, 3, 31, 9, 0);
        let p = ProjectFilter::Recent.predicate(now);
        // March 31 minus one month clamps to February 28.
        assert_eq!(p.created_from, Some(at(2026, 2, 28, 9, 0)));
        assert!(p.matches(false, at(2026, 3, 1, 0, 0)));
        assert!(!p.matches(true, at(2026, 2, 27, 9, 0)));
    }

    #[test]
    fn active_filters_ignore_creation_time() {
        let now = at(2026, 3, 10, 12, 0);
        let old = at(2020, 1, 1, 0, 0);
        assert!(ProjectFilter::Active.predicate(now).matches(true, old));
        assert!(!ProjectFilter::Active.predicate(now).matches(false, now));
        assert!(ProjectFilter::Inactive.predicate(now).matches(false, old));
    }

    #[test]
    fn calendar_helpers() {
        let now = at(2026, 3, 10, 15, 30);
        assert_eq!(start_of_day(now), at(2026, 3, 10, 0, 0));
        assert_eq!(start_of_month(now), at(2026, 3, 1, 0, 0));
    }
}
