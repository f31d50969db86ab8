//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope. Mutations additionally carry a
//! one-shot `notice` describing the outcome for display.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message for the caller to show once.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

/// `{ "data": T, "notice": {...} }` envelope for mutating operations.
#[derive(Debug, Serialize)]
pub struct NoticeResponse<T: Serialize> {
    pub data: T,
    pub notice: Notice,
}

impl<T: Serialize> NoticeResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            notice: Notice::success(message),
        }
    }
}
