//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?page=` for listings without a selectable filter.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

/// `?page=&filter=` for filterable admin listings. Unknown filter keys
/// are treated as `all`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub filter: Option<String>,
}

/// `?lang=` for the message export (`ar` or `en`).
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub lang: Option<String>,
}
