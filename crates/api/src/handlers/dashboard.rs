//! Handler for the admin dashboard.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use nps_core::authz::{Operation, Resource};
use nps_core::filters::{start_of_day, start_of_month, WEEK_FILTER_DAYS};
use nps_db::models::dashboard::DashboardSummary;
use nps_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard
pub async fn summary(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    caller.authorize(Resource::Dashboard, Operation::View)?;

    let now = Utc::now();
    let today = start_of_day(now);
    let summary = DashboardRepo::summary(
        &state.pool,
        today,
        today - Duration::days(WEEK_FILTER_DAYS),
        start_of_month(now),
    )
    .await?;

    Ok(Json(DataResponse { data: summary }))
}
