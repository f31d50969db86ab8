//! Handlers for contact messages: the public submission form and the admin
//! inbox under `/admin/contact`.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use nps_core::authz::{Operation, Resource};
use nps_core::error::CoreError;
use nps_core::export::{build_messages_csv, export_file_name, ExportLocale};
use nps_core::filters::{start_of_day, MessageFilter};
use nps_core::pagination::{Page, PageMeta, PageWindow, MESSAGES_PAGE_SIZE};
use nps_core::toggles::{needs_auto_mark_read, read_notice};
use nps_core::types::DbId;
use nps_core::validation::validate_input;
use nps_db::models::contact_message::{
    BulkDeleteMessages, ContactMessage, CreateContactMessage, MessageCounts,
};
use nps_db::repositories::ContactMessageRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{not_found, Deleted};
use crate::middleware::auth::Caller;
use crate::query::{ExportParams, ListParams};
use crate::response::{DataResponse, NoticeResponse};
use crate::state::AppState;

const ENTITY: &str = "ContactMessage";

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct Inbox {
    pub filter: MessageFilter,
    #[serde(flatten)]
    pub page: Page<ContactMessage>,
    pub counts: MessageCounts,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleted {
    pub requested: usize,
    pub deleted: u64,
}

/// POST /api/v1/contact
pub async fn submit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<NoticeResponse<ContactMessage>>)> {
    caller.authorize(Resource::ContactMessage, Operation::Submit)?;

    let input = input.trimmed();
    validate_input(&input)?;
    let message = ContactMessageRepo::create(&state.pool, &input).await?;

    tracing::info!(id = message.id, "Contact message received");
    Ok((
        StatusCode::CREATED,
        Json(NoticeResponse::success(
            message,
            "Thank you, your message has been sent",
        )),
    ))
}

/// GET /api/v1/admin/contact?page=&filter=
pub async fn list(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Inbox>>> {
    caller.authorize(Resource::ContactMessage, Operation::List)?;

    let now = Utc::now();
    let filter = MessageFilter::from_key(params.filter.as_deref());
    let predicate = filter.predicate(now);
    let window = PageWindow::new(params.page, MESSAGES_PAGE_SIZE);

    let items =
        ContactMessageRepo::list(&state.pool, &predicate, window.limit, window.offset).await?;
    let total = ContactMessageRepo::count(&state.pool, &predicate).await?;
    let counts = ContactMessageRepo::counts(&state.pool, start_of_day(now)).await?;

    Ok(Json(DataResponse {
        data: Inbox {
            filter,
            page: Page {
                items,
                pagination: PageMeta::new(&window, total),
            },
            counts,
        },
    }))
}

/// GET /api/v1/admin/contact/{id}
///
/// Viewing an unread message marks it read. If that write fails the
/// message is still returned.
pub async fn get_by_id(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    caller.authorize(Resource::ContactMessage, Operation::View)?;

    let mut message = ContactMessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    if needs_auto_mark_read(message.is_read) {
        match ContactMessageRepo::mark_read_if_unread(&state.pool, id).await {
            Ok(_) => message.is_read = true,
            Err(e) => tracing::warn!(id, error = %e, "Failed to mark message as read"),
        }
    }

    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/admin/contact/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<Deleted>>> {
    caller.authorize(Resource::ContactMessage, Operation::Delete)?;

    if !ContactMessageRepo::delete(&state.pool, id).await? {
        return Err(not_found(ENTITY, id));
    }

    tracing::info!(id, user_id = ?caller.user_id(), "Contact message deleted");
    Ok(Json(NoticeResponse::success(Deleted { id }, "Message deleted")))
}

/// POST /api/v1/admin/contact/bulk-delete
///
/// The batch either succeeds as a whole or is reported as one failure.
pub async fn bulk_delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(input): Json<BulkDeleteMessages>,
) -> AppResult<Json<NoticeResponse<BulkDeleted>>> {
    caller.authorize(Resource::ContactMessage, Operation::BulkDelete)?;

    if input.ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No messages selected".into(),
        )));
    }

    let deleted = ContactMessageRepo::delete_many(&state.pool, &input.ids)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, count = input.ids.len(), "Bulk delete failed");
            AppError::OperationFailed("Failed to delete the selected messages".into())
        })?;

    tracing::info!(
        user_id = ?caller.user_id(),
        requested = input.ids.len(),
        deleted,
        "Contact messages bulk deleted"
    );
    Ok(Json(NoticeResponse::success(
        BulkDeleted {
            requested: input.ids.len(),
            deleted,
        },
        format!("{deleted} message(s) deleted"),
    )))
}

/// GET /api/v1/admin/contact/export?lang=
pub async fn export(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    caller.authorize(Resource::ContactMessage, Operation::Export)?;

    let locale = ExportLocale::from_key(params.lang.as_deref());
    let messages = ContactMessageRepo::list_all(&state.pool).await?;
    let rows: Vec<_> = messages.iter().map(ContactMessage::as_csv).collect();
    let body = build_messages_csv(&rows, locale);
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(Utc::now()));

    tracing::info!(user_id = ?caller.user_id(), rows = rows.len(), "Contact messages exported");
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/v1/admin/contact/{id}/mark-read
pub async fn mark_read(
    state: State<AppState>,
    caller: Caller,
    path: Path<DbId>,
) -> AppResult<Json<NoticeResponse<ContactMessage>>> {
    set_read(state, caller, path, true).await
}

/// POST /api/v1/admin/contact/{id}/mark-unread
pub async fn mark_unread(
    state: State<AppState>,
    caller: Caller,
    path: Path<DbId>,
) -> AppResult<Json<NoticeResponse<ContactMessage>>> {
    set_read(state, caller, path, false).await
}

async fn set_read(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
    is_read: bool,
) -> AppResult<Json<NoticeResponse<ContactMessage>>> {
    caller.authorize(Resource::ContactMessage, Operation::Toggle)?;

    let message = ContactMessageRepo::set_read(&state.pool, id, is_read)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    tracing::info!(id, user_id = ?caller.user_id(), is_read, "Message read flag set");
    Ok(Json(NoticeResponse::success(message, read_notice(is_read))))
}

/// POST /api/v1/admin/contact/{id}/toggle-read
pub async fn toggle_read(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<ContactMessage>>> {
    caller.authorize(Resource::ContactMessage, Operation::Toggle)?;

    let message = ContactMessageRepo::toggle_read(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    tracing::info!(
        id,
        user_id = ?caller.user_id(),
        is_read = message.is_read,
        "Message read flag toggled"
    );
    let notice = read_notice(message.is_read);
    Ok(Json(NoticeResponse::success(message, notice)))
}
