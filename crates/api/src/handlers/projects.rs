//! Handlers for projects: the public portfolio and the staff editor under
//! `/admin/projects`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use nps_core::authz::{Operation, Resource};
use nps_core::error::CoreError;
use nps_core::filters::{one_month_before, ProjectFilter};
use nps_core::media::PROJECT_IMAGE_FOLDER;
use nps_core::pagination::{
    Page, PageMeta, PageWindow, ADMIN_PROJECTS_PAGE_SIZE, PUBLIC_PROJECTS_PAGE_SIZE,
};
use nps_core::tags::normalize_tags;
use nps_core::toggles::active_notice;
use nps_core::types::DbId;
use nps_core::validation::{ensure_matching_id, validate_input};
use nps_db::models::project::{CreateProject, ProjectCounts, ProjectResponse, UpdateProject};
use nps_db::repositories::ProjectRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::form::{FieldErrors, FormData};
use crate::handlers::{not_found, Deleted};
use crate::media::ImageEdit;
use crate::middleware::auth::Caller;
use crate::query::{ListParams, PageParams};
use crate::response::{DataResponse, NoticeResponse};
use crate::state::AppState;

const ENTITY: &str = "Project";

#[derive(Debug, Serialize)]
pub struct AdminProjectList {
    pub filter: ProjectFilter,
    #[serde(flatten)]
    pub page: Page<ProjectResponse>,
    pub counts: ProjectCounts,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/projects?page=
///
/// Active projects only, most recently completed first.
pub async fn list_public(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<ProjectResponse>>>> {
    caller.authorize(Resource::Project, Operation::ListPublic)?;

    let window = PageWindow::new(params.page, PUBLIC_PROJECTS_PAGE_SIZE);
    let rows = ProjectRepo::list_public(&state.pool, window.limit, window.offset).await?;
    let total = ProjectRepo::count_public(&state.pool).await?;

    Ok(Json(DataResponse {
        data: Page {
            items: rows.into_iter().map(ProjectResponse::from).collect(),
            pagination: PageMeta::new(&window, total),
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects?page=&filter=
pub async fn list(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<AdminProjectList>>> {
    caller.authorize(Resource::Project, Operation::List)?;

    let now = Utc::now();
    let filter = ProjectFilter::from_key(params.filter.as_deref());
    let predicate = filter.predicate(now);
    let window = PageWindow::new(params.page, ADMIN_PROJECTS_PAGE_SIZE);

    let rows = ProjectRepo::list(&state.pool, &predicate, window.limit, window.offset).await?;
    let total = ProjectRepo::count(&state.pool, &predicate).await?;
    let counts = ProjectRepo::counts(&state.pool, one_month_before(now)).await?;

    Ok(Json(DataResponse {
        data: AdminProjectList {
            filter,
            page: Page {
                items: rows.into_iter().map(ProjectResponse::from).collect(),
                pagination: PageMeta::new(&window, total),
            },
            counts,
        },
    }))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectResponse>>> {
    caller.authorize(Resource::Project, Operation::View)?;

    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(Json(DataResponse {
        data: project.into(),
    }))
}

/// POST /api/v1/admin/projects (multipart)
pub async fn create(
    State(state): State<AppState>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<NoticeResponse<ProjectResponse>>)> {
    caller.authorize(Resource::Project, Operation::Create)?;

    let form = FormData::read(multipart).await?;
    let mut errors = FieldErrors::default();
    let completion_date = errors.take(form.timestamp("completion_date"));
    let is_active = errors.take(form.flag("is_active")).unwrap_or(true);
    errors.finish()?;

    let mut input = CreateProject {
        title: form.trimmed("title"),
        description: form.trimmed("description"),
        image_url: None,
        tags: normalize_tags(form.text("tags")),
        completion_date,
        is_active,
    };
    validate_input(&input)?;

    let image =
        ImageEdit::stage(&state.media, None, form.image.as_ref(), false, PROJECT_IMAGE_FOLDER)
            .await?;
    input.image_url = image.image_url.clone();

    let project = match ProjectRepo::create(&state.pool, &input).await {
        Ok(project) => project,
        Err(e) => {
            image.rollback(&state.media).await;
            return Err(e.into());
        }
    };

    tracing::info!(id = project.id, user_id = ?caller.user_id(), "Project created");
    Ok((
        StatusCode::CREATED,
        Json(NoticeResponse::success(project.into(), "Project created")),
    ))
}

/// PUT /api/v1/admin/projects/{id} (multipart)
///
/// Full-field edit guarded by `row_version`. An omitted `is_active` keeps
/// the stored value; an omitted `completion_date` clears it.
pub async fn update(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<NoticeResponse<ProjectResponse>>> {
    caller.authorize(Resource::Project, Operation::Edit)?;

    let form = FormData::read(multipart).await?;
    let mut errors = FieldErrors::default();
    let payload_id = errors.take(form.id());
    let row_version = errors.take(form.integer("row_version"));
    let completion_date = errors.take(form.timestamp("completion_date"));
    let is_active = errors.take(form.flag("is_active"));
    let remove_image = errors.take(form.remove_image());
    errors.finish()?;

    ensure_matching_id(id, payload_id)?;
    let row_version = row_version.ok_or_else(|| {
        CoreError::Validation("row_version is required when editing a project".into())
    })?;

    let current = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    let mut input = UpdateProject {
        title: form.trimmed("title"),
        description: form.trimmed("description"),
        image_url: None,
        tags: normalize_tags(form.text("tags")),
        completion_date,
        is_active: is_active.unwrap_or(current.is_active),
        row_version,
    };
    validate_input(&input)?;

    let image = ImageEdit::stage(
        &state.media,
        current.image_url,
        form.image.as_ref(),
        remove_image,
        PROJECT_IMAGE_FOLDER,
    )
    .await?;
    input.image_url = image.image_url.clone();

    let outcome = ProjectRepo::update(&state.pool, id, &input)
        .await
        .map_err(AppError::from)
        .and_then(|v| v.into_result(ENTITY, id).map_err(AppError::from));
    let project = match outcome {
        Ok(project) => {
            image.commit(&state.media).await;
            project
        }
        Err(e) => {
            image.rollback(&state.media).await;
            return Err(e);
        }
    };

    tracing::info!(id, user_id = ?caller.user_id(), "Project updated");
    Ok(Json(NoticeResponse::success(project.into(), "Project updated")))
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<Deleted>>> {
    caller.authorize(Resource::Project, Operation::Delete)?;

    let removed = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    state.media.delete_image(removed.image_url.as_deref()).await;

    tracing::info!(id, user_id = ?caller.user_id(), "Project deleted");
    Ok(Json(NoticeResponse::success(Deleted { id }, "Project deleted")))
}

/// POST /api/v1/admin/projects/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<ProjectResponse>>> {
    caller.authorize(Resource::Project, Operation::Toggle)?;

    let project = ProjectRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    tracing::info!(
        id,
        user_id = ?caller.user_id(),
        is_active = project.is_active,
        "Project active state toggled"
    );
    let notice = active_notice(project.is_active);
    Ok(Json(NoticeResponse::success(project.into(), notice)))
}
