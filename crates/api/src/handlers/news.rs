//! Handlers for news articles: the public listing/detail and the staff
//! editor under `/admin/news`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use nps_core::authz::{Operation, Resource};
use nps_core::error::CoreError;
use nps_core::media::NEWS_IMAGE_FOLDER;
use nps_core::pagination::{PageMeta, PageWindow, PUBLIC_NEWS_PAGE_SIZE};
use nps_core::toggles::{publish_notice, toggle_publish};
use nps_core::types::DbId;
use nps_core::validation::{ensure_matching_id, validate_input};
use nps_db::models::news_article::{
    CreateNewsArticle, NewsArticle, NewsCounts, UpdateNewsArticle,
};
use nps_db::repositories::NewsArticleRepo;
use nps_db::versioned::Versioned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::form::{FieldErrors, FormData};
use crate::handlers::{not_found, Deleted};
use crate::media::ImageEdit;
use crate::middleware::auth::Caller;
use crate::query::PageParams;
use crate::response::{DataResponse, NoticeResponse};
use crate::state::AppState;

const ENTITY: &str = "NewsArticle";

/// Re-read attempts for a publish toggle that loses a version race.
const TOGGLE_ATTEMPTS: u32 = 3;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Public news page: the newest article is featured separately and the
/// paginated body starts after it.
#[derive(Debug, Serialize)]
pub struct PublicNewsPage {
    pub lead: Option<NewsArticle>,
    pub items: Vec<NewsArticle>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct AdminNewsList {
    pub items: Vec<NewsArticle>,
    pub counts: NewsCounts,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/news?page=
pub async fn list_public(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<PublicNewsPage>>> {
    caller.authorize(Resource::News, Operation::ListPublic)?;

    let now = Utc::now();
    let window = PageWindow::after_lead(params.page, PUBLIC_NEWS_PAGE_SIZE);
    let lead = NewsArticleRepo::lead_public(&state.pool, now).await?;
    let items =
        NewsArticleRepo::list_public(&state.pool, now, window.limit, window.offset).await?;
    let total = NewsArticleRepo::count_public(&state.pool, now).await?;

    Ok(Json(DataResponse {
        data: PublicNewsPage {
            lead,
            items,
            pagination: PageMeta::after_lead(&window, total),
        },
    }))
}

/// GET /api/v1/news/{id}
///
/// Drafts and articles dated in the future are reported as not found.
pub async fn get_public(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NewsArticle>>> {
    caller.authorize(Resource::News, Operation::ViewPublic)?;

    let article = NewsArticleRepo::find_public_by_id(&state.pool, id, Utc::now())
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: article }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/news
pub async fn list(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> AppResult<Json<DataResponse<AdminNewsList>>> {
    caller.authorize(Resource::News, Operation::List)?;

    let items = NewsArticleRepo::list_all(&state.pool).await?;
    let counts = NewsArticleRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse {
        data: AdminNewsList { items, counts },
    }))
}

/// GET /api/v1/admin/news/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NewsArticle>>> {
    caller.authorize(Resource::News, Operation::View)?;

    let article = NewsArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: article }))
}

/// POST /api/v1/admin/news (multipart)
pub async fn create(
    State(state): State<AppState>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<NoticeResponse<NewsArticle>>)> {
    caller.authorize(Resource::News, Operation::Create)?;

    let form = FormData::read(multipart).await?;
    let mut errors = FieldErrors::default();
    let published_date = errors.take(form.timestamp("published_date"));
    let is_published = errors.take(form.flag("is_published")).unwrap_or(false);
    errors.finish()?;

    let mut input = CreateNewsArticle {
        title: form.trimmed("title"),
        content: form.trimmed("content"),
        image_url: None,
        published_date,
        author: form.optional("author"),
        is_published,
    };
    validate_input(&input)?;

    let image = ImageEdit::stage(&state.media, None, form.image.as_ref(), false, NEWS_IMAGE_FOLDER)
        .await?;
    input.image_url = image.image_url.clone();

    let article = match NewsArticleRepo::create(&state.pool, &input).await {
        Ok(article) => article,
        Err(e) => {
            image.rollback(&state.media).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        id = article.id,
        user_id = ?caller.user_id(),
        is_published = article.is_published,
        "News article created"
    );
    Ok((
        StatusCode::CREATED,
        Json(NoticeResponse::success(article, "Article created")),
    ))
}

/// PUT /api/v1/admin/news/{id} (multipart)
///
/// Full-field edit guarded by `row_version`. Omitted `published_date` and
/// `is_published` keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<NoticeResponse<NewsArticle>>> {
    caller.authorize(Resource::News, Operation::Edit)?;

    let form = FormData::read(multipart).await?;
    let mut errors = FieldErrors::default();
    let payload_id = errors.take(form.id());
    let row_version = errors.take(form.integer("row_version"));
    let published_date = errors.take(form.timestamp("published_date"));
    let is_published = errors.take(form.flag("is_published"));
    let remove_image = errors.take(form.remove_image());
    errors.finish()?;

    ensure_matching_id(id, payload_id)?;
    let row_version = row_version.ok_or_else(|| {
        CoreError::Validation("row_version is required when editing an article".into())
    })?;

    let current = NewsArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    let mut input = UpdateNewsArticle {
        title: form.trimmed("title"),
        content: form.trimmed("content"),
        image_url: None,
        published_date: published_date.unwrap_or(current.published_date),
        author: form.optional("author"),
        is_published: is_published.unwrap_or(current.is_published),
        row_version,
    };
    validate_input(&input)?;

    let image = ImageEdit::stage(
        &state.media,
        current.image_url,
        form.image.as_ref(),
        remove_image,
        NEWS_IMAGE_FOLDER,
    )
    .await?;
    input.image_url = image.image_url.clone();

    let outcome = NewsArticleRepo::update(&state.pool, id, &input)
        .await
        .map_err(AppError::from)
        .and_then(|v| v.into_result(ENTITY, id).map_err(AppError::from));
    let article = match outcome {
        Ok(article) => {
            image.commit(&state.media).await;
            article
        }
        Err(e) => {
            image.rollback(&state.media).await;
            return Err(e);
        }
    };

    tracing::info!(id, user_id = ?caller.user_id(), "News article updated");
    Ok(Json(NoticeResponse::success(article, "Article updated")))
}

/// DELETE /api/v1/admin/news/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<Deleted>>> {
    caller.authorize(Resource::News, Operation::Delete)?;

    let removed = NewsArticleRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    state.media.delete_image(removed.image_url.as_deref()).await;

    tracing::info!(id, user_id = ?caller.user_id(), "News article deleted");
    Ok(Json(NoticeResponse::success(Deleted { id }, "Article deleted")))
}

/// POST /api/v1/admin/news/{id}/toggle-publish
///
/// A stale draft is re-dated to now when it gets published. A concurrent
/// write to the same article makes the toggle re-read and flip again, up to
/// [`TOGGLE_ATTEMPTS`] times, before reporting a conflict.
pub async fn toggle_publish_state(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoticeResponse<NewsArticle>>> {
    caller.authorize(Resource::News, Operation::Toggle)?;

    let mut attempt = 1;
    let article = loop {
        let current = NewsArticleRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(ENTITY, id))?;
        let next = toggle_publish(current.publish_state(), Utc::now());

        match NewsArticleRepo::set_publish_state(&state.pool, id, next, current.row_version)
            .await?
        {
            Versioned::Conflict if attempt < TOGGLE_ATTEMPTS => {
                tracing::debug!(id, attempt, "Publish toggle raced another write; retrying");
                attempt += 1;
            }
            outcome => break outcome.into_result(ENTITY, id)?,
        }
    };

    tracing::info!(
        id,
        user_id = ?caller.user_id(),
        is_published = article.is_published,
        "News publish state toggled"
    );
    let notice = publish_notice(article.is_published);
    Ok(Json(NoticeResponse::success(article, notice)))
}
