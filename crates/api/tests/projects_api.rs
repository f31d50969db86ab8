//! HTTP-level integration tests for projects.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, delete_auth, get, get_auth, multipart, png, post_auth, staff_token, FilePart,
};
use nps_core::roles::{ROLE_ADMIN, ROLE_EDITOR};
use sqlx::PgPool;

async fn create_project(
    app: &common::TestApp,
    token: &str,
    title: &str,
    fields: &[(&str, &str)],
) -> serde_json::Value {
    let mut all = vec![("title", title), ("description", "What we built")];
    all.extend_from_slice(fields);
    let response =
        multipart(app.app(), Method::POST, "/api/v1/admin/projects", token, &all, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_to_active_and_splits_tags(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;

    let project = create_project(&app, &editor, "Bridge", &[("tags", " steel, ,design ")]).await;
    assert_eq!(project["is_active"], true);
    assert_eq!(project["tags"], "steel,design");
    assert_eq!(project["tag_list"], serde_json::json!(["steel", "design"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_listing_shows_active_projects_by_completion(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;

    create_project(&app, &editor, "Earlier", &[("completion_date", "2024-05-01")]).await;
    create_project(&app, &editor, "Later", &[("completion_date", "2025-05-01")]).await;
    create_project(&app, &editor, "Undated", &[]).await;
    create_project(&app, &editor, "Hidden", &[("is_active", "false")]).await;

    let response = get(app.app(), "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Later", "Earlier", "Undated"]);
    assert_eq!(json["data"]["pagination"]["total_items"], 3);
    assert_eq!(json["data"]["pagination"]["page_size"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_filters_and_toggle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;
    let a = create_project(&app, &editor, "A", &[]).await;
    create_project(&app, &editor, "B", &[]).await;
    let a_id = a["id"].as_i64().unwrap();

    let response = post_auth(
        app.app(),
        &format!("/api/v1/admin/projects/{a_id}/toggle-active"),
        &editor,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], false);
    assert_eq!(json["notice"]["message"], "Project deactivated");

    let inactive = body_json(
        get_auth(app.app(), "/api/v1/admin/projects?filter=inactive", &editor).await,
    )
    .await;
    assert_eq!(inactive["data"]["filter"], "inactive");
    assert_eq!(inactive["data"]["items"][0]["title"], "A");
    assert_eq!(inactive["data"]["pagination"]["total_items"], 1);
    assert_eq!(inactive["data"]["counts"]["total"], 2);
    assert_eq!(inactive["data"]["counts"]["active"], 1);
    assert_eq!(inactive["data"]["counts"]["inactive"], 1);
    assert_eq!(inactive["data"]["counts"]["recent"], 2);

    let recent = body_json(
        get_auth(app.app(), "/api/v1/admin/projects?filter=RECENT", &editor).await,
    )
    .await;
    assert_eq!(recent["data"]["pagination"]["total_items"], 2);
    assert_eq!(recent["data"]["pagination"]["page_size"], 12);

    assert_eq!(
        post_auth(app.app(), "/api/v1/admin/projects/777777/toggle-active", &editor)
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_edits_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;
    let project = create_project(&app, &editor, "Shared", &[]).await;
    let id = project["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/projects/{id}");
    let loaded = project["row_version"].to_string();

    let first = multipart(
        app.app(),
        Method::PUT,
        &uri,
        &editor,
        &[
            ("title", "First writer"),
            ("description", "d"),
            ("row_version", loaded.as_str()),
        ],
        None,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["notice"]["message"], "Project updated");

    let second = multipart(
        app.app(),
        Method::PUT,
        &uri,
        &editor,
        &[
            ("title", "Second writer"),
            ("description", "d"),
            ("row_version", loaded.as_str()),
        ],
        None,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let stored = body_json(get_auth(app.app(), &uri, &editor).await).await;
    assert_eq!(stored["data"]["title"], "First writer");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rules_map_to_distinct_statuses(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;
    let fields = [("title", "Pictured"), ("description", "d")];

    let gif = FilePart {
        file_name: "anim.gif",
        content_type: "image/gif",
        bytes: vec![1; 10],
    };
    let response = multipart(
        app.app(),
        Method::POST,
        "/api/v1/admin/projects",
        &editor,
        &fields,
        Some(gif),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let response = multipart(
        app.app(),
        Method::POST,
        "/api/v1/admin/projects",
        &editor,
        &fields,
        Some(png(5 * 1024 * 1024 + 1)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn remove_image_flag_clears_file(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;

    let response = multipart(
        app.app(),
        Method::POST,
        "/api/v1/admin/projects",
        &editor,
        &[("title", "Pictured"), ("description", "d")],
        Some(png(16)),
    )
    .await;
    let project = body_json(response).await["data"].clone();
    let image = project["image_url"].as_str().unwrap().to_string();
    assert!(image.starts_with("/images/projects/"));
    assert!(app.image_exists(&image));

    let id = project["id"].as_i64().unwrap();
    let version = project["row_version"].to_string();
    let response = multipart(
        app.app(),
        Method::PUT,
        &format!("/api/v1/admin/projects/{id}"),
        &editor,
        &[
            ("title", "Pictured"),
            ("description", "d"),
            ("row_version", version.as_str()),
            ("remove_image", "true"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["image_url"].is_null());
    assert!(!app.image_exists(&image));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admin_deletes_and_the_image_goes_too(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = staff_token(&app, &pool, ROLE_EDITOR).await;
    let admin = staff_token(&app, &pool, ROLE_ADMIN).await;

    let response = multipart(
        app.app(),
        Method::POST,
        "/api/v1/admin/projects",
        &editor,
        &[("title", "Doomed"), ("description", "d")],
        Some(png(16)),
    )
    .await;
    let project = body_json(response).await["data"].clone();
    let id = project["id"].as_i64().unwrap();
    let image = project["image_url"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/admin/projects/{id}");

    assert_eq!(
        delete_auth(app.app(), &uri, Some(editor.as_str())).await.status(),
        StatusCode::FORBIDDEN
    );
    assert!(app.image_exists(&image));

    let response = delete_auth(app.app(), &uri, Some(admin.as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.image_exists(&image));
    assert_eq!(
        get_auth(app.app(), &uri, &admin).await.status(),
        StatusCode::NOT_FOUND
    );
}
