#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use nps_api::auth::jwt::{generate_access_token, JwtConfig};
use nps_api::auth::password::hash_password;
use nps_api::config::ServerConfig;
use nps_api::router::build_app_router;
use nps_api::state::AppState;
use nps_core::media::DEFAULT_MAX_IMAGE_BYTES;
use nps_db::models::user::{CreateUser, User};
use nps_db::repositories::{RoleRepo, UserRepo};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

const BOUNDARY: &str = "----nps-test-boundary";

/// Build a test `ServerConfig` with safe defaults rooted at `web_root`.
pub fn test_config(web_root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        web_root: web_root.to_path_buf(),
        max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        admin_bootstrap: None,
    }
}

/// The router under test plus the temporary web root it writes images to.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub web_root: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Whether a stored public image path exists on disk.
    pub fn image_exists(&self, public: &str) -> bool {
        self.web_root
            .path()
            .join(public.trim_start_matches('/'))
            .exists()
    }

    pub fn token_for(&self, user: &User, role: &str) -> String {
        generate_access_token(user.id, role, &self.config.jwt).expect("token generation")
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> TestApp {
    let web_root = tempfile::tempdir().expect("temp web root");
    let config = test_config(web_root.path());
    let state = AppState::new(pool, config.clone());
    TestApp {
        router: build_app_router(state, &config),
        config,
        web_root,
    }
}

/// Insert a user holding `role` and return the row.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .expect("role lookup")
        .expect("seeded role");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing"),
            role_id: role.id,
        },
    )
    .await
    .expect("user creation")
}

/// Create a user with `role` and return a bearer token for it.
pub async fn staff_token(app: &TestApp, pool: &PgPool, role: &str) -> String {
    let user = create_user(pool, &format!("{role}@example.org"), role).await;
    app.token_for(&user, role)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should not fail")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_inner(app, uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    post_json_inner(app, uri, body, Some(token)).await
}

async fn post_json_inner(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, token)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(
        app,
        builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// An image part for [`multipart`].
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: Vec<u8>,
}

/// Send a `multipart/form-data` request with text fields and an optional image.
pub async fn multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<FilePart<'_>>,
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    send(
        app,
        builder(method, uri, Some(token))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

pub fn png(size: usize) -> FilePart<'static> {
    FilePart {
        file_name: "photo.png",
        content_type: "image/png",
        bytes: vec![0x89; size],
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Read a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
