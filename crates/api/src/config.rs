use std::path::PathBuf;

use nps_core::media::DEFAULT_MAX_IMAGE_BYTES;

use crate::auth::jwt::JwtConfig;

/// Multipart overhead allowed on top of the image limit.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Public web root; uploaded images live under `<web_root>/images/`.
    pub web_root: PathBuf,
    /// Maximum accepted image size in bytes (default: 5 MiB).
    pub max_image_bytes: u64,
    /// Admin account to create or refresh at startup, if configured.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `WEB_ROOT`             | `wwwroot`                  |
    /// | `MAX_IMAGE_BYTES`      | `5242880`                  |
    /// | `ADMIN_EMAIL`          | unset (no bootstrap)       |
    /// | `ADMIN_PASSWORD`       | unset (no bootstrap)       |
    /// | `ADMIN_FULL_NAME`      | `Administrator`            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let web_root =
            PathBuf::from(std::env::var("WEB_ROOT").unwrap_or_else(|_| "wwwroot".into()));

        let max_image_bytes: u64 = std::env::var("MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_IMAGE_BYTES.to_string())
            .parse()
            .expect("MAX_IMAGE_BYTES must be a valid u64");

        let admin_bootstrap = match (
            std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email: email.trim().to_string(),
                password,
                full_name: std::env::var("ADMIN_FULL_NAME")
                    .unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            web_root,
            max_image_bytes,
            admin_bootstrap,
        }
    }

    /// Request body limit: one image plus form overhead.
    pub fn body_limit_bytes(&self) -> usize {
        usize::try_from(self.max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES))
            .unwrap_or(usize::MAX)
    }
}
