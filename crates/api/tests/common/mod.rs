#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use schoolerp_api::auth::jwt::{generate_access_token, JwtConfig};
use schoolerp_api::auth::password::hash_password;
use schoolerp_api::config::{AdminCredentials, OrphanSweepConfig, ServerConfig};
use schoolerp_api::router::build_app_router;
use schoolerp_api::state::AppState;
use schoolerp_core::profile::ServingOrigin;
use schoolerp_storage::{ImageStore, MemoryImageStore, StorageSettings};

pub const ADMIN_EMAIL: &str = "admin@school.example";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const PUBLIC_ORIGIN: &str = "https://app.example";
pub const MEDIA_BASE_URL: &str = "https://cdn.example/media";

/// Argon2 hashing is slow; hash the test password once per test binary.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_body_bytes: 16 * 1024 * 1024,
        public_origin: ServingOrigin::parse(PUBLIC_ORIGIN).unwrap(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password_hash: admin_password_hash(),
        },
        storage: StorageSettings::Memory {
            public_base_url: MEDIA_BASE_URL.to_string(),
        },
        orphan_sweep: OrphanSweepConfig {
            interval_secs: 0,
            grace_mins: 60,
        },
    }
}

/// The application under test plus handles the tests inspect.
pub struct TestApp {
    router: Router,
    pub config: ServerConfig,
    pub images: Arc<MemoryImageStore>,
}

impl TestApp {
    /// A fresh handle to the router (`oneshot` consumes it).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// A valid admin bearer token.
    pub fn admin_token(&self) -> String {
        token_with_role(&self.config, "admin")
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and an in-memory image store.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let images = Arc::new(MemoryImageStore::new(MEDIA_BASE_URL));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::clone(&images) as Arc<dyn ImageStore>,
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        images,
    }
}

/// Build the router around a caller-chosen image store, e.g. a local
/// directory when a test needs the `/media` file server.
pub fn build_app_with_store(
    pool: PgPool,
    config: &ServerConfig,
    images: Arc<dyn ImageStore>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images,
    };
    build_app_router(state, config)
}

pub fn token_with_role(config: &ServerConfig, role: &str) -> String {
    generate_access_token(ADMIN_EMAIL, role, &config.jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart forms
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "schoolerp-test-boundary";

/// One part of a `multipart/form-data` body.
pub enum Part {
    Text(&'static str, String),
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    },
}

pub fn text(name: &'static str, value: &str) -> Part {
    Part::Text(name, value.to_string())
}

/// A small PNG-typed file part. The store never decodes image bytes.
pub fn png(name: &'static str, file_name: &'static str) -> Part {
    Part::File {
        name,
        file_name,
        content_type: "image/png",
        data: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3],
    }
}

fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: Vec<Part>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
