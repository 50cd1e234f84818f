use std::path::PathBuf;

use schoolerp_core::profile::ServingOrigin;
use schoolerp_storage::StorageSettings;

use crate::auth::jwt::JwtConfig;

/// Default cap on a whole request body; photo uploads are multipart and far
/// larger than any JSON request.
const DEFAULT_MAX_UPLOAD_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// Everything except the secrets has a default suitable for local
/// development. In production, override via environment variables.
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
    /// Largest accepted request body in bytes (default: 16 MiB).
    pub max_upload_body_bytes: usize,
    /// Origin encoded into every QR code. Printed codes depend on it, so it
    /// must stay stable across deployments.
    pub public_origin: ServingOrigin,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// The single administrator identity.
    pub admin: AdminCredentials,
    /// Photo storage backend.
    pub storage: StorageSettings,
    /// Orphaned photo cleanup.
    pub orphan_sweep: OrphanSweepConfig,
}

/// Login credentials for the administrator.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Schedule for [`crate::background::orphan_sweep`].
#[derive(Debug, Clone, Copy)]
pub struct OrphanSweepConfig {
    /// Seconds between sweeps; `0` disables the job.
    pub interval_secs: u64,
    /// Objects younger than this are never swept.
    pub grace_mins: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                   |
    /// |------------------------------|---------------------------|
    /// | `HOST`                       | `0.0.0.0`                 |
    /// | `PORT`                       | `3000`                    |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                      |
    /// | `MAX_UPLOAD_BODY_BYTES`      | `16777216`                |
    /// | `PUBLIC_ORIGIN`              | `http://localhost:3000`   |
    /// | `ADMIN_EMAIL`                | **required**              |
    /// | `ADMIN_PASSWORD_HASH`        | **required**              |
    /// | `STORAGE_BACKEND`            | `local`                   |
    /// | `STORAGE_LOCAL_ROOT`         | `storage/media`           |
    /// | `STORAGE_PUBLIC_BASE_URL`    | `{PUBLIC_ORIGIN}/media`   |
    /// | `S3_ENDPOINT_URL`            | unset (AWS endpoints)     |
    /// | `ORPHAN_SWEEP_INTERVAL_SECS` | `3600`                    |
    /// | `ORPHAN_GRACE_MINS`          | `60`                      |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any malformed or missing required value, so a misconfigured
    /// server never starts.
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

        let max_upload_body_bytes: usize = std::env::var("MAX_UPLOAD_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BODY_BYTES must be a valid usize");

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".into());
        let public_origin = ServingOrigin::parse(&public_origin)
            .unwrap_or_else(|e| panic!("PUBLIC_ORIGIN is invalid: {e}"));

        let admin = AdminCredentials {
            email: std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set"),
            password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .expect("ADMIN_PASSWORD_HASH must be set (see `schoolerp-api hash-password`)"),
        };
        assert!(
            admin.password_hash.starts_with("$argon2"),
            "ADMIN_PASSWORD_HASH must be an Argon2 PHC string"
        );

        let storage = storage_settings_from_env(&public_origin);

        let orphan_sweep = OrphanSweepConfig {
            interval_secs: std::env::var("ORPHAN_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".into())
                .parse()
                .expect("ORPHAN_SWEEP_INTERVAL_SECS must be a valid u64"),
            grace_mins: std::env::var("ORPHAN_GRACE_MINS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("ORPHAN_GRACE_MINS must be a valid i64"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_body_bytes,
            public_origin,
            jwt,
            admin,
            storage,
            orphan_sweep,
        }
    }
}

fn storage_settings_from_env(public_origin: &ServingOrigin) -> StorageSettings {
    let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
        .unwrap_or_else(|_| format!("{public_origin}/media"));

    match std::env::var("STORAGE_BACKEND")
        .unwrap_or_else(|_| "local".into())
        .as_str()
    {
        "local" => StorageSettings::Local {
            root: PathBuf::from(
                std::env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "storage/media".into()),
            ),
            public_base_url,
        },
        "s3" => StorageSettings::S3 {
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok().filter(|s| !s.is_empty()),
            public_base_url,
        },
        "memory" => StorageSettings::Memory { public_base_url },
        other => panic!("STORAGE_BACKEND must be one of: local, s3, memory (got '{other}')"),
    }
}
