//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use schoolerp_core::error::CoreError;
use schoolerp_core::roles::ROLE_ADMIN;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::config::AdminCredentials;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Check a login attempt against the configured administrator.
///
/// The hash is verified on every attempt, so an unknown email costs the same
/// Argon2 work as a wrong password.
fn credentials_match(
    admin: &AdminCredentials,
    email: &str,
    password: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let email_matches = email.trim().eq_ignore_ascii_case(&admin.email);
    let password_valid = verify_password(password, &admin.password_hash)?;
    Ok(email_matches && password_valid)
}

/// POST /api/v1/auth/login
///
/// Authenticate the administrator with email + password and return a bearer
/// token. Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let admin = &state.config.admin;
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        ))
    };

    let accepted = credentials_match(admin, &input.email, &input.password)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !accepted {
        tracing::warn!(email = %input.email, "Rejected login attempt");
        return Err(invalid());
    }

    let access_token = generate_access_token(&admin.email, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(email = %admin.email, "Administrator logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}
