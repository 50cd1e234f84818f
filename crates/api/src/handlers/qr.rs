//! Handlers for the `/qr` resource.
//!
//! A QR code is a pure function of `(kind, id)` and the configured serving
//! origin, so these handlers never consult the repository. The public card
//! page resolves the id when the code is scanned.

use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use schoolerp_core::entity::EntityKind;
use schoolerp_core::identity::parse_id;
use schoolerp_core::qr;

use crate::error::{AppError, AppResult};
use crate::query::{QrFormat, QrParams};
use crate::state::AppState;

/// Codes never change for a given origin; a day keeps a redeployed origin
/// from lingering too long in caches.
const QR_CACHE_CONTROL: &str = "public, max-age=86400";

/// GET /api/v1/qr/{kind}/{id}
///
/// `format=png` (default) or `format=svg`. With `download=true` the PNG is
/// served as an attachment named `qr-{label}.png`.
pub async fn get_qr(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Query(params): Query<QrParams>,
) -> AppResult<Response> {
    let kind = EntityKind::from_name(&kind)?;
    let id = parse_id(&id)?;
    let rendered = qr::render(kind, id, &state.config.public_origin)?;

    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(QR_CACHE_CONTROL));

    if params.download {
        let disposition = format!(
            "attachment; filename=\"{}\"",
            qr::download_filename(params.label.as_deref())
        );
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| AppError::InternalError(format!("Invalid disposition: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
        return Ok((headers, rendered.png).into_response());
    }

    match params.format {
        QrFormat::Png => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
            Ok((headers, rendered.png).into_response())
        }
        QrFormat::Svg => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/svg+xml"));
            Ok((headers, rendered.svg).into_response())
        }
    }
}
