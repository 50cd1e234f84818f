//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Listing parameters (`?search=&limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Image format for a rendered QR code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

/// Parameters for `GET /qr/{kind}/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct QrParams {
    #[serde(default)]
    pub format: QrFormat,
    /// Serve as an attachment instead of inline.
    #[serde(default)]
    pub download: bool,
    /// Download file label, usually the entity's name.
    pub label: Option<String>,
}
