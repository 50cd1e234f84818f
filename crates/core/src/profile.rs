//! Public profile paths and the serving origin they resolve against.
//!
//! A profile path is a pure function of `(kind, id)`. The QR payload is that
//! path prefixed with the one configured [`ServingOrigin`]; nothing here
//! reads ambient request state.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::CoreError;
use crate::types::EntityId;

static ORIGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?(:[0-9]{1,5})?$")
        .expect("origin pattern is valid")
});

/// Scheme, host and optional port under which profile routes are reachable.
///
/// Always stored without a trailing slash, so `origin + path` is a
/// well-formed absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServingOrigin(String);

impl ServingOrigin {
    /// Parse an origin such as `https://app.example` or
    /// `http://localhost:3000`. A single trailing slash is tolerated.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if !ORIGIN_RE.is_match(trimmed) {
            return Err(CoreError::Validation(format!(
                "Invalid serving origin '{raw}'. Expected scheme://host[:port] with no path"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServingOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical public route for one entity: `/{kind}/{id}`.
pub fn profile_path(kind: EntityKind, id: EntityId) -> String {
    format!("/{}/{id}", kind.name())
}

/// Exact string encoded into an entity's QR code.
pub fn qr_payload(origin: &ServingOrigin, kind: EntityKind, id: EntityId) -> String {
    format!("{}{}", origin.as_str(), profile_path(kind, id))
}
