//! QR issuance for identity cards.
//!
//! A code is never stored. [`render`] recomputes it from `(kind, id, origin)`
//! every time, and the output is bit-identical for identical inputs, which is
//! what keeps a printed code valid for the lifetime of the record.

use std::io::Cursor;

use image::{ImageFormat, Rgb};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::CoreError;
use crate::profile::{qr_payload, ServingOrigin};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Cosmetic parameters
// ---------------------------------------------------------------------------

/// Error-correction level. Medium survives a scuffed lanyard card.
const EC_LEVEL: EcLevel = EcLevel::M;

/// Minimum rendered edge in pixels (PNG) / user units (SVG).
pub const MIN_DIMENSION: u32 = 200;

/// Dark module colour (indigo-950).
const DARK_RGB: [u8; 3] = [0x1e, 0x1b, 0x4b];
const DARK_HEX: &str = "#1e1b4b";

const LIGHT_RGB: [u8; 3] = [0xff, 0xff, 0xff];
const LIGHT_HEX: &str = "#ffffff";

/// Label used in download file names when the caller gives none.
const DEFAULT_LABEL: &str = "code";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One entity's QR code in both scannable (SVG) and downloadable (PNG) form.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedQr {
    /// Absolute URL encoded in the code.
    pub payload: String,
    /// PNG bytes, suitable for download.
    #[serde(skip)]
    pub png: Vec<u8>,
    /// Inline SVG document, suitable for embedding in a page.
    pub svg: String,
}

/// Render the QR code for `(kind, id)` as served from `origin`.
pub fn render(
    kind: EntityKind,
    id: EntityId,
    origin: &ServingOrigin,
) -> Result<RenderedQr, CoreError> {
    let payload = qr_payload(origin, kind, id);
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EC_LEVEL)
        .map_err(|e| CoreError::Internal(format!("QR encoding failed for {payload}: {e}")))?;

    let png = encode_png(&code)?;
    let svg = code
        .render::<svg::Color<'_>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .dark_color(svg::Color(DARK_HEX))
        .light_color(svg::Color(LIGHT_HEX))
        .quiet_zone(true)
        .build();

    Ok(RenderedQr { payload, png, svg })
}

fn encode_png(code: &QrCode) -> Result<Vec<u8>, CoreError> {
    let bitmap = code
        .render::<Rgb<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .dark_color(Rgb(DARK_RGB))
        .light_color(Rgb(LIGHT_RGB))
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(png)
}

/// Download file name for a rendered code: `qr-{label}.png`.
///
/// The label is reduced to `[A-Za-z0-9_-]` so it is safe inside a
/// `Content-Disposition` header.
pub fn download_filename(label: Option<&str>) -> String {
    let cleaned: String = label
        .unwrap_or("")
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '-',
        })
        .collect();
    let cleaned = cleaned.trim_matches('-');
    let label = if cleaned.is_empty() { DEFAULT_LABEL } else { cleaned };
    format!("qr-{label}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> ServingOrigin {
        ServingOrigin::parse("https://app.example").unwrap()
    }

    fn asha_id() -> EntityId {
        uuid::Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap()
    }

    /// Decode the first QR code found in a PNG.
    fn decode_png(png: &[u8]) -> String {
        let luma = image::load_from_memory(png).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one QR code");
        let (_meta, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render(EntityKind::Student, asha_id(), &origin()).unwrap();
        let b = render(EntityKind::Student, asha_id(), &origin()).unwrap();
        assert_eq!(a.png, b.png);
        assert_eq!(a.svg, b.svg);
        assert_eq!(a.payload, b.payload);
    }

    #[test]
    fn decoded_png_is_the_profile_url() {
        let qr = render(EntityKind::Student, asha_id(), &origin()).unwrap();
        assert_eq!(
            decode_png(&qr.png),
            "https://app.example/student/3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[test]
    fn decoded_png_round_trips_fresh_ids() {
        let origin = ServingOrigin::parse("http://localhost:3000").unwrap();
        for kind in EntityKind::ALL {
            let id = crate::identity::new_id();
            let qr = render(kind, id, &origin).unwrap();
            assert_eq!(decode_png(&qr.png), format!("http://localhost:3000/{kind}/{id}"));
        }
    }

    #[test]
    fn png_meets_minimum_dimension() {
        let qr = render(EntityKind::Teacher, asha_id(), &origin()).unwrap();
        let img = image::load_from_memory(&qr.png).unwrap();
        assert!(img.width() >= MIN_DIMENSION);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn svg_uses_card_colours() {
        let qr = render(EntityKind::Teacher, asha_id(), &origin()).unwrap();
        assert!(qr.svg.starts_with("<?xml"));
        assert!(qr.svg.contains(DARK_HEX));
    }

    #[test]
    fn different_kinds_encode_different_codes() {
        let s = render(EntityKind::Student, asha_id(), &origin()).unwrap();
        let t = render(EntityKind::Teacher, asha_id(), &origin()).unwrap();
        assert_ne!(s.png, t.png);
    }

    #[test]
    fn download_filename_is_header_safe() {
        assert_eq!(download_filename(Some("Asha Rao")), "qr-Asha-Rao.png");
        assert_eq!(download_filename(Some("  ")), "qr-code.png");
        assert_eq!(download_filename(None), "qr-code.png");
        assert_eq!(download_filename(Some("\"quoted\"")), "qr-quoted.png");
    }
}
