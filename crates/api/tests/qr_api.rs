//! HTTP-level tests for QR code rendering.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, body_text, get};
use schoolerp_core::entity::EntityKind;
use schoolerp_core::identity::new_id;
use schoolerp_core::qr;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn png_is_a_pure_function_of_kind_and_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    // No record is needed: the code only encodes the card URL.
    let id = new_id();

    let response = get(app.router(), &format!("/api/v1/qr/student/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.headers()["cache-control"], "public, max-age=86400");
    let expected = qr::render(EntityKind::Student, id, &app.config.public_origin).unwrap();
    assert_eq!(body_bytes(response).await, expected.png);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn png_decodes_to_the_card_url(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = new_id();

    let response = get(app.router(), &format!("/api/v1/qr/teacher/{id}")).await;
    let png = body_bytes(response).await;

    let luma = image::load_from_memory(&png).unwrap().to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, content) = grids[0].decode().unwrap();
    assert_eq!(content, format!("https://app.example/teacher/{id}"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn svg_format(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = new_id();

    let response = get(app.router(), &format!("/api/v1/qr/student/{id}?format=svg")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");
    assert!(body_text(response).await.contains("<svg"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_is_an_attachment(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = new_id();

    let response = get(
        app.router(),
        &format!("/api/v1/qr/student/{id}?download=true&label=Asha%20Rao&format=svg"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"qr-Asha-Rao.png\""
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_kind_or_bad_id_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router(), &format!("/api/v1/qr/parent/{}", new_id())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = get(app.router(), "/api/v1/qr/student/12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
