//! HTTP-level tests for student enrollment, editing and deletion.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, body_text, delete_auth, get, get_auth, png, send_multipart, text, Part, TestApp,
    MEDIA_BASE_URL,
};
use schoolerp_db::repositories::StudentRepo;
use sqlx::PgPool;

const STUDENTS: &str = "/api/v1/admin/students";

async fn enroll(app: &TestApp, parts: Vec<Part>) -> serde_json::Value {
    let response =
        send_multipart(app.router(), Method::POST, STUDENTS, &app.admin_token(), parts).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn asha() -> Vec<Part> {
    vec![
        text("name", "Asha Rao"),
        text("class_name", "Grade 5-A"),
        text("school_name", "Green Valley School"),
        text("father_name", "Vikram Rao"),
        png("photo", "asha.png"),
    ]
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asha_enrollment_end_to_end(pool: PgPool) {
    let app = common::build_test_app(pool);

    let student = enroll(&app, asha()).await;
    let id = student["id"].as_str().unwrap().to_string();
    assert_eq!(student["name"], "Asha Rao");
    assert_eq!(student["class_name"], "Grade 5-A");
    assert_eq!(
        student["photo_url"],
        format!("{MEDIA_BASE_URL}/student-photos/{id}/self.png")
    );
    assert!(student["father_photo"].is_null());
    assert!(app
        .images
        .get("student-photos", &format!("{id}/self.png"))
        .await
        .is_some());

    // Public card shows both name and class.
    let response = get(app.router(), &format!("/student/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Asha Rao"));
    assert!(html.contains("Grade 5-A"));

    // The QR payload is the absolute card URL.
    let response = get(app.router(), &format!("/api/v1/profiles/student/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let card = body_json(response).await;
    assert_eq!(
        card["data"]["qr_payload"],
        format!("https://app.example/student/{id}")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_mother_upload_aborts_enrollment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    app.images.fail_on("/mother.").await;

    let response = send_multipart(
        app.router(),
        Method::POST,
        STUDENTS,
        &app.admin_token(),
        vec![
            text("name", "Asha Rao"),
            text("class_name", "Grade 5-A"),
            png("photo", "asha.png"),
            png("father_photo", "father.png"),
            png("mother_photo", "mother.png"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPLOAD_ERROR");
    assert_eq!(StudentRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_fields_upload_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = send_multipart(
        app.router(),
        Method::POST,
        STUDENTS,
        &app.admin_token(),
        vec![text("name", "  "), text("class_name", "Grade 5-A"), png("photo", "a.png")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Student name is required");
    assert!(app.images.is_empty().await);
    assert_eq!(StudentRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_image_photo_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = send_multipart(
        app.router(),
        Method::POST,
        STUDENTS,
        &app.admin_token(),
        vec![
            text("name", "Asha Rao"),
            text("class_name", "Grade 5-A"),
            Part::File {
                name: "photo",
                file_name: "report.pdf",
                content_type: "application/pdf",
                data: b"%PDF-1.7".to_vec(),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(app.images.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_file_inputs_are_ignored(pool: PgPool) {
    let app = common::build_test_app(pool);

    let student = enroll(
        &app,
        vec![
            text("name", "Ravi Kumar"),
            text("class_name", "Grade 2-B"),
            Part::File {
                name: "photo",
                file_name: "",
                content_type: "application/octet-stream",
                data: Vec::new(),
            },
        ],
    )
    .await;

    assert!(student["photo_url"].is_null());
    assert!(app.images.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_id_and_qr_code(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = app.admin_token();

    let student = enroll(&app, asha()).await;
    let id = student["id"].as_str().unwrap().to_string();

    let qr_uri = format!("/api/v1/qr/student/{id}");
    let before = common::body_bytes(get(app.router(), &qr_uri).await).await;

    let response = send_multipart(
        app.router(),
        Method::PUT,
        &format!("{STUDENTS}/{id}"),
        &token,
        vec![text("name", "Asha R. Rao"), png("mother_photo", "mum.png")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();

    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Asha R. Rao");
    assert_eq!(updated["class_name"], "Grade 5-A", "untouched fields are kept");
    assert_eq!(updated["photo_url"], student["photo_url"], "existing photo is kept");
    assert_eq!(
        updated["mother_photo"],
        format!("{MEDIA_BASE_URL}/student-photos/{id}/mother.png")
    );

    let after = common::body_bytes(get(app.router(), &qr_uri).await).await;
    assert_eq!(before, after, "QR code must not change when the record is edited");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_cannot_blank_required_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let student = enroll(&app, asha()).await;
    let id = student["id"].as_str().unwrap();

    let response = send_multipart(
        app.router(),
        Method::PUT,
        &format!("{STUDENTS}/{id}"),
        &app.admin_token(),
        vec![text("class_name", "")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_unknown_student_uploads_nothing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = schoolerp_core::identity::new_id();

    let response = send_multipart(
        app.router(),
        Method::PUT,
        &format!("{STUDENTS}/{id}"),
        &app.admin_token(),
        vec![png("photo", "a.png")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.images.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_search_and_get(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = app.admin_token();

    let asha = enroll(&app, asha()).await;
    enroll(
        &app,
        vec![text("name", "Ravi Kumar"), text("class_name", "Grade 2-B")],
    )
    .await;

    let json = body_json(get_auth(app.router(), STUDENTS, &token).await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Ravi Kumar", "Asha Rao"], "newest first");

    let json = body_json(get_auth(app.router(), &format!("{STUDENTS}?search=green"), &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], asha["id"]);

    let id = asha["id"].as_str().unwrap();
    let response = get_auth(app.router(), &format!("{STUDENTS}/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["father_name"], "Vikram Rao");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_id_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.router(), &format!("{STUDENTS}/not-a-uuid"), &app.admin_token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_then_card_is_gone(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = app.admin_token();

    let student = enroll(&app, asha()).await;
    let id = student["id"].as_str().unwrap();

    let response = delete_auth(app.router(), &format!("{STUDENTS}/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.router(), &format!("{STUDENTS}/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app.router(), &format!("/student/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.router(), &format!("{STUDENTS}/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Photos stay until the orphan sweep runs.
    assert!(!app.images.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_records(pool: PgPool) {
    let app = common::build_test_app(pool);
    enroll(&app, asha()).await;

    let response = get_auth(app.router(), "/api/v1/admin/dashboard", &app.admin_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["students"], 1);
    assert_eq!(json["data"]["teachers"], 0);
}
