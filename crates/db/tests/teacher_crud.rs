//! Integration tests for the teacher repository.

use chrono::{TimeZone, Utc};
use schoolerp_core::identity::new_id;
use schoolerp_db::models::teacher::{CreateTeacher, TeacherFilter, UpdateTeacher};
use schoolerp_db::repositories::TeacherRepo;
use sqlx::PgPool;

fn new_teacher(name: &str, qualification: &str) -> CreateTeacher {
    CreateTeacher {
        id: new_id(),
        name: name.to_string(),
        photo_url: None,
        experience: String::new(),
        qualification: qualification.to_string(),
        school_name: String::new(),
        address: String::new(),
        school_address: String::new(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_then_find(pool: PgPool) {
    let mut input = new_teacher("R. Iyer", "M.Sc, B.Ed");
    input.experience = "12 years".into();
    let created = TeacherRepo::create(&pool, &input).await.unwrap();

    let found = TeacherRepo::find_by_id(&pool, input.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.experience, "12 years");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_id_hits_primary_key(pool: PgPool) {
    let first = new_teacher("R. Iyer", "B.Ed");
    TeacherRepo::create(&pool, &first).await.unwrap();

    let mut second = new_teacher("S. Menon", "M.Ed");
    second.id = first.id;
    let err = TeacherRepo::create(&pool, &second).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("pk_teachers"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first_and_searchable(pool: PgPool) {
    let older = TeacherRepo::create(&pool, &new_teacher("R. Iyer", "B.Ed")).await.unwrap();
    let newer = TeacherRepo::create(&pool, &new_teacher("S. Menon", "M.Sc")).await.unwrap();
    for (id, secs) in [(older.id, 1), (newer.id, 2)] {
        sqlx::query("UPDATE teachers SET created_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc.timestamp_opt(secs, 0).unwrap())
            .execute(&pool)
            .await
            .unwrap();
    }

    let all = TeacherRepo::list(&pool, &TeacherFilter::default()).await.unwrap();
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![newer.id, older.id]);

    let filter = TeacherFilter {
        search: Some("b.ed".into()),
        ..Default::default()
    };
    let found = TeacherRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, older.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_then_delete(pool: PgPool) {
    let created = TeacherRepo::create(&pool, &new_teacher("R. Iyer", "B.Ed")).await.unwrap();

    let update = UpdateTeacher {
        photo_url: Some("https://cdn.example/teacher-photos/x/self.jpg".into()),
        ..Default::default()
    };
    let updated = TeacherRepo::update(&pool, created.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.photo_url, update.photo_url);
    assert_eq!(updated.qualification, "B.Ed");

    assert!(TeacherRepo::delete(&pool, created.id).await.unwrap());
    assert!(TeacherRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert_eq!(TeacherRepo::count(&pool).await.unwrap(), 0);
}
