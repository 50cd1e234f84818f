//! Repository for the `teachers` table.

use schoolerp_core::types::EntityId;
use sqlx::PgPool;

use super::{clamp_limit, clamp_offset, search_pattern};
use crate::models::teacher::{CreateTeacher, Teacher, TeacherFilter, UpdateTeacher};

const COLUMNS: &str = "id, name, photo_url, experience, qualification, school_name, address, \
     school_address, created_at";

/// Provides CRUD operations for teachers.
pub struct TeacherRepo;

impl TeacherRepo {
    /// Insert a new teacher with its pre-assigned id, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTeacher) -> Result<Teacher, sqlx::Error> {
        let query = format!(
            "INSERT INTO teachers (id, name, photo_url, experience, qualification, school_name, \
                address, school_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.experience)
            .bind(&input.qualification)
            .bind(&input.school_name)
            .bind(&input.address)
            .bind(&input.school_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Teacher>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teachers WHERE id = $1");
        sqlx::query_as::<_, Teacher>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List teachers, newest first, optionally narrowed by a search term.
    pub async fn list(pool: &PgPool, filter: &TeacherFilter) -> Result<Vec<Teacher>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM teachers
             WHERE $1::text IS NULL
                OR name ILIKE $1
                OR school_name ILIKE $1
                OR qualification ILIKE $1
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(search_pattern(filter.search.as_deref()))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a teacher. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateTeacher,
    ) -> Result<Option<Teacher>, sqlx::Error> {
        let query = format!(
            "UPDATE teachers SET
                name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                experience = COALESCE($4, experience),
                qualification = COALESCE($5, qualification),
                school_name = COALESCE($6, school_name),
                address = COALESCE($7, address),
                school_address = COALESCE($8, school_address)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Teacher>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.experience)
            .bind(&input.qualification)
            .bind(&input.school_name)
            .bind(&input.address)
            .bind(&input.school_address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a teacher by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(pool)
            .await
    }

    /// Return the subset of `ids` that still have a teacher row.
    pub async fn existing_ids(
        pool: &PgPool,
        ids: &[EntityId],
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        sqlx::query_scalar::<_, EntityId>("SELECT id FROM teachers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
