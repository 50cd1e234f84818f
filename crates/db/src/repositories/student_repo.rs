//! Repository for the `students` table.

use schoolerp_core::types::EntityId;
use sqlx::PgPool;

use super::{clamp_limit, clamp_offset, search_pattern};
use crate::models::student::{CreateStudent, Student, StudentFilter, UpdateStudent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, photo_url, father_name, father_photo, mother_name, mother_photo, \
     father_phone, mother_phone, address, school_name, school_phone, school_address, \
     class_name, class_teacher, created_at";

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student with its pre-assigned id, returning the created row.
    ///
    /// A repeated id fails with a unique violation on `pk_students`.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (id, name, photo_url, father_name, father_photo, mother_name, \
                mother_photo, father_phone, mother_phone, address, school_name, school_phone, \
                school_address, class_name, class_teacher)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.father_name)
            .bind(&input.father_photo)
            .bind(&input.mother_name)
            .bind(&input.mother_photo)
            .bind(&input.father_phone)
            .bind(&input.mother_phone)
            .bind(&input.address)
            .bind(&input.school_name)
            .bind(&input.school_phone)
            .bind(&input.school_address)
            .bind(&input.class_name)
            .bind(&input.class_teacher)
            .fetch_one(pool)
            .await
    }

    /// Find a student by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List students, newest first, optionally narrowed by a search term.
    pub async fn list(pool: &PgPool, filter: &StudentFilter) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM students
             WHERE $1::text IS NULL
                OR name ILIKE $1
                OR class_name ILIKE $1
                OR school_name ILIKE $1
                OR father_name ILIKE $1
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(search_pattern(filter.search.as_deref()))
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a student. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                father_name = COALESCE($4, father_name),
                father_photo = COALESCE($5, father_photo),
                mother_name = COALESCE($6, mother_name),
                mother_photo = COALESCE($7, mother_photo),
                father_phone = COALESCE($8, father_phone),
                mother_phone = COALESCE($9, mother_phone),
                address = COALESCE($10, address),
                school_name = COALESCE($11, school_name),
                school_phone = COALESCE($12, school_phone),
                school_address = COALESCE($13, school_address),
                class_name = COALESCE($14, class_name),
                class_teacher = COALESCE($15, class_teacher)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.photo_url)
            .bind(&input.father_name)
            .bind(&input.father_photo)
            .bind(&input.mother_name)
            .bind(&input.mother_photo)
            .bind(&input.father_phone)
            .bind(&input.mother_phone)
            .bind(&input.address)
            .bind(&input.school_name)
            .bind(&input.school_phone)
            .bind(&input.school_address)
            .bind(&input.class_name)
            .bind(&input.class_teacher)
            .fetch_optional(pool)
            .await
    }

    /// Delete a student by id. Returns `true` if a row was removed.
    ///
    /// Photos are left in the object store; the orphan sweep reclaims them.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of students.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(pool)
            .await
    }

    /// Return the subset of `ids` that still have a student row.
    pub async fn existing_ids(
        pool: &PgPool,
        ids: &[EntityId],
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        sqlx::query_scalar::<_, EntityId>("SELECT id FROM students WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
