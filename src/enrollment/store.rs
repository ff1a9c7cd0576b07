//! Database operations for enrollments
//!
//! This module is the storage port for the enrollment engine: it exposes
//! exactly the queries the engine needs and nothing else. Uniqueness of
//! the (user_email, course_id) key is enforced by a unique index; `insert`
//! surfaces the conflict to the caller instead of pre-checking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use std::collections::BTreeSet;

const ENROLLMENT_COLUMNS: &str =
    "id, user_email, course_id, completed_lesson_ids, progress, created_at";

/// One user's enrollment in one course
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    /// Unique enrollment ID (UUID)
    pub id: String,
    /// Enrolled user's email
    pub user_email: String,
    /// Course being taken
    pub course_id: String,
    /// Ids of lessons the user has completed
    pub completed_lesson_ids: BTreeSet<String>,
    /// Percentage of the course completed, 0-100
    pub progress: i64,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Enrollment {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let completed_json: String = row.try_get("completed_lesson_ids")?;
        let completed_lesson_ids = serde_json::from_str(&completed_json).map_err(|err| {
            sqlx::Error::ColumnDecode {
                index: "completed_lesson_ids".to_string(),
                source: Box::new(err),
            }
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            user_email: row.try_get("user_email")?,
            course_id: row.try_get("course_id")?,
            completed_lesson_ids,
            progress: row.try_get("progress")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Insert a fresh enrollment row
///
/// A second insert for the same key violates the unique index; the error
/// is returned as-is so the engine can treat it as "already enrolled".
pub async fn insert(
    pool: &SqlitePool,
    user_email: &str,
    course_id: &str,
) -> Result<Enrollment, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO enrollments (id, user_email, course_id, completed_lesson_ids, progress, created_at)
        VALUES ($1, $2, $3, '[]', 0, $4)
        "#,
    )
    .bind(&id)
    .bind(user_email)
    .bind(course_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Enrollment {
        id,
        user_email: user_email.to_string(),
        course_id: course_id.to_string(),
        completed_lesson_ids: BTreeSet::new(),
        progress: 0,
        created_at: now,
    })
}

/// Find the enrollment for a (user, course) key
pub async fn find_by_key(
    pool: &SqlitePool,
    user_email: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        SELECT {ENROLLMENT_COLUMNS}
        FROM enrollments
        WHERE user_email = $1 AND course_id = $2
        "#
    ))
    .bind(user_email)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    Ok(enrollment)
}

/// Check whether an enrollment exists for a (user, course) key
pub async fn exists_by_key(
    pool: &SqlitePool,
    user_email: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM enrollments
        WHERE user_email = $1 AND course_id = $2
        "#,
    )
    .bind(user_email)
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    let count: i64 = result.get("count");
    Ok(count > 0)
}

/// Delete every row matching a (user, course) key
///
/// The unique index means at most one row can match; deletion is still
/// keyed rather than by id.
///
/// # Returns
/// Number of rows deleted
pub async fn delete_by_key(
    pool: &SqlitePool,
    user_email: &str,
    course_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM enrollments
        WHERE user_email = $1 AND course_id = $2
        "#,
    )
    .bind(user_email)
    .bind(course_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Persist an enrollment's completed-lesson set and progress
pub async fn update_completion(
    pool: &SqlitePool,
    enrollment: &Enrollment,
) -> Result<(), sqlx::Error> {
    let completed_json =
        serde_json::to_string(&enrollment.completed_lesson_ids).map_err(|err| {
            sqlx::Error::ColumnDecode {
                index: "completed_lesson_ids".to_string(),
                source: Box::new(err),
            }
        })?;

    sqlx::query(
        r#"
        UPDATE enrollments
        SET completed_lesson_ids = $1, progress = $2
        WHERE id = $3
        "#,
    )
    .bind(&completed_json)
    .bind(enrollment.progress)
    .bind(&enrollment.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a user's enrollments, oldest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_email: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        SELECT {ENROLLMENT_COLUMNS}
        FROM enrollments
        WHERE user_email = $1
        ORDER BY created_at
        "#
    ))
    .bind(user_email)
    .fetch_all(pool)
    .await?;

    Ok(enrollments)
}
