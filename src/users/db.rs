/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations.
 *
 * # Storage Notes
 *
 * `roles` and `enrolled_courses` are JSON arrays stored in TEXT columns,
 * so row mapping is implemented by hand instead of derived. Email
 * uniqueness is enforced by a unique index; insert and update paths
 * surface the conflict instead of pre-checking.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, name, username, email, password_hash, age, location, bio, \
                            roles, enrolled_courses, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional handle; federated accounts may not have one
    pub username: Option<String>,
    /// User email address (unique, the token subject)
    pub email: String,
    /// Hashed password (bcrypt); None for federation-only accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Free-form location
    pub location: Option<String>,
    /// Short profile text
    pub bio: Option<String>,
    /// Role names, e.g. ["USER"]
    pub roles: Vec<String>,
    /// Ids of courses the user is enrolled in
    pub enrolled_courses: Vec<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            age: row.try_get("age")?,
            location: row.try_get("location")?,
            bio: row.try_get("bio")?,
            roles: decode_json_column(row, "roles")?,
            enrolled_courses: decode_json_column(row, "enrolled_courses")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Decode a JSON array column into a string list
fn decode_json_column(row: &SqliteRow, column: &str) -> Result<Vec<String>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

/// Encode a string list as a JSON array column value
fn encode_json_column(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Fields for a new user row
///
/// The id and timestamps are assigned by `create_user`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub roles: Vec<String>,
}

/// Partial profile update
///
/// `None` fields are left unchanged. Fields cannot be cleared through an
/// update, only replaced.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

/// Create a new user
///
/// A duplicate email surfaces as a unique-violation `sqlx::Error`; callers
/// decide whether that is a conflict (registration) or a lost race to
/// resolve by re-fetching (federated linking).
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `new_user` - Field values for the new row
///
/// # Returns
/// Created user or error
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, name, username, email, password_hash, age, location, bio,
                           roles, enrolled_courses, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '[]', $10, $11)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&id)
    .bind(&new_user.name)
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.age)
    .bind(&new_user.location)
    .bind(&new_user.bio)
    .bind(encode_json_column(&new_user.roles))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
///
/// # Returns
/// User or None if not found
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
///
/// # Returns
/// User or None if not found
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List all users, oldest first
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        ORDER BY created_at
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Apply a partial update to a user row
///
/// Unset fields keep their current value. An email change can collide with
/// the unique index; the conflict is returned to the caller.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
/// * `update` - Fields to replace
///
/// # Returns
/// Updated user, or `RowNotFound` if the id does not exist
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: UserUpdate,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            age = COALESCE($5, age),
            location = COALESCE($6, location),
            bio = COALESCE($7, bio),
            updated_at = $8
        WHERE id = $9
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&update.name)
    .bind(&update.username)
    .bind(&update.email)
    .bind(&update.password_hash)
    .bind(update.age)
    .bind(&update.location)
    .bind(&update.bio)
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Add a course id to a user's enrolled list
///
/// Idempotent: the id is appended only if not already present.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
/// * `course_id` - Course to record
pub async fn add_enrolled_course(
    pool: &SqlitePool,
    email: &str,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET enrolled_courses = json_insert(enrolled_courses, '$[#]', $2),
            updated_at = $3
        WHERE email = $1
          AND NOT EXISTS (
              SELECT 1 FROM json_each(users.enrolled_courses)
              WHERE json_each.value = $2
          )
        "#,
    )
    .bind(email)
    .bind(course_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a course id from a user's enrolled list
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
/// * `course_id` - Course to remove
pub async fn remove_enrolled_course(
    pool: &SqlitePool,
    email: &str,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET enrolled_courses = (
                SELECT COALESCE(json_group_array(value), '[]')
                FROM json_each(users.enrolled_courses)
                WHERE value <> $2
            ),
            updated_at = $3
        WHERE email = $1
        "#,
    )
    .bind(email)
    .bind(course_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: "u-1".to_string(),
            name: "Alice".to_string(),
            username: Some("alice".to_string()),
            email: "alice@example.com".to_string(),
            password_hash: Some("$2b$04$secret".to_string()),
            age: None,
            location: None,
            bio: None,
            roles: vec!["USER".to_string()],
            enrolled_courses: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_encode_json_column_round_trip() {
        let roles = vec!["USER".to_string(), "ADMIN".to_string()];
        let encoded = encode_json_column(&roles);
        let decoded: Vec<String> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, roles);
    }
}
