/**
 * Course Model and Database Operations
 *
 * This module handles course data and database operations.
 *
 * # Storage Notes
 *
 * The module/lesson tree is stored as a JSON document in the `modules`
 * TEXT column, mirrored from the source system's embedded-document shape.
 * Row mapping is implemented by hand for that column.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

const COURSE_COLUMNS: &str = "id, course_name, course_level, institute, course_type, duration, \
                              start_date, owner_email, modules, created_at";

/// A lesson inside a course module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson ID (UUID)
    pub id: String,
    /// Lesson title
    pub title: String,
    /// Lesson body text
    pub content: Option<String>,
}

/// A module inside a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    /// Unique module ID (UUID)
    pub id: String,
    /// Module title
    pub title: String,
    /// Module summary
    pub description: Option<String>,
    /// Ordered lessons
    pub lessons: Vec<Lesson>,
}

/// Course struct representing a course in the database
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    /// Unique course ID (UUID)
    pub id: String,
    /// Course title
    pub course_name: String,
    /// Difficulty label, e.g. "Beginner"
    pub course_level: String,
    /// Offering institution
    pub institute: String,
    /// Delivery type, e.g. "Online"
    pub course_type: String,
    /// Duration in weeks
    pub duration: i64,
    /// ISO start date
    pub start_date: Option<String>,
    /// Email of the creating user
    pub owner_email: Option<String>,
    /// Embedded module/lesson tree
    pub modules: Vec<CourseModule>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Total number of lessons across all modules
    ///
    /// This is the denominator of the enrollment progress computation.
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|module| module.lessons.len()).sum()
    }
}

impl FromRow<'_, SqliteRow> for Course {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let modules_json: String = row.try_get("modules")?;
        let modules = serde_json::from_str(&modules_json).map_err(|err| {
            sqlx::Error::ColumnDecode {
                index: "modules".to_string(),
                source: Box::new(err),
            }
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            course_name: row.try_get("course_name")?,
            course_level: row.try_get("course_level")?,
            institute: row.try_get("institute")?,
            course_type: row.try_get("course_type")?,
            duration: row.try_get("duration")?,
            start_date: row.try_get("start_date")?,
            owner_email: row.try_get("owner_email")?,
            modules,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// New lesson payload, id assigned on insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewLesson {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// New module payload, id assigned on insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourseModule {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lessons: Vec<NewLesson>,
}

/// New course payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub course_name: String,
    #[serde(default)]
    pub course_level: String,
    #[serde(default)]
    pub institute: String,
    #[serde(default)]
    pub course_type: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub modules: Vec<NewCourseModule>,
}

/// Create a new course
///
/// Course, module and lesson ids are assigned server-side.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `new_course` - Course payload
/// * `owner_email` - The creating user
///
/// # Returns
/// Created course or error
pub async fn create_course(
    pool: &SqlitePool,
    new_course: NewCourse,
    owner_email: &str,
) -> Result<Course, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let modules: Vec<CourseModule> = new_course
        .modules
        .into_iter()
        .map(|module| CourseModule {
            id: uuid::Uuid::new_v4().to_string(),
            title: module.title,
            description: module.description,
            lessons: module
                .lessons
                .into_iter()
                .map(|lesson| Lesson {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: lesson.title,
                    content: lesson.content,
                })
                .collect(),
        })
        .collect();

    let modules_json = serde_json::to_string(&modules).map_err(|err| {
        sqlx::Error::ColumnDecode {
            index: "modules".to_string(),
            source: Box::new(err),
        }
    })?;

    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (id, course_name, course_level, institute, course_type,
                             duration, start_date, owner_email, modules, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(&id)
    .bind(&new_course.course_name)
    .bind(&new_course.course_level)
    .bind(&new_course.institute)
    .bind(&new_course.course_type)
    .bind(new_course.duration)
    .bind(&new_course.start_date)
    .bind(owner_email)
    .bind(&modules_json)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(course)
}

/// Get course by ID
///
/// # Returns
/// Course or None if not found
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        SELECT {COURSE_COLUMNS}
        FROM courses
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(course)
}

/// List courses, optionally filtered to one owner, newest first
pub async fn list_courses(
    pool: &SqlitePool,
    owner_email: Option<&str>,
) -> Result<Vec<Course>, sqlx::Error> {
    let courses = match owner_email {
        Some(owner) => {
            sqlx::query_as::<_, Course>(&format!(
                r#"
                SELECT {COURSE_COLUMNS}
                FROM courses
                WHERE owner_email = $1
                ORDER BY created_at DESC
                "#
            ))
            .bind(owner)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Course>(&format!(
                r#"
                SELECT {COURSE_COLUMNS}
                FROM courses
                ORDER BY created_at DESC
                "#
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_with_lesson_counts(counts: &[usize]) -> Course {
        let modules = counts
            .iter()
            .enumerate()
            .map(|(m, count)| CourseModule {
                id: format!("module-{m}"),
                title: format!("Module {m}"),
                description: None,
                lessons: (0..*count)
                    .map(|l| Lesson {
                        id: format!("lesson-{m}-{l}"),
                        title: format!("Lesson {l}"),
                        content: None,
                    })
                    .collect(),
            })
            .collect();

        Course {
            id: "course-1".to_string(),
            course_name: "Rust Basics".to_string(),
            course_level: "Beginner".to_string(),
            institute: "Test Institute".to_string(),
            course_type: "Online".to_string(),
            duration: 6,
            start_date: None,
            owner_email: None,
            modules,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_lessons_sums_across_modules() {
        let course = course_with_lesson_counts(&[3, 1]);
        assert_eq!(course.total_lessons(), 4);
    }

    #[test]
    fn test_total_lessons_empty_course() {
        let course = course_with_lesson_counts(&[]);
        assert_eq!(course.total_lessons(), 0);
    }

    #[test]
    fn test_modules_json_round_trip() {
        let course = course_with_lesson_counts(&[2]);
        let json = serde_json::to_string(&course.modules).unwrap();
        let decoded: Vec<CourseModule> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].lessons.len(), 2);
    }
}
