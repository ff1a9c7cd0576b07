/**
 * Enrollment Engine
 *
 * This module implements the enrollment state machine. Each
 * (user_email, course_id) key is in one of two states, NotEnrolled or
 * Enrolled; `enroll` and `unenroll` move between them and
 * `toggle_lesson` mutates the Enrolled state.
 *
 * # Concurrency
 *
 * Mutating operations on the same key are serialized by an in-process
 * lock registry, so a read-modify-write of the completed-lesson set can
 * not lose updates to a concurrent request. Row uniqueness does not rely
 * on the locks: the (user_email, course_id) unique index is authoritative,
 * and an insert conflict is read back as `AlreadyEnrolled`.
 *
 * # Progress
 *
 * `progress = completed * 100 / total` (floor), clamped to 100. A course
 * with no lessons, including a course row that has vanished, yields
 * progress 0 rather than a division error.
 */

use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::courses::db as courses_db;
use crate::enrollment::store::{self, Enrollment};
use crate::error::is_unique_violation;
use crate::users::db as users_db;

/// Enrollment lifecycle failure
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// The user email does not match any identity
    #[error("User not found")]
    UnknownUser,
    /// The course id does not match any course
    #[error("Course not found")]
    UnknownCourse,
    /// An enrollment row already exists for this (user, course) key
    #[error("User is already enrolled in this course")]
    AlreadyEnrolled,
    /// No enrollment row exists for this (user, course) key
    #[error("User is not enrolled in this course")]
    NotEnrolled,
    /// The storage layer failed
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Per-key lock registry
///
/// Hands out one async mutex per (user_email, course_id) key so engine
/// operations on the same enrollment run one at a time. Locks for idle
/// keys are dropped by `release_idle`.
#[derive(Clone)]
struct KeyLocks {
    locks: Arc<std::sync::Mutex<HashMap<(String, String), Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    fn new() -> Self {
        Self {
            locks: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a key
    fn lock_for(&self, user_email: &str, course_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry((user_email.to_string(), course_id.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop locks no request currently holds
    fn release_idle(&self) {
        self.locks
            .lock()
            .unwrap()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

/// Compute course progress as a whole percentage
///
/// Floor of `completed * 100 / total`, clamped to 100. A course with no
/// lessons is 0% complete by definition.
pub fn compute_progress(completed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (completed * 100 / total).min(100) as i64
}

/// The enrollment state machine
///
/// Cheap to clone: the pool and the lock registry are both handles to
/// shared state.
#[derive(Clone)]
pub struct EnrollmentEngine {
    pool: SqlitePool,
    locks: KeyLocks,
}

impl EnrollmentEngine {
    /// Create an engine over a database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: KeyLocks::new(),
        }
    }

    /// Enroll a user in a course
    ///
    /// The user and course must both exist. The insert itself decides
    /// whether the user was already enrolled: a unique-index conflict on
    /// the key is reported as `AlreadyEnrolled`, so two racing requests
    /// produce exactly one row. The course id is then recorded on the
    /// user's enrolled list.
    ///
    /// # Errors
    ///
    /// * `UnknownUser` - No identity with this email
    /// * `UnknownCourse` - No course with this id
    /// * `AlreadyEnrolled` - An enrollment row already exists
    pub async fn enroll(
        &self,
        user_email: &str,
        course_id: &str,
    ) -> Result<Enrollment, EnrollmentError> {
        let lock = self.locks.lock_for(user_email, course_id);
        let _guard = lock.lock().await;

        tracing::info!("Enroll request: {} -> course {}", user_email, course_id);

        if users_db::find_by_email(&self.pool, user_email)
            .await?
            .is_none()
        {
            return Err(EnrollmentError::UnknownUser);
        }

        if courses_db::find_by_id(&self.pool, course_id).await?.is_none() {
            return Err(EnrollmentError::UnknownCourse);
        }

        let enrollment = store::insert(&self.pool, user_email, course_id)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    EnrollmentError::AlreadyEnrolled
                } else {
                    EnrollmentError::Storage(err)
                }
            })?;

        users_db::add_enrolled_course(&self.pool, user_email, course_id).await?;

        tracing::info!("Enrollment created: {}", enrollment.id);

        Ok(enrollment)
    }

    /// Flip a lesson's completion state and recompute progress
    ///
    /// Toggling is an involution: toggling the same lesson twice restores
    /// the prior state. Progress uses the course's current lesson count,
    /// so it reflects content as it is now, not as it was at enrollment.
    ///
    /// # Errors
    ///
    /// * `NotEnrolled` - No enrollment row for this key
    pub async fn toggle_lesson(
        &self,
        user_email: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<Enrollment, EnrollmentError> {
        let lock = self.locks.lock_for(user_email, course_id);
        let _guard = lock.lock().await;

        let mut enrollment = store::find_by_key(&self.pool, user_email, course_id)
            .await?
            .ok_or(EnrollmentError::NotEnrolled)?;

        if !enrollment.completed_lesson_ids.remove(lesson_id) {
            enrollment
                .completed_lesson_ids
                .insert(lesson_id.to_string());
        }

        let total_lessons = match courses_db::find_by_id(&self.pool, course_id).await? {
            Some(course) => course.total_lessons(),
            None => 0,
        };
        enrollment.progress =
            compute_progress(enrollment.completed_lesson_ids.len(), total_lessons);

        store::update_completion(&self.pool, &enrollment).await?;

        Ok(enrollment)
    }

    /// Remove a user's enrollment in a course
    ///
    /// Deletes every row for the key and removes the course id from the
    /// user's enrolled list.
    ///
    /// # Errors
    ///
    /// * `NotEnrolled` - No enrollment row for this key
    pub async fn unenroll(&self, user_email: &str, course_id: &str) -> Result<(), EnrollmentError> {
        let lock = self.locks.lock_for(user_email, course_id);
        let _guard = lock.lock().await;

        tracing::info!("Unenroll request: {} -> course {}", user_email, course_id);

        let deleted = store::delete_by_key(&self.pool, user_email, course_id).await?;
        if deleted == 0 {
            return Err(EnrollmentError::NotEnrolled);
        }

        users_db::remove_enrolled_course(&self.pool, user_email, course_id).await?;

        Ok(())
    }

    /// Whether an enrollment exists for this key
    ///
    /// Pure read, no locking, no side effects.
    pub async fn is_enrolled(
        &self,
        user_email: &str,
        course_id: &str,
    ) -> Result<bool, EnrollmentError> {
        Ok(store::exists_by_key(&self.pool, user_email, course_id).await?)
    }

    /// All enrollments for a user, oldest first
    pub async fn enrollments_for_user(
        &self,
        user_email: &str,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        Ok(store::list_for_user(&self.pool, user_email).await?)
    }

    /// Drop per-key locks that no in-flight request holds
    ///
    /// Called periodically so the registry does not grow with every key
    /// ever touched.
    pub fn release_idle_locks(&self) {
        self.locks.release_idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_floored() {
        // 1 of 3 lessons is 33.33..%, reported as 33
        assert_eq!(compute_progress(1, 3), 33);
        assert_eq!(compute_progress(2, 3), 66);
    }

    #[test]
    fn test_progress_full_course() {
        assert_eq!(compute_progress(4, 4), 100);
    }

    #[test]
    fn test_progress_empty_course_is_zero() {
        assert_eq!(compute_progress(0, 0), 0);
        assert_eq!(compute_progress(5, 0), 0);
    }

    #[test]
    fn test_progress_clamps_when_set_outgrows_course() {
        // Completed ids can reference lessons removed from the course
        assert_eq!(compute_progress(6, 4), 100);
    }

    #[test]
    fn test_progress_half_and_quarter() {
        assert_eq!(compute_progress(2, 4), 50);
        assert_eq!(compute_progress(1, 4), 25);
    }

    #[test]
    fn test_lock_registry_reuses_lock_per_key() {
        let locks = KeyLocks::new();
        let a = locks.lock_for("alice@example.com", "course-1");
        let b = locks.lock_for("alice@example.com", "course-1");
        let c = locks.lock_for("alice@example.com", "course-2");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_lock_registry_releases_only_idle_locks() {
        let locks = KeyLocks::new();
        let held = locks.lock_for("alice@example.com", "course-1");
        locks.lock_for("bob@example.com", "course-2");
        assert_eq!(locks.len(), 2);

        locks.release_idle();

        assert_eq!(locks.len(), 1);
        let again = locks.lock_for("alice@example.com", "course-1");
        assert!(Arc::ptr_eq(&held, &again));
    }
}
