use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::warn;

use acadia_core::models::{Enrollment, EnrollmentUpdate, NewEnrollment, RecordStatus};
use acadia_core::repository::EnrollmentRepository;
use acadia_core::{StoreError, StoreResult};

const SELECT_COLUMNS: &str = "enrollment_id AS id, student_id, class_id, status, created_at, updated_at, deleted_at";

pub struct SqliteEnrollmentRepository;

impl SqliteEnrollmentRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqliteEnrollmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Enrollment>> {
        let sql = format!("SELECT {} FROM enrollments WHERE status = 0", SELECT_COLUMNS);
        let enrollments = sqlx::query_as::<_, Enrollment>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch enrollments: {}", e);
                StoreError::from(e)
            })?;
        Ok(enrollments)
    }

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Enrollment>> {
        let sql = format!(
            "SELECT {} FROM enrollments WHERE enrollment_id = ? AND status = 0",
            SELECT_COLUMNS
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch enrollment {}: {}", id, e);
                StoreError::from(e)
            })?;
        Ok(enrollment)
    }

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        new: &NewEnrollment,
    ) -> StoreResult<Enrollment> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO enrollments (student_id, class_id, status, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new.student_id)
        .bind(new.class_id)
        .bind(RecordStatus::Active)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!(
                "Failed to insert enrollment for student {} in class {}: {}",
                new.student_id, new.class_id, e
            );
            StoreError::from(e)
        })?;

        Ok(Enrollment {
            id: result.last_insert_rowid(),
            student_id: new.student_id,
            class_id: new.class_id,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: None,
            deleted_at: None,
        })
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &EnrollmentUpdate,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE enrollments SET student_id = ?, class_id = ?, updated_at = ? \
             WHERE enrollment_id = ? AND status = 0",
        )
        .bind(changes.student_id)
        .bind(changes.class_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to update enrollment {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Enrollment update matched no active row: {}", id);
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE enrollments SET status = ?, updated_at = ?, deleted_at = ? \
             WHERE enrollment_id = ? AND status = 0",
        )
        .bind(RecordStatus::Deleted)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to delete enrollment {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Enrollment delete matched no active row: {}", id);
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists_active(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE enrollment_id = ? AND status = 0",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to check enrollment {} activity: {}", id, e);
            StoreError::from(e)
        })?;
        Ok(count > 0)
    }
}
