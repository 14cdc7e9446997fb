use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::warn;

use acadia_core::models::{NewReview, RecordStatus, Review, ReviewUpdate};
use acadia_core::repository::ReviewRepository;
use acadia_core::{StoreError, StoreResult};

const SELECT_COLUMNS: &str =
    "review_id AS id, rating, content, status, created_at, updated_at, deleted_at, enrollment_id";

pub struct SqliteReviewRepository;

impl SqliteReviewRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqliteReviewRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Review>> {
        let sql = format!("SELECT {} FROM reviews WHERE status = 0", SELECT_COLUMNS);
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch reviews: {}", e);
                StoreError::from(e)
            })?;
        Ok(reviews)
    }

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Review>> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE review_id = ? AND status = 0",
            SELECT_COLUMNS
        );
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch review {}: {}", id, e);
                StoreError::from(e)
            })?;
        Ok(review)
    }

    async fn insert(&self, conn: &mut SqliteConnection, new: &NewReview) -> StoreResult<Review> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO reviews (rating, content, status, created_at, enrollment_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new.rating)
        .bind(&new.content)
        .bind(RecordStatus::Active)
        .bind(now)
        .bind(new.enrollment_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!(
                "Failed to insert review for enrollment {}: {}",
                new.enrollment_id, e
            );
            StoreError::from(e)
        })?;

        Ok(Review {
            id: result.last_insert_rowid(),
            rating: new.rating,
            content: new.content.clone(),
            status: RecordStatus::Active,
            created_at: now,
            updated_at: None,
            deleted_at: None,
            enrollment_id: new.enrollment_id,
        })
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &ReviewUpdate,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = ?, content = ?, updated_at = ? \
             WHERE review_id = ? AND status = 0",
        )
        .bind(changes.rating)
        .bind(&changes.content)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to update review {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Review update matched no active row: {}", id);
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE reviews SET status = ?, updated_at = ?, deleted_at = ? \
             WHERE review_id = ? AND status = 0",
        )
        .bind(RecordStatus::Deleted)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to delete review {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Review delete matched no active row: {}", id);
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_by_enrollment(
        &self,
        conn: &mut SqliteConnection,
        enrollment_id: i64,
    ) -> StoreResult<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE reviews SET status = ?, updated_at = ?, deleted_at = ? \
             WHERE enrollment_id = ? AND status = 0",
        )
        .bind(RecordStatus::Deleted)
        .bind(now)
        .bind(now)
        .bind(enrollment_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!(
                "Failed to delete reviews for enrollment {}: {}",
                enrollment_id, e
            );
            StoreError::from(e)
        })?;

        Ok(result.rows_affected())
    }
}
