use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::warn;

use acadia_core::models::{Enrollment, EnrollmentUpdate};
use acadia_core::repository::EnrollmentRepository;
use acadia_core::StoreResult;

/// Single-entity operations on enrollments. Nothing here crosses an entity
/// boundary; anything that does belongs to the coordinator.
pub struct EnrollmentService {
    pool: Pool<Sqlite>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    pub fn new(pool: Pool<Sqlite>, enrollments: Arc<dyn EnrollmentRepository>) -> Self {
        Self { pool, enrollments }
    }

    pub async fn list(&self) -> StoreResult<Vec<Enrollment>> {
        let mut conn = self.pool.acquire().await?;
        self.enrollments.fetch_all(&mut conn).await
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Enrollment>> {
        let mut conn = self.pool.acquire().await?;
        self.enrollments.fetch_by_id(&mut conn, id).await
    }

    pub async fn update(&self, id: i64, changes: EnrollmentUpdate) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = self.enrollments.update(&mut conn, id, &changes).await;
        if result.is_err() {
            warn!("Enrollment {} update did not apply", id);
        }
        result
    }
}
