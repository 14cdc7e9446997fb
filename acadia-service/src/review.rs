use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::warn;

use acadia_core::models::{Review, ReviewUpdate};
use acadia_core::repository::ReviewRepository;
use acadia_core::StoreResult;

/// Single-entity operations on reviews. Reviews are leaves of the dependency
/// graph, so unlike payments their deletion cascades nowhere and stays here.
pub struct ReviewService {
    pool: Pool<Sqlite>,
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(pool: Pool<Sqlite>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { pool, reviews }
    }

    pub async fn list(&self) -> StoreResult<Vec<Review>> {
        let mut conn = self.pool.acquire().await?;
        self.reviews.fetch_all(&mut conn).await
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Review>> {
        let mut conn = self.pool.acquire().await?;
        self.reviews.fetch_by_id(&mut conn, id).await
    }

    pub async fn update(&self, id: i64, changes: ReviewUpdate) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = self.reviews.update(&mut conn, id, &changes).await;
        if result.is_err() {
            warn!("Review {} update did not apply", id);
        }
        result
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = self.reviews.soft_delete(&mut conn, id).await;
        if result.is_err() {
            warn!("Review {} delete did not apply", id);
        }
        result
    }
}
