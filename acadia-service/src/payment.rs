use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::warn;

use acadia_core::models::{Payment, PaymentUpdate};
use acadia_core::repository::PaymentRepository;
use acadia_core::StoreResult;

/// Single-entity operations on payments. Creation and deletion are absent:
/// both span entities and are owned by the coordinator.
pub struct PaymentService {
    pool: Pool<Sqlite>,
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentService {
    pub fn new(pool: Pool<Sqlite>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { pool, payments }
    }

    pub async fn list(&self) -> StoreResult<Vec<Payment>> {
        let mut conn = self.pool.acquire().await?;
        self.payments.fetch_all(&mut conn).await
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Payment>> {
        let mut conn = self.pool.acquire().await?;
        self.payments.fetch_by_id(&mut conn, id).await
    }

    pub async fn update(&self, id: i64, changes: PaymentUpdate) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = self.payments.update(&mut conn, id, &changes).await;
        if result.is_err() {
            warn!("Payment {} update did not apply", id);
        }
        result
    }
}
