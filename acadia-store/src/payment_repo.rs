use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::warn;

use acadia_core::models::{NewPayment, Payment, PaymentUpdate, RecordStatus};
use acadia_core::repository::PaymentRepository;
use acadia_core::{StoreError, StoreResult};

const SELECT_COLUMNS: &str =
    "payment_id AS id, amount_cents, status, created_at, updated_at, deleted_at, enrollment_id";

pub struct SqlitePaymentRepository;

impl SqlitePaymentRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqlitePaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Payment>> {
        let sql = format!("SELECT {} FROM payments WHERE status = 0", SELECT_COLUMNS);
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch payments: {}", e);
                StoreError::from(e)
            })?;
        Ok(payments)
    }

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Payment>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE payment_id = ? AND status = 0",
            SELECT_COLUMNS
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                warn!("Failed to fetch payment {}: {}", id, e);
                StoreError::from(e)
            })?;
        Ok(payment)
    }

    /// The active-only unique index on enrollment_id makes a second active
    /// payment against the same enrollment fail here as a plain insert error.
    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        enrollment_id: i64,
        new: &NewPayment,
    ) -> StoreResult<Payment> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO payments (amount_cents, status, created_at, enrollment_id) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(new.amount_cents)
        .bind(RecordStatus::Active)
        .bind(now)
        .bind(enrollment_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!(
                "Failed to insert payment for enrollment {}: {}",
                enrollment_id, e
            );
            StoreError::from(e)
        })?;

        Ok(Payment {
            id: result.last_insert_rowid(),
            amount_cents: new.amount_cents,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: None,
            deleted_at: None,
            enrollment_id,
        })
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &PaymentUpdate,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE payments SET amount_cents = ?, updated_at = ? \
             WHERE payment_id = ? AND status = 0",
        )
        .bind(changes.amount_cents)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to update payment {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Payment update matched no active row: {}", id);
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE payments SET status = ?, updated_at = ?, deleted_at = ? \
             WHERE payment_id = ? AND status = 0",
        )
        .bind(RecordStatus::Deleted)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            warn!("Failed to delete payment {}: {}", id, e);
            StoreError::from(e)
        })?;

        if result.rows_affected() == 0 {
            warn!("Payment delete matched no active row: {}", id);
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
            "UPDATE payments SET status = ?, updated_at = ?, deleted_at = ? \
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
                "Failed to delete payments for enrollment {}: {}",
                enrollment_id, e
            );
            StoreError::from(e)
        })?;

        Ok(result.rows_affected())
    }
}
