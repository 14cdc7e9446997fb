use std::sync::Arc;

use sqlx::{Pool, Sqlite, Transaction};
use tracing::{error, warn};

use acadia_core::models::{Enrollment, NewEnrollment, NewPayment, NewReview, Payment, Review};
use acadia_core::repository::{EnrollmentRepository, PaymentRepository, ReviewRepository};

/// Reported to callers when a grouped operation did not apply. The cause
/// (precondition, constraint, storage failure) is logged, never exposed.
#[derive(Debug, thiserror::Error)]
#[error("requested change was not applied")]
pub struct OperationFailed;

/// Owns every operation that touches more than one entity. Each grouped
/// operation opens one transaction on the shared pool and hands that handle
/// to every store call, so the group commits or rolls back as a unit; the
/// stores themselves never demarcate transactions.
pub struct TransactionCoordinator {
    pool: Pool<Sqlite>,
    enrollments: Arc<dyn EnrollmentRepository>,
    payments: Arc<dyn PaymentRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl TransactionCoordinator {
    pub fn new(
        pool: Pool<Sqlite>,
        enrollments: Arc<dyn EnrollmentRepository>,
        payments: Arc<dyn PaymentRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            pool,
            enrollments,
            payments,
            reviews,
        }
    }

    /// Create an enrollment and its payment as one atomic group. The
    /// enrollment id is only known after the first insert, so the two
    /// inserts are sequenced inside a single transaction.
    pub async fn create_enrollment_with_payment(
        &self,
        new_enrollment: NewEnrollment,
        new_payment: NewPayment,
    ) -> Result<(Enrollment, Payment), OperationFailed> {
        let mut tx = self.begin().await?;

        let enrollment = match self.enrollments.insert(&mut tx, &new_enrollment).await {
            Ok(enrollment) => enrollment,
            Err(e) => {
                warn!("Enrollment insert failed, rolling back: {}", e);
                rollback(tx).await;
                return Err(OperationFailed);
            }
        };

        let payment = match self
            .payments
            .insert(&mut tx, enrollment.id, &new_payment)
            .await
        {
            Ok(payment) => payment,
            Err(e) => {
                warn!(
                    "Payment insert failed, rolling back enrollment {}: {}",
                    enrollment.id, e
                );
                rollback(tx).await;
                return Err(OperationFailed);
            }
        };

        self.commit(tx).await?;
        Ok((enrollment, payment))
    }

    /// Register a review for an active enrollment. A single row is written,
    /// so this is a guarded insert rather than a transactional group: the
    /// activity check refuses the write before anything is attempted.
    pub async fn register_review(
        &self,
        new_review: NewReview,
    ) -> Result<Review, OperationFailed> {
        let mut conn = self.acquire().await?;

        let active = self
            .enrollments
            .exists_active(&mut conn, new_review.enrollment_id)
            .await
            .map_err(|_| OperationFailed)?;
        if !active {
            warn!(
                "Review refused: enrollment {} is not active",
                new_review.enrollment_id
            );
            return Err(OperationFailed);
        }

        self.reviews
            .insert(&mut conn, &new_review)
            .await
            .map_err(|_| OperationFailed)
    }

    /// Soft-delete an enrollment together with every payment and review
    /// referencing it. The enrollment is the root of the dependency graph;
    /// once it goes, no dependent may stay behind pointing at a deleted
    /// parent.
    pub async fn delete_enrollment(&self, enrollment_id: i64) -> Result<(), OperationFailed> {
        // Precondition gate, checked before any transaction is opened. The
        // scope also releases the connection so the transaction can take it.
        {
            let mut conn = self.acquire().await?;
            let active = self
                .enrollments
                .exists_active(&mut conn, enrollment_id)
                .await
                .map_err(|_| OperationFailed)?;
            if !active {
                warn!(
                    "Delete refused: enrollment {} not found or already deleted",
                    enrollment_id
                );
                return Err(OperationFailed);
            }
        }

        let mut tx = self.begin().await?;

        if let Err(e) = self
            .payments
            .soft_delete_by_enrollment(&mut tx, enrollment_id)
            .await
        {
            warn!(
                "Payment cascade failed for enrollment {}, rolling back: {}",
                enrollment_id, e
            );
            rollback(tx).await;
            return Err(OperationFailed);
        }

        if let Err(e) = self
            .reviews
            .soft_delete_by_enrollment(&mut tx, enrollment_id)
            .await
        {
            warn!(
                "Review cascade failed for enrollment {}, rolling back: {}",
                enrollment_id, e
            );
            rollback(tx).await;
            return Err(OperationFailed);
        }

        if let Err(e) = self.enrollments.soft_delete(&mut tx, enrollment_id).await {
            warn!(
                "Enrollment delete failed for {}, rolling back: {}",
                enrollment_id, e
            );
            rollback(tx).await;
            return Err(OperationFailed);
        }

        self.commit(tx).await
    }

    /// Soft-delete a payment, the reviews on the same enrollment, and the
    /// enrollment itself. Deleting the dependent retires its parent: this
    /// direction is deliberate and mirrors refunds tearing down the whole
    /// registration.
    pub async fn delete_payment(&self, payment_id: i64) -> Result<(), OperationFailed> {
        let payment = {
            let mut conn = self.acquire().await?;
            match self.payments.fetch_by_id(&mut conn, payment_id).await {
                Ok(Some(payment)) => payment,
                Ok(None) => {
                    warn!(
                        "Delete refused: payment {} not found or already deleted",
                        payment_id
                    );
                    return Err(OperationFailed);
                }
                Err(_) => return Err(OperationFailed),
            }
        };

        let mut tx = self.begin().await?;

        if let Err(e) = self.payments.soft_delete(&mut tx, payment_id).await {
            warn!("Payment delete failed for {}, rolling back: {}", payment_id, e);
            rollback(tx).await;
            return Err(OperationFailed);
        }

        if let Err(e) = self
            .reviews
            .soft_delete_by_enrollment(&mut tx, payment.enrollment_id)
            .await
        {
            warn!(
                "Review cascade failed for enrollment {}, rolling back: {}",
                payment.enrollment_id, e
            );
            rollback(tx).await;
            return Err(OperationFailed);
        }

        if let Err(e) = self
            .enrollments
            .soft_delete(&mut tx, payment.enrollment_id)
            .await
        {
            warn!(
                "Enrollment delete failed for {}, rolling back: {}",
                payment.enrollment_id, e
            );
            rollback(tx).await;
            return Err(OperationFailed);
        }

        self.commit(tx).await
    }

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<Sqlite>, OperationFailed> {
        self.pool.acquire().await.map_err(|e| {
            error!("Failed to acquire connection: {}", e);
            OperationFailed
        })
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, OperationFailed> {
        self.pool.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            OperationFailed
        })
    }

    async fn commit(&self, tx: Transaction<'static, Sqlite>) -> Result<(), OperationFailed> {
        tx.commit().await.map_err(|e| {
            error!("Commit failed: {}", e);
            OperationFailed
        })
    }
}

/// A dropped transaction rolls back on its own; rolling back explicitly lets
/// the failure be logged instead of passing silently.
async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        error!("Rollback failed: {}", e);
    }
}
