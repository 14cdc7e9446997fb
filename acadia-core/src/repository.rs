use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::models::{
    Enrollment, EnrollmentUpdate, NewEnrollment, NewPayment, NewReview, Payment, PaymentUpdate,
    Review, ReviewUpdate,
};
use crate::StoreResult;

// Every method takes the connection it runs on. For plain operations that is
// a pooled connection in auto-commit mode; inside a grouped operation the
// coordinator hands each call the same open transaction. No store method
// begins or ends a transaction itself.

/// Repository trait for enrollment data access
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Enrollment>>;

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Enrollment>>;

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        new: &NewEnrollment,
    ) -> StoreResult<Enrollment>;

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &EnrollmentUpdate,
    ) -> StoreResult<()>;

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()>;

    /// Side-effect-free activity check, used as a precondition gate before
    /// dependent rows are written.
    async fn exists_active(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<bool>;
}

/// Repository trait for payment data access
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Payment>>;

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Payment>>;

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        enrollment_id: i64,
        new: &NewPayment,
    ) -> StoreResult<Payment>;

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &PaymentUpdate,
    ) -> StoreResult<()>;

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()>;

    /// Soft-deletes every active payment referencing the enrollment and
    /// returns how many rows transitioned. Zero is a valid outcome: a
    /// cascade over an enrollment with no active payment still succeeds.
    async fn soft_delete_by_enrollment(
        &self,
        conn: &mut SqliteConnection,
        enrollment_id: i64,
    ) -> StoreResult<u64>;
}

/// Repository trait for review data access
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn fetch_all(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<Review>>;

    async fn fetch_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> StoreResult<Option<Review>>;

    async fn insert(&self, conn: &mut SqliteConnection, new: &NewReview) -> StoreResult<Review>;

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        changes: &ReviewUpdate,
    ) -> StoreResult<()>;

    async fn soft_delete(&self, conn: &mut SqliteConnection, id: i64) -> StoreResult<()>;

    async fn soft_delete_by_enrollment(
        &self,
        conn: &mut SqliteConnection,
        enrollment_id: i64,
    ) -> StoreResult<u64>;
}
