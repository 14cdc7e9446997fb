use std::sync::Arc;

use acadia_core::repository::{EnrollmentRepository, PaymentRepository, ReviewRepository};
use acadia_service::{
    EnrollmentService, PaymentService, ReviewService, TransactionCoordinator,
};
use acadia_store::{
    DbClient, SqliteEnrollmentRepository, SqlitePaymentRepository, SqliteReviewRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub coordinator: Arc<TransactionCoordinator>,
    pub enrollments: Arc<EnrollmentService>,
    pub payments: Arc<PaymentService>,
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    /// Wires the SQLite repositories into the coordinator and the three
    /// single-entity services, all sharing the client's one-connection pool.
    pub fn new(db: DbClient) -> Self {
        let pool = db.pool.clone();

        let enrollment_repo: Arc<dyn EnrollmentRepository> =
            Arc::new(SqliteEnrollmentRepository::new());
        let payment_repo: Arc<dyn PaymentRepository> = Arc::new(SqlitePaymentRepository::new());
        let review_repo: Arc<dyn ReviewRepository> = Arc::new(SqliteReviewRepository::new());

        let coordinator = TransactionCoordinator::new(
            pool.clone(),
            enrollment_repo.clone(),
            payment_repo.clone(),
            review_repo.clone(),
        );

        Self {
            db: Arc::new(db),
            coordinator: Arc::new(coordinator),
            enrollments: Arc::new(EnrollmentService::new(pool.clone(), enrollment_repo)),
            payments: Arc::new(PaymentService::new(pool.clone(), payment_repo)),
            reviews: Arc::new(ReviewService::new(pool, review_repo)),
        }
    }
}
