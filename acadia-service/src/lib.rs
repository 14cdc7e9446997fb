pub mod coordinator;
pub mod enrollment;
pub mod payment;
pub mod review;

pub use coordinator::{OperationFailed, TransactionCoordinator};
pub use enrollment::EnrollmentService;
pub use payment::PaymentService;
pub use review::ReviewService;
