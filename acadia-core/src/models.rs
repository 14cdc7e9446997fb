use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state shared by every record, persisted as a small integer
/// (0 = active, 1 = deleted). Deleted is terminal: a row never transitions
/// back, a replacement row is created instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum RecordStatus {
    Active = 0,
    Deleted = 1,
}

/// A student's registration in a class. Root of the dependency graph:
/// payments and reviews reference it, nothing references them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payment taken for one enrollment. Amounts are minor currency units.
/// At most one active payment may reference a given enrollment; deleted
/// payments do not count toward that limit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub amount_cents: i64,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub enrollment_id: i64,
}

/// Student feedback on one enrollment, rated 1 to 5. Same active-only
/// uniqueness rule as payments.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub rating: i32,
    pub content: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub enrollment_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub class_id: i64,
}

/// The enrollment reference is deliberately absent here: it is only known
/// after the enrollment insert, and the coordinator threads it through.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub enrollment_id: i64,
    pub rating: i32,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentUpdate {
    pub student_id: i64,
    pub class_id: i64,
}

/// The enrollment reference is a foreign key and stays immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentUpdate {
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUpdate {
    pub rating: i32,
    pub content: String,
}
