use acadia_core::models::{
    Enrollment, EnrollmentUpdate, NewEnrollment, NewPayment, NewReview, PaymentUpdate,
    RecordStatus, ReviewUpdate,
};
use acadia_core::repository::{EnrollmentRepository, PaymentRepository, ReviewRepository};
use acadia_core::StoreError;
use acadia_store::{
    DbClient, SqliteEnrollmentRepository, SqlitePaymentRepository, SqliteReviewRepository,
};

async fn test_db() -> DbClient {
    let db = DbClient::new("sqlite::memory:")
        .await
        .expect("open in-memory database");
    db.migrate().await.expect("run migrations");
    db
}

async fn enroll(db: &DbClient, student_id: i64, class_id: i64) -> Enrollment {
    let repo = SqliteEnrollmentRepository::new();
    let mut conn = db.pool.acquire().await.unwrap();
    repo.insert(
        &mut conn,
        &NewEnrollment {
            student_id,
            class_id,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn insert_assigns_id_and_defaults() {
    let db = test_db().await;
    let enrollment = enroll(&db, 1, 1).await;

    assert!(enrollment.id > 0);
    assert_eq!(enrollment.status, RecordStatus::Active);
    assert!(enrollment.updated_at.is_none());
    assert!(enrollment.deleted_at.is_none());
}

#[tokio::test]
async fn fetch_by_id_returns_only_active() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();
    let enrollment = enroll(&db, 1, 2).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let found = repo.fetch_by_id(&mut conn, enrollment.id).await.unwrap();
    assert_eq!(found.unwrap().student_id, 1);

    repo.soft_delete(&mut conn, enrollment.id).await.unwrap();
    let gone = repo.fetch_by_id(&mut conn, enrollment.id).await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn fetch_all_skips_deleted_rows() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();
    let first = enroll(&db, 1, 1).await;
    let _second = enroll(&db, 2, 2).await;

    let mut conn = db.pool.acquire().await.unwrap();
    repo.soft_delete(&mut conn, first.id).await.unwrap();

    let remaining = repo.fetch_all(&mut conn).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].student_id, 2);
}

#[tokio::test]
async fn update_refreshes_updated_at() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    repo.update(
        &mut conn,
        enrollment.id,
        &EnrollmentUpdate {
            student_id: 5,
            class_id: 9,
        },
    )
    .await
    .unwrap();

    let updated = repo
        .fetch_by_id(&mut conn, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.student_id, 5);
    assert_eq!(updated.class_id, 9);
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn update_missing_enrollment_fails() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();

    let mut conn = db.pool.acquire().await.unwrap();
    let result = repo
        .update(
            &mut conn,
            4242,
            &EnrollmentUpdate {
                student_id: 1,
                class_id: 1,
            },
        )
        .await;
    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn soft_delete_is_terminal() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    repo.soft_delete(&mut conn, enrollment.id).await.unwrap();

    // The row is already deleted, a second delete matches nothing.
    let again = repo.soft_delete(&mut conn, enrollment.id).await;
    assert!(matches!(again, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn exists_active_flips_on_delete() {
    let db = test_db().await;
    let repo = SqliteEnrollmentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    assert!(repo.exists_active(&mut conn, enrollment.id).await.unwrap());

    repo.soft_delete(&mut conn, enrollment.id).await.unwrap();
    assert!(!repo.exists_active(&mut conn, enrollment.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_active_payment_rejected_until_first_is_deleted() {
    let db = test_db().await;
    let payments = SqlitePaymentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let first = payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: 10_000 })
        .await
        .unwrap();

    let duplicate = payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: 20_000 })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Database(_))));

    // A deleted payment no longer counts toward the uniqueness rule.
    payments.soft_delete(&mut conn, first.id).await.unwrap();
    let replacement = payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: 20_000 })
        .await;
    assert!(replacement.is_ok());
}

#[tokio::test]
async fn negative_payment_amount_rejected() {
    let db = test_db().await;
    let payments = SqlitePaymentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let result = payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: -1 })
        .await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test]
async fn payment_requires_existing_enrollment() {
    let db = test_db().await;
    let payments = SqlitePaymentRepository::new();

    let mut conn = db.pool.acquire().await.unwrap();
    let result = payments
        .insert(&mut conn, 9999, &NewPayment { amount_cents: 100 })
        .await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test]
async fn payment_update_changes_amount_only_for_active_rows() {
    let db = test_db().await;
    let payments = SqlitePaymentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let payment = payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: 10_000 })
        .await
        .unwrap();

    payments
        .update(&mut conn, payment.id, &PaymentUpdate { amount_cents: 30_000 })
        .await
        .unwrap();
    let updated = payments
        .fetch_by_id(&mut conn, payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount_cents, 30_000);

    payments.soft_delete(&mut conn, payment.id).await.unwrap();
    let on_deleted = payments
        .update(&mut conn, payment.id, &PaymentUpdate { amount_cents: 1 })
        .await;
    assert!(matches!(on_deleted, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn delete_payments_by_enrollment_reports_row_count() {
    let db = test_db().await;
    let payments = SqlitePaymentRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    payments
        .insert(&mut conn, enrollment.id, &NewPayment { amount_cents: 100 })
        .await
        .unwrap();

    let affected = payments
        .soft_delete_by_enrollment(&mut conn, enrollment.id)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    // Nothing active remains; the cascade form succeeds with zero rows.
    let affected = payments
        .soft_delete_by_enrollment(&mut conn, enrollment.id)
        .await
        .unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn review_crud_roundtrip() {
    let db = test_db().await;
    let reviews = SqliteReviewRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let review = reviews
        .insert(
            &mut conn,
            &NewReview {
                enrollment_id: enrollment.id,
                rating: 5,
                content: "great course".to_string(),
            },
        )
        .await
        .unwrap();

    reviews
        .update(
            &mut conn,
            review.id,
            &ReviewUpdate {
                rating: 3,
                content: "revised opinion".to_string(),
            },
        )
        .await
        .unwrap();

    let updated = reviews
        .fetch_by_id(&mut conn, review.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.rating, 3);
    assert_eq!(updated.content, "revised opinion");
    assert_eq!(updated.enrollment_id, enrollment.id);
}

#[tokio::test]
async fn review_rating_out_of_range_rejected() {
    let db = test_db().await;
    let reviews = SqliteReviewRepository::new();
    let enrollment = enroll(&db, 1, 1).await;

    let mut conn = db.pool.acquire().await.unwrap();
    let result = reviews
        .insert(
            &mut conn,
            &NewReview {
                enrollment_id: enrollment.id,
                rating: 6,
                content: "off the scale".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}
