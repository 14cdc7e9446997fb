use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use acadia_core::models::{Enrollment, EnrollmentUpdate, NewEnrollment, NewPayment, Payment};
use acadia_core::StoreError;

use crate::error::AppError;
use crate::state::AppState;

/// An enrollment is never created bare: registration takes the payment with
/// it and the coordinator applies both atomically.
#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub amount_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentCreatedResponse {
    pub enrollment: Enrollment,
    pub payment: Payment,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/enrollments",
            get(list_enrollments).post(create_enrollment),
        )
        .route(
            "/v1/enrollments/{id}",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
}

async fn list_enrollments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = state.enrollments.list().await?;
    Ok(Json(enrollments))
}

async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Enrollment>, AppError> {
    match state.enrollments.get(id).await? {
        Some(enrollment) => Ok(Json(enrollment)),
        None => Err(AppError::NotFoundError(format!(
            "enrollment {} not found",
            id
        ))),
    }
}

async fn create_enrollment(
    State(state): State<AppState>,
    Json(req): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentCreatedResponse>), AppError> {
    if req.amount_cents < 0 {
        return Err(AppError::ValidationError(
            "amount_cents must not be negative".to_string(),
        ));
    }

    let (enrollment, payment) = state
        .coordinator
        .create_enrollment_with_payment(
            NewEnrollment {
                student_id: req.student_id,
                class_id: req.class_id,
            },
            NewPayment {
                amount_cents: req.amount_cents,
            },
        )
        .await
        .map_err(|_| AppError::OperationFailed)?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentCreatedResponse {
            enrollment,
            payment,
        }),
    ))
}

async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<EnrollmentUpdate>,
) -> Result<StatusCode, AppError> {
    state.enrollments.update(id, changes).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFoundError(format!("enrollment {} not found", id)),
        other => AppError::Anyhow(other.into()),
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .coordinator
        .delete_enrollment(id)
        .await
        .map_err(|_| AppError::OperationFailed)?;
    Ok(StatusCode::NO_CONTENT)
}
