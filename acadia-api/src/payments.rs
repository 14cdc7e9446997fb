use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use acadia_core::models::{Payment, PaymentUpdate};
use acadia_core::StoreError;

use crate::error::AppError;
use crate::state::AppState;

// Payments are created through POST /v1/enrollments; there is no standalone
// payment creation, a payment without its enrollment is meaningless.

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments", get(list_payments))
        .route(
            "/v1/payments/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = state.payments.list().await?;
    Ok(Json(payments))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, AppError> {
    match state.payments.get(id).await? {
        Some(payment) => Ok(Json(payment)),
        None => Err(AppError::NotFoundError(format!("payment {} not found", id))),
    }
}

async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<PaymentUpdate>,
) -> Result<StatusCode, AppError> {
    if changes.amount_cents < 0 {
        return Err(AppError::ValidationError(
            "amount_cents must not be negative".to_string(),
        ));
    }

    state.payments.update(id, changes).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFoundError(format!("payment {} not found", id)),
        other => AppError::Anyhow(other.into()),
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cascades: the payment, the reviews on its enrollment, and the enrollment
/// itself are all retired as one group.
async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .coordinator
        .delete_payment(id)
        .await
        .map_err(|_| AppError::OperationFailed)?;
    Ok(StatusCode::NO_CONTENT)
}
