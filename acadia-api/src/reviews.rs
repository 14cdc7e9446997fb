use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use acadia_core::models::{NewReview, Review, ReviewUpdate};
use acadia_core::StoreError;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reviews", get(list_reviews).post(create_review))
        .route(
            "/v1/reviews/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state.reviews.list().await?;
    Ok(Json(reviews))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>, AppError> {
    match state.reviews.get(id).await? {
        Some(review) => Ok(Json(review)),
        None => Err(AppError::NotFoundError(format!("review {} not found", id))),
    }
}

/// Registration is gated on the referenced enrollment being active; the
/// coordinator refuses the write otherwise.
async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::ValidationError(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let review = state
        .coordinator
        .register_review(req)
        .await
        .map_err(|_| AppError::OperationFailed)?;

    Ok((StatusCode::CREATED, Json(review)))
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ReviewUpdate>,
) -> Result<StatusCode, AppError> {
    if !(1..=5).contains(&changes.rating) {
        return Err(AppError::ValidationError(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    state.reviews.update(id, changes).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFoundError(format!("review {} not found", id)),
        other => AppError::Anyhow(other.into()),
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.reviews.delete(id).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFoundError(format!("review {} not found", id)),
        other => AppError::Anyhow(other.into()),
    })?;
    Ok(StatusCode::NO_CONTENT)
}
