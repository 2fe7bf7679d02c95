use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    database::StoreStatus,
    error::AppError,
    models::{CreateFeedback, Created, DbStatus, HEALTH_MESSAGE, Health, Listed},
    state::AppState,
    utils::validate_feedback,
};

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "success",
        message: HEALTH_MESSAGE,
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn db_status_handler(State(state): State<Arc<AppState>>) -> Json<DbStatus> {
    let database = match state.store.status().await {
        StoreStatus::Connected => "MongoDB connected",
        StoreStatus::Disconnected => "MongoDB not connected",
    };

    Json(DbStatus { database })
}

pub async fn create_feedback_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateFeedback>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected feedback payload: {e}");

        match e {
            // a body that is not JSON at all carries no fields
            JsonRejection::MissingJsonContentType(_) => AppError::MissingFields,
            _ => AppError::MalformedPayload,
        }
    })?;

    let new_feedback = validate_feedback(payload)?;
    let saved = state
        .store
        .insert(new_feedback)
        .await
        .map_err(AppError::Save)?;

    Ok((StatusCode::CREATED, Json(Created::new(saved))))
}

pub async fn list_feedback_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listed>, AppError> {
    let entries = state.store.list().await.map_err(AppError::Fetch)?;

    Ok(Json(Listed::new(entries)))
}
