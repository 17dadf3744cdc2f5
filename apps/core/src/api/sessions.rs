use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::SharedState;
use crate::error::AppError;
use crate::models::{ChatSession, Settings};

pub async fn list_sessions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ChatSession>>, AppError> {
    Ok(Json(state.history.list().await?))
}

pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChatSession>, AppError> {
    Ok(Json(state.history.get(&id).await?))
}

pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.history.delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn clear_sessions(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    state.history.clear().await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_settings(State(state): State<SharedState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.history.settings().await?))
}

pub async fn put_settings(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Settings>, AppError> {
    let body: Value = serde_json::from_slice(&body)?;
    let settings: Settings = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid settings: {}", e)))?;
    state.history.save_settings(&settings).await?;
    Ok(Json(settings))
}
