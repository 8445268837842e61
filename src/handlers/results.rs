// src/handlers/results.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{identity::UserId, result::ResultSummary},
    store::ResultStore,
};

/// Fetches the stored result of any user by uid.
///
/// This is how a partner's uid is checked before comparing.
pub async fn get_result(
    State(store): State<Arc<dyn ResultStore>>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let uid = UserId::new(uid).ok_or(AppError::BadRequest("User id is empty".to_string()))?;

    let result = store
        .fetch(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No result found for '{}'", uid)))?;

    Ok(Json(ResultSummary::from(&result)))
}
