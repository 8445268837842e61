// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        identity::UserId,
        session::{AnswerRequest, CompareRequest, SessionSnapshot},
    },
    quiz::controller::SessionController,
    state::{AppState, SessionRegistry},
    utils::jwt::bearer_token,
};

/// Locks the session for this request, or fails with 404 / 409.
async fn locked(
    sessions: &SessionRegistry,
    id: Uuid,
) -> Result<OwnedMutexGuard<SessionController>, AppError> {
    sessions
        .lock(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
}

fn snapshot(id: Uuid, controller: &SessionController) -> Json<SessionSnapshot> {
    Json(SessionSnapshot::new(id, controller.session(), controller.bank()))
}

/// Creates a session on the landing view.
///
/// Signs in right away when the request carries a bearer token.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = state.new_controller();
    if let Some(token) = bearer_token(&headers) {
        controller.sign_in(Some(token)).await?;
    }

    let id = state.sessions.insert(controller).await;
    let controller = locked(&state.sessions, id).await?;
    tracing::info!("Created session {}", id);

    Ok((StatusCode::CREATED, snapshot(id, &controller)))
}

pub async fn get_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let controller = locked(&sessions, id).await?;
    Ok(snapshot(id, &controller))
}

/// Tears the session down, discarding everything it held.
pub async fn delete_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !sessions.remove(&id).await {
        return Err(AppError::NotFound(format!("Session {} not found", id)));
    }
    tracing::info!("Closed session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sign_in(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.sign_in(bearer_token(&headers)).await?;
    Ok(snapshot(id, &controller))
}

pub async fn sign_out(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.sign_out().await?;
    Ok(snapshot(id, &controller))
}

/// Starts the quiz. Without an identity on the session, the bearer token is used to sign in.
pub async fn start_quiz(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.start_quiz(bearer_token(&headers)).await?;
    Ok(snapshot(id, &controller))
}

/// Answers the question on screen. The last answer moves to the results view and
/// saves the result; if the save fails the answer is not recorded and may be resent.
pub async fn submit_answer(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut controller = locked(&sessions, id).await?;
    controller.answer(payload.option).await?;
    Ok(snapshot(id, &controller))
}

/// Shows the signed-in user's saved result.
pub async fn review_saved(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.review_saved().await?;
    Ok(snapshot(id, &controller))
}

pub async fn compare(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompareRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let partner = UserId::new(payload.partner_id)
        .ok_or(AppError::BadRequest("Partner id is empty".to_string()))?;

    let mut controller = locked(&sessions, id).await?;
    controller.compare(partner, payload.focus).await?;
    Ok(snapshot(id, &controller))
}

pub async fn back(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.back().await?;
    Ok(snapshot(id, &controller))
}

pub async fn home(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut controller = locked(&sessions, id).await?;
    controller.home().await?;
    Ok(snapshot(id, &controller))
}
