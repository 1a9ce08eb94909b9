//! User CRUD endpoints. All of them require an authenticated administrator.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::error::ApiError;
use crate::http::handlers::require_admin;
use crate::http::middleware::identity::CallerIdentity;
use crate::http::server::AppState;
use crate::users::model::{UserRequest, UserResponse};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(state.users.list().await))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(state.users.get(&id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_admin(&identity)?;
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    // Deliberate failure hook for exercising the 500 path end to end.
    if request.name.to_lowercase() == "error 500 fake" {
        return Err(ApiError::internal("Error 500 adding user. [FAKE]"));
    }

    let created = state.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&identity)?;
    let Json(mut request) =
        payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    // The path, not the body, names the target account.
    request.user_id = id;
    Ok(Json(state.users.update(request).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&identity)?;
    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
