use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::{
        status::{StatusResponse, UpdateStatusRequest, UserStatus},
        users::{UpdateProfile, UserProfile},
    },
    services::{status, users},
    state::AppState,
};

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserProfile>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let user = users::get_user(&mut conn, user.id).await?;
    Ok(Json(UserProfile::from(&user)))
}

/// PUT /api/profile
///
/// Updates any of name, email and password. Each provided field is
/// validated again; the password is re-hashed.
///
/// # HTTP Status Codes
/// - `200 OK`: Profile updated
/// - `400 BAD_REQUEST`: Validation error
/// - `409 CONFLICT`: Email taken by another account
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfile>,
) -> Result<Json<UserProfile>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let updated = users::update_profile(&mut conn, user.id, request).await?;
    tracing::info!(user_id = %updated.id, "Profile updated");
    Ok(Json(UserProfile::from(&updated)))
}

/// GET /api/profile/status
///
/// Returns the fitness status, or a placeholder message when none was saved.
pub async fn get_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<StatusResponse>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(status::get_status(&mut conn, user.id).await?))
}

/// PUT /api/profile/status
///
/// # HTTP Status Codes
/// - `200 OK`: Status saved
/// - `400 BAD_REQUEST`: Missing or non-positive fields, listed per field
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<UserStatus>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(status::update_status(&mut conn, user.id, request).await?))
}
