use axum::{
    extract::{Extension, Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::users::{Analytics, ResetPassword, UserSummary},
    services::admin,
    state::AppState,
};

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(admin::list_users(&mut conn).await?))
}

/// DELETE /api/admin/users/{id}
///
/// Deletes the account and, through cascading foreign keys, all of its
/// records.
///
/// # HTTP Status Codes
/// - `200 OK`: User removed
/// - `400 BAD_REQUEST`: Target is an admin
/// - `403 FORBIDDEN`: Caller is not an admin
/// - `404 NOT_FOUND`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    admin::delete_user(&mut conn, admin_user.id, user_id).await?;
    Ok(Json(serde_json::json!({ "message": "User removed" })))
}

/// PUT /api/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(admin_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ResetPassword>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    admin::reset_user_password(&mut conn, admin_user.id, user_id, &request.new_password).await?;
    Ok(Json(serde_json::json!({ "message": "Password reset successfully" })))
}

/// GET /api/admin/analytics
pub async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(admin::analytics(&mut conn).await?))
}
