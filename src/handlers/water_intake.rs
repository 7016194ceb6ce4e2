use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::water::{UpdateWaterRequest, WaterIntakeResponse},
    services::water_intake,
    state::AppState,
    utils::parse_date,
};

/// GET /api/water-intake/{date}
///
/// `isNew` is true when nothing was recorded for the day yet.
pub async fn get_water_intake(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> Result<Json<WaterIntakeResponse>> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(water_intake::get_intake(&mut conn, user.id, date).await?))
}

/// PUT /api/water-intake/{date}
///
/// Replaces the day's total with `litersDrank`.
///
/// # HTTP Status Codes
/// - `200 OK`: Total saved
/// - `400 BAD_REQUEST`: Invalid date or negative amount
pub async fn update_water_intake(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
    Json(request): Json<UpdateWaterRequest>,
) -> Result<Json<WaterIntakeResponse>> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(water_intake::set_intake(&mut conn, user.id, date, request).await?))
}
