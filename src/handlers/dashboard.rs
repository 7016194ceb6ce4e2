use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::dashboard::TodaySummary,
    services::dashboard,
    state::AppState,
    utils::today,
};

/// GET /api/dashboard/today-summary
///
/// Calorie goal and today's consumed/burned calories, water, meals and
/// workouts. The goal falls back to 2000 kcal without a fitness status.
pub async fn today_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<TodaySummary>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(dashboard::today_summary(&mut conn, user.id, today()).await?))
}
