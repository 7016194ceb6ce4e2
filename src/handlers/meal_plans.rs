use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::meals::{AddMealItemRequest, AddMealItemResponse, MealPlanResponse},
    services::meal_plans,
    state::AppState,
    utils::parse_date,
};

/// GET /api/meal-plans/{date}
///
/// Returns the plan grouped by slot; an empty plan when nothing was logged.
pub async fn get_meal_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> Result<Json<MealPlanResponse>> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(meal_plans::get_plan(&mut conn, user.id, date).await?))
}

/// POST /api/meal-plans/{date}/items
///
/// Adds one item to a slot. Without explicit calories the nutrition lookup
/// fills them in; a failed lookup still stores the item with 0 calories and
/// returns a `warning`.
///
/// # HTTP Status Codes
/// - `201 CREATED`: Item added
/// - `400 BAD_REQUEST`: Invalid date, slot or description
pub async fn add_meal_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
    Json(request): Json<AddMealItemRequest>,
) -> Result<(StatusCode, Json<AddMealItemResponse>)> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let response = meal_plans::add_item(&mut conn, state.nutrition.as_ref(), user.id, date, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/meal-plans/{date}/items/{item_id}
pub async fn delete_meal_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((date, item_id)): Path<(String, Uuid)>,
) -> Result<StatusCode> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    meal_plans::remove_item(&mut conn, user.id, date, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
