//! Thin proxies over API Ninjas so the browser never sees the API key.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    services::nutrition::kg_to_lb,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FoodNutritionQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaloriesBurnedQuery {
    pub activity: Option<String>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    pub duration: Option<i32>,
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(field, format!("{} query parameter is required", field)))
}

/// GET /api/external/food-nutrition?query=
///
/// # HTTP Status Codes
/// - `200 OK`: Raw API Ninjas response
/// - `400 BAD_REQUEST`: Missing `query`
/// - `502 BAD_GATEWAY`: Upstream failure
/// - `503 SERVICE_UNAVAILABLE`: API key not configured
pub async fn food_nutrition(
    State(state): State<AppState>,
    Query(params): Query<FoodNutritionQuery>,
) -> Result<Json<Value>> {
    let query = required("query", params.query)?;
    Ok(Json(state.nutrition.nutrition_raw(&query).await?))
}

/// GET /api/external/calories-burned?activity=&weight=&duration=
pub async fn calories_burned(
    State(state): State<AppState>,
    Query(params): Query<CaloriesBurnedQuery>,
) -> Result<Json<Value>> {
    let activity = required("activity", params.activity)?;
    let weight_lb = params.weight.map(kg_to_lb);
    Ok(Json(
        state
            .nutrition
            .calories_burned_raw(&activity, weight_lb, params.duration)
            .await?,
    ))
}
