use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::meals::{AddMealItemRequest, AddMealItemResponse, MealPlanResponse, NewMealItem, NutritionFacts},
    queries,
    services::nutrition::NutritionLookup,
    validation::{validate_non_negative, validate_required},
};

pub const LOOKUP_NOT_FOUND_WARNING: &str = "No nutrition data found for this description; calories were set to 0.";
pub const LOOKUP_FAILED_WARNING: &str = "Nutrition lookup is unavailable; calories were set to 0.";

pub async fn get_plan(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<MealPlanResponse> {
    let items = queries::meal_plans::list_items_for_date(conn, user_id, date).await?;
    Ok(MealPlanResponse::from_items(date, items))
}

/// Turns the request into an item, asking the nutrition lookup when the
/// caller gave no calories. A failed lookup still yields an item.
pub async fn prepare_item(
    nutrition: &dyn NutritionLookup,
    request: &AddMealItemRequest,
) -> Result<(NewMealItem, Option<&'static str>)> {
    validate_required("description", &request.description)?;
    let description = request.description.trim().to_string();

    if let Some(calories) = request.calories {
        validate_non_negative("calories", calories)?;
        let facts = NutritionFacts {
            calories,
            protein_g: request.protein_g.unwrap_or(0.0),
            carbs_g: request.carbs_g.unwrap_or(0.0),
            fat_g: request.fat_g.unwrap_or(0.0),
            serving_size_g: request.serving_size_g.unwrap_or(0.0),
        };
        return Ok((NewMealItem { description, facts }, None));
    }

    let (facts, warning) = match nutrition.lookup(&description).await {
        Ok(Some(facts)) => (facts, None),
        Ok(None) => (NutritionFacts::default(), Some(LOOKUP_NOT_FOUND_WARNING)),
        Err(e) => {
            tracing::warn!(error = %e, "Nutrition lookup failed, logging item with 0 calories");
            (NutritionFacts::default(), Some(LOOKUP_FAILED_WARNING))
        }
    };
    Ok((NewMealItem { description, facts }, warning))
}

pub async fn add_item(
    conn: &mut DbConn,
    nutrition: &dyn NutritionLookup,
    user_id: Uuid,
    date: NaiveDate,
    request: AddMealItemRequest,
) -> Result<AddMealItemResponse> {
    let (item, warning) = prepare_item(nutrition, &request).await?;
    let item = queries::meal_plans::append_item(conn, user_id, date, request.slot, &item).await?;
    tracing::info!(user_id = %user_id, %date, slot = %request.slot, "Meal item added");
    Ok(AddMealItemResponse {
        item,
        warning: warning.map(str::to_string),
    })
}

pub async fn remove_item(conn: &mut DbConn, user_id: Uuid, date: NaiveDate, item_id: Uuid) -> Result<()> {
    let removed = queries::meal_plans::delete_item(conn, user_id, date, item_id).await?;
    if removed == 0 {
        return Err(Error::NotFound("Meal item not found".to_string()));
    }
    Ok(())
}
