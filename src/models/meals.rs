use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Meal slot of a daily plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Capitalized name shown to people.
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
        }
    }
}

/// Nutrition values for one described food, summed over every matched item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub serving_size_g: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMealItem {
    pub description: String,
    pub facts: NutritionFacts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub meal_plan_id: Uuid,
    pub slot: MealSlot,
    pub description: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub serving_size_g: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealItemRequest {
    pub slot: MealSlot,
    pub description: String,
    /// When absent the nutrition lookup fills in every value.
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub serving_size_g: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealItemResponse {
    pub item: MealItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub items: Vec<MealItem>,
    pub total_calories: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SlotMeals {
    pub breakfast: SlotSummary,
    pub lunch: SlotSummary,
    pub dinner: SlotSummary,
    pub snack: SlotSummary,
}

impl SlotMeals {
    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut SlotSummary {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snack => &mut self.snack,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub date: NaiveDate,
    pub meals: SlotMeals,
    pub total_calories: f64,
}

impl MealPlanResponse {
    /// Groups a day's items by slot and totals them.
    pub fn from_items(date: NaiveDate, items: Vec<MealItem>) -> Self {
        let mut meals = SlotMeals::default();
        let mut total_calories = 0.0;
        for item in items {
            total_calories += item.calories;
            let slot = meals.slot_mut(item.slot);
            slot.total_calories += item.calories;
            slot.items.push(item);
        }
        Self {
            date,
            meals,
            total_calories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(slot: MealSlot, calories: f64) -> MealItem {
        MealItem {
            id: Uuid::now_v7(),
            meal_plan_id: Uuid::nil(),
            slot,
            description: "food".to_string(),
            calories,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            serving_size_g: 100.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_slot_parsing_is_case_insensitive() {
        assert_eq!(MealSlot::from_str("Breakfast").unwrap(), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_str("snack").unwrap(), MealSlot::Snack);
        assert!(MealSlot::from_str("brunch").is_err());
        assert_eq!(MealSlot::Dinner.to_string(), "dinner");
        assert_eq!(MealSlot::Dinner.label(), "Dinner");
    }

    #[test]
    fn test_plan_groups_items_by_slot() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let plan = MealPlanResponse::from_items(
            date,
            vec![
                item(MealSlot::Lunch, 300.0),
                item(MealSlot::Lunch, 150.5),
                item(MealSlot::Snack, 90.0),
            ],
        );
        assert_eq!(plan.meals.lunch.items.len(), 2);
        assert_eq!(plan.meals.lunch.total_calories, 450.5);
        assert_eq!(plan.meals.snack.total_calories, 90.0);
        assert!(plan.meals.breakfast.items.is_empty());
        assert_eq!(plan.total_calories, 540.5);
    }
}
