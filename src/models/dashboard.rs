use serde::{Deserialize, Serialize};

use crate::models::meals::MealItem;
use crate::models::workouts::Exercise;

/// Per-day totals read by the chatbot summary and the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub calories_consumed: f64,
    pub calories_burned: f64,
    pub water_liters: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub calorie_goal: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub calories_consumed: i64,
    pub calories_burned: i64,
    pub calories_left: i64,
    pub water_intake_liters: f64,
    pub meals: Vec<MealItem>,
    pub workouts: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodaySummary {
    pub goals: Goals,
    pub today: TodayProgress,
}
