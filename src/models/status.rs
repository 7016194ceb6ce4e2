use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Harris-Benedict activity multiplier applied to the BMR.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::Active => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, sqlx::Type,
)]
#[sqlx(type_name = "text")]
pub enum FitnessGoal {
    Maintenance,
    Cutting,
    Bulking,
}

impl FitnessGoal {
    /// Daily calorie offset from maintenance.
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            FitnessGoal::Maintenance => 0.0,
            FitnessGoal::Cutting => -500.0,
            FitnessGoal::Bulking => 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "goalWeight")]
    pub goal_weight_kg: f64,
    pub age: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
    pub updated_at: DateTime<Utc>,
}

/// Validated body metrics ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserStatus {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal_weight_kg: f64,
    pub age: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
}

/// Incoming status update. Every field is required; missing ones are reported
/// individually by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<FitnessGoal>,
}

/// `GET /profile/status` body: the stored status, or a hint for new users.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusResponse {
    Found(UserStatus),
    Missing { message: String },
}
