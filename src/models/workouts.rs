use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub workout_log_id: Uuid,
    pub name: String,
    pub duration_min: i32,
    pub calories_burned: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub duration_min: i32,
    pub calories_burned: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub name: String,
    pub duration_min: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub duration_min: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogResponse {
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
    pub total_calories_burned: f64,
}

impl WorkoutLogResponse {
    pub fn from_exercises(date: NaiveDate, exercises: Vec<Exercise>) -> Self {
        let total_calories_burned = exercises.iter().map(|e| e.calories_burned).sum();
        Self {
            date,
            exercises,
            total_calories_burned,
        }
    }
}
