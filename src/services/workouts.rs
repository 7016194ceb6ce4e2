use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::workouts::{CreateExerciseRequest, Exercise, NewExercise, UpdateExerciseRequest, WorkoutLogResponse},
    queries,
    services::nutrition::ExerciseCaloriesLookup,
    validation::validate_required,
};

fn validate_duration(duration_min: i32) -> Result<()> {
    if duration_min <= 0 {
        return Err(Error::validation("durationMin", "durationMin must be a positive number of minutes"));
    }
    Ok(())
}

/// Body weight for estimates: the user's status, else the configured default.
async fn weight_for(conn: &mut DbConn, user_id: Uuid, default_weight_kg: f64) -> Result<f64> {
    Ok(queries::status::get_status(conn, user_id)
        .await?
        .map(|status| status.weight_kg)
        .unwrap_or(default_weight_kg))
}

/// Estimated calories for the activity, 0 when the lookup misses or fails.
pub async fn estimate_calories(
    lookup: &dyn ExerciseCaloriesLookup,
    name: &str,
    duration_min: i32,
    weight_kg: f64,
) -> f64 {
    match lookup.calories_burned(name, duration_min, weight_kg).await {
        Ok(Some(calories)) => calories,
        Ok(None) => {
            tracing::info!(activity = name, "No calorie estimate for activity");
            0.0
        }
        Err(e) => {
            tracing::warn!(activity = name, error = %e, "Calories-burned lookup failed");
            0.0
        }
    }
}

pub async fn get_log(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<WorkoutLogResponse> {
    let exercises = queries::workouts::list_exercises_for_date(conn, user_id, date).await?;
    Ok(WorkoutLogResponse::from_exercises(date, exercises))
}

pub async fn add_exercise(
    conn: &mut DbConn,
    lookup: &dyn ExerciseCaloriesLookup,
    default_weight_kg: f64,
    user_id: Uuid,
    date: NaiveDate,
    request: CreateExerciseRequest,
) -> Result<Exercise> {
    validate_required("name", &request.name)?;
    validate_duration(request.duration_min)?;

    let name = request.name.trim().to_string();
    let weight_kg = weight_for(conn, user_id, default_weight_kg).await?;
    let calories_burned = estimate_calories(lookup, &name, request.duration_min, weight_kg).await;

    let exercise = NewExercise {
        name,
        duration_min: request.duration_min,
        calories_burned,
        notes: request.notes,
    };
    let stored = queries::workouts::append_exercise(conn, user_id, date, &exercise).await?;
    tracing::info!(user_id = %user_id, %date, calories = stored.calories_burned, "Exercise logged");
    Ok(stored)
}

/// Applies changes, re-estimating calories if the activity or duration changed.
pub async fn update_exercise(
    conn: &mut DbConn,
    lookup: &dyn ExerciseCaloriesLookup,
    default_weight_kg: f64,
    user_id: Uuid,
    date: NaiveDate,
    exercise_id: Uuid,
    request: UpdateExerciseRequest,
) -> Result<Exercise> {
    let existing = queries::workouts::get_exercise(conn, user_id, date, exercise_id)
        .await?
        .ok_or_else(|| Error::NotFound("Exercise not found".to_string()))?;

    if let Some(name) = &request.name {
        validate_required("name", name)?;
    }
    if let Some(duration) = request.duration_min {
        validate_duration(duration)?;
    }

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| existing.name.clone());
    let duration_min = request.duration_min.unwrap_or(existing.duration_min);

    let calories_burned = if name != existing.name || duration_min != existing.duration_min {
        let weight_kg = weight_for(conn, user_id, default_weight_kg).await?;
        estimate_calories(lookup, &name, duration_min, weight_kg).await
    } else {
        existing.calories_burned
    };

    let exercise = NewExercise {
        name,
        duration_min,
        calories_burned,
        notes: request.notes.or(existing.notes),
    };
    queries::workouts::update_exercise(conn, existing.id, &exercise).await
}

pub async fn remove_exercise(conn: &mut DbConn, user_id: Uuid, date: NaiveDate, exercise_id: Uuid) -> Result<()> {
    let removed = queries::workouts::delete_exercise(conn, user_id, date, exercise_id).await?;
    if removed == 0 {
        return Err(Error::NotFound("Exercise not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingLookup;

    #[async_trait]
    impl ExerciseCaloriesLookup for FailingLookup {
        async fn calories_burned(&self, _activity: &str, _duration_min: i32, _weight_kg: f64) -> Result<Option<f64>> {
            Err(Error::ExternalService("timeout".to_string()))
        }
    }

    struct PerMinute(f64);

    #[async_trait]
    impl ExerciseCaloriesLookup for PerMinute {
        async fn calories_burned(&self, _activity: &str, duration_min: i32, _weight_kg: f64) -> Result<Option<f64>> {
            Ok(Some(self.0 * duration_min as f64))
        }
    }

    #[tokio::test]
    async fn test_failed_estimate_is_zero() {
        assert_eq!(estimate_calories(&FailingLookup, "rowing", 30, 70.0).await, 0.0);
    }

    #[tokio::test]
    async fn test_estimate_uses_lookup() {
        assert_eq!(estimate_calories(&PerMinute(8.0), "running", 30, 70.0).await, 240.0);
    }

    #[test]
    fn test_duration_must_be_positive() {
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-5).is_err());
        assert!(validate_duration(45).is_ok());
    }
}
