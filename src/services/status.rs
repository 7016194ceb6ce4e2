use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result, ValidationErrors},
    models::status::{NewUserStatus, StatusResponse, UpdateStatusRequest, UserStatus},
    queries,
};

const MISSING_STATUS_MESSAGE: &str =
    "No fitness status recorded yet. Add your height, weight and goal to get a personalised calorie goal.";

pub async fn get_status(conn: &mut DbConn, user_id: Uuid) -> Result<StatusResponse> {
    Ok(match queries::status::get_status(conn, user_id).await? {
        Some(status) => StatusResponse::Found(status),
        None => StatusResponse::Missing {
            message: MISSING_STATUS_MESSAGE.to_string(),
        },
    })
}

/// Checks that every field is present and in range, collecting all problems.
pub fn validate_status(request: UpdateStatusRequest) -> Result<NewUserStatus> {
    let mut errors = std::collections::HashMap::new();

    let mut positive = |field: &str, value: Option<f64>| -> f64 {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            Some(_) => {
                errors.insert(field.to_string(), format!("{} must be a positive number", field));
                0.0
            }
            None => {
                errors.insert(field.to_string(), format!("{} is required", field));
                0.0
            }
        }
    };
    let height_cm = positive("height", request.height);
    let weight_kg = positive("weight", request.weight);
    let goal_weight_kg = positive("goalWeight", request.goal_weight);

    let age = match request.age {
        Some(age) if age > 0 && age < 150 => age,
        Some(_) => {
            errors.insert("age".to_string(), "age must be between 1 and 149".to_string());
            0
        }
        None => {
            errors.insert("age".to_string(), "age is required".to_string());
            0
        }
    };

    if request.gender.is_none() {
        errors.insert("gender".to_string(), "gender is required".to_string());
    }
    if request.activity_level.is_none() {
        errors.insert("activityLevel".to_string(), "activityLevel is required".to_string());
    }
    if request.goal.is_none() {
        errors.insert("goal".to_string(), "goal is required".to_string());
    }

    match (request.gender, request.activity_level, request.goal) {
        (Some(gender), Some(activity_level), Some(goal)) if errors.is_empty() => Ok(NewUserStatus {
            height_cm,
            weight_kg,
            goal_weight_kg,
            age,
            gender,
            activity_level,
            goal,
        }),
        _ => Err(Error::Validation(ValidationErrors::Multiple { fields: errors })),
    }
}

pub async fn update_status(conn: &mut DbConn, user_id: Uuid, request: UpdateStatusRequest) -> Result<UserStatus> {
    let status = validate_status(request)?;
    let stored = queries::status::upsert_status(conn, user_id, &status).await?;
    tracing::info!(user_id = %user_id, "Fitness status updated");
    Ok(stored)
}
