use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::workouts::{CreateExerciseRequest, Exercise, UpdateExerciseRequest, WorkoutLogResponse},
    services::workouts,
    state::AppState,
    utils::parse_date,
};

/// GET /api/workouts/{date}
pub async fn get_workout_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> Result<Json<WorkoutLogResponse>> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(workouts::get_log(&mut conn, user.id, date).await?))
}

/// POST /api/workouts/{date}
///
/// Logs an exercise. Calories burned are estimated from the activity name,
/// duration and the user's weight; 0 when no estimate is available.
///
/// # HTTP Status Codes
/// - `201 CREATED`: Exercise logged
/// - `400 BAD_REQUEST`: Invalid date, empty name or non-positive duration
pub async fn add_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
    Json(request): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>)> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let exercise = workouts::add_exercise(
        &mut conn,
        state.nutrition.as_ref(),
        state.config.nutrition.default_weight_kg,
        user.id,
        date,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

/// PUT /api/workouts/{date}/{exercise_id}
pub async fn update_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((date, exercise_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateExerciseRequest>,
) -> Result<Json<Exercise>> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let exercise = workouts::update_exercise(
        &mut conn,
        state.nutrition.as_ref(),
        state.config.nutrition.default_weight_kg,
        user.id,
        date,
        exercise_id,
        request,
    )
    .await?;
    Ok(Json(exercise))
}

/// DELETE /api/workouts/{date}/{exercise_id}
pub async fn delete_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((date, exercise_id)): Path<(String, Uuid)>,
) -> Result<StatusCode> {
    let date = parse_date(&date)?;
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    workouts::remove_exercise(&mut conn, user.id, date, exercise_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
