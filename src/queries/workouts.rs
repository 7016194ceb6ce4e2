use chrono::NaiveDate;
use sqlx::Postgres;
use uuid::Uuid;

use crate::{
    error::Result,
    models::workouts::{Exercise, NewExercise},
    DbConn,
};

const EXERCISE_COLUMNS: &str = "id, workout_log_id, name, duration_min, calories_burned, notes, created_at";

/// Adds an exercise to the user's log for `date`, creating the log if needed.
pub async fn append_exercise(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
    exercise: &NewExercise,
) -> Result<Exercise> {
    let sql = format!(
        r#"
        WITH log AS (
            INSERT INTO workout_logs (user_id, date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, date) DO UPDATE SET updated_at = now()
            RETURNING id
        )
        INSERT INTO exercises (workout_log_id, name, duration_min, calories_burned, notes)
        SELECT log.id, $3, $4::int4, $5::float8, $6 FROM log
        RETURNING {}
        "#,
        EXERCISE_COLUMNS
    );
    let stored = sqlx::query_as::<Postgres, Exercise>(&sql)
        .bind(user_id)
        .bind(date)
        .bind(&exercise.name)
        .bind(exercise.duration_min)
        .bind(exercise.calories_burned)
        .bind(&exercise.notes)
        .fetch_one(conn)
        .await?;
    Ok(stored)
}

pub async fn list_exercises_for_date(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<Vec<Exercise>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM exercises
        WHERE workout_log_id = (SELECT id FROM workout_logs WHERE user_id = $1 AND date = $2)
        ORDER BY created_at, id
        "#,
        EXERCISE_COLUMNS
    );
    let exercises = sqlx::query_as::<Postgres, Exercise>(&sql)
        .bind(user_id)
        .bind(date)
        .fetch_all(conn)
        .await?;
    Ok(exercises)
}

/// Finds an exercise owned by the user on `date`.
pub async fn get_exercise(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
    exercise_id: Uuid,
) -> Result<Option<Exercise>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM exercises
        WHERE id = $3
          AND workout_log_id = (SELECT id FROM workout_logs WHERE user_id = $1 AND date = $2)
        "#,
        EXERCISE_COLUMNS
    );
    let exercise = sqlx::query_as::<Postgres, Exercise>(&sql)
        .bind(user_id)
        .bind(date)
        .bind(exercise_id)
        .fetch_optional(conn)
        .await?;
    Ok(exercise)
}

pub async fn update_exercise(conn: &mut DbConn, exercise_id: Uuid, exercise: &NewExercise) -> Result<Exercise> {
    let sql = format!(
        r#"
        UPDATE exercises
        SET name = $2, duration_min = $3, calories_burned = $4, notes = $5
        WHERE id = $1
        RETURNING {}
        "#,
        EXERCISE_COLUMNS
    );
    let stored = sqlx::query_as::<Postgres, Exercise>(&sql)
        .bind(exercise_id)
        .bind(&exercise.name)
        .bind(exercise.duration_min)
        .bind(exercise.calories_burned)
        .bind(&exercise.notes)
        .fetch_one(conn)
        .await?;
    Ok(stored)
}

pub async fn delete_exercise(conn: &mut DbConn, user_id: Uuid, date: NaiveDate, exercise_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM exercises
        WHERE id = $3
          AND workout_log_id = (SELECT id FROM workout_logs WHERE user_id = $1 AND date = $2)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(exercise_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Sum of calories burned on `date`.
pub async fn total_calories_burned(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(e.calories_burned), 0)::float8
        FROM exercises e
        JOIN workout_logs w ON w.id = e.workout_log_id
        WHERE w.user_id = $1 AND w.date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(conn)
    .await?;
    Ok(total)
}
