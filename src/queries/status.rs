use sqlx::Postgres;
use uuid::Uuid;

use crate::{
    error::Result,
    models::status::{NewUserStatus, UserStatus},
    DbConn,
};

const STATUS_COLUMNS: &str =
    "user_id, height_cm, weight_kg, goal_weight_kg, age, gender, activity_level, goal, updated_at";

pub async fn get_status(conn: &mut DbConn, user_id: Uuid) -> Result<Option<UserStatus>> {
    let sql = format!("SELECT {} FROM user_statuses WHERE user_id = $1", STATUS_COLUMNS);
    let status = sqlx::query_as::<Postgres, UserStatus>(&sql)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(status)
}

/// Inserts or replaces the user's body metrics.
pub async fn upsert_status(conn: &mut DbConn, user_id: Uuid, status: &NewUserStatus) -> Result<UserStatus> {
    let sql = format!(
        r#"
        INSERT INTO user_statuses
            (user_id, height_cm, weight_kg, goal_weight_kg, age, gender, activity_level, goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            height_cm = EXCLUDED.height_cm,
            weight_kg = EXCLUDED.weight_kg,
            goal_weight_kg = EXCLUDED.goal_weight_kg,
            age = EXCLUDED.age,
            gender = EXCLUDED.gender,
            activity_level = EXCLUDED.activity_level,
            goal = EXCLUDED.goal,
            updated_at = now()
        RETURNING {}
        "#,
        STATUS_COLUMNS
    );
    let stored = sqlx::query_as::<Postgres, UserStatus>(&sql)
        .bind(user_id)
        .bind(status.height_cm)
        .bind(status.weight_kg)
        .bind(status.goal_weight_kg)
        .bind(status.age)
        .bind(status.gender)
        .bind(status.activity_level)
        .bind(status.goal)
        .fetch_one(conn)
        .await?;
    Ok(stored)
}
