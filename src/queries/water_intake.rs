use chrono::NaiveDate;
use sqlx::Postgres;
use uuid::Uuid;

use crate::{error::Result, models::water::WaterIntake, DbConn};

pub async fn get_for_date(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<Option<WaterIntake>> {
    let record = sqlx::query_as::<Postgres, WaterIntake>(
        "SELECT id, user_id, date, liters_drank, updated_at FROM water_intakes WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

/// Sets the day's total, replacing any earlier value.
pub async fn upsert_total(conn: &mut DbConn, user_id: Uuid, date: NaiveDate, liters: f64) -> Result<WaterIntake> {
    let record = sqlx::query_as::<Postgres, WaterIntake>(
        r#"
        INSERT INTO water_intakes (user_id, date, liters_drank)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, date) DO UPDATE
            SET liters_drank = EXCLUDED.liters_drank, updated_at = now()
        RETURNING id, user_id, date, liters_drank, updated_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(liters)
    .fetch_one(conn)
    .await?;
    Ok(record)
}
