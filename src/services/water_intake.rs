use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    DbConn,
    error::Result,
    models::water::{UpdateWaterRequest, WaterIntakeResponse},
    queries,
    validation::validate_non_negative,
};

pub async fn get_intake(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<WaterIntakeResponse> {
    Ok(queries::water_intake::get_for_date(conn, user_id, date)
        .await?
        .map(WaterIntakeResponse::from)
        .unwrap_or_else(|| WaterIntakeResponse::empty(date)))
}

/// Replaces the day's total.
pub async fn set_intake(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
    request: UpdateWaterRequest,
) -> Result<WaterIntakeResponse> {
    validate_non_negative("litersDrank", request.liters_drank)?;
    let record = queries::water_intake::upsert_total(conn, user_id, date, request.liters_drank).await?;
    tracing::info!(user_id = %user_id, %date, liters = record.liters_drank, "Water intake set");
    Ok(record.into())
}
