use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WaterIntake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub liters_drank: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWaterRequest {
    pub liters_drank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntakeResponse {
    pub date: NaiveDate,
    pub liters_drank: f64,
    /// True when nothing has been recorded for the day yet.
    pub is_new: bool,
}

impl WaterIntakeResponse {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            liters_drank: 0.0,
            is_new: true,
        }
    }
}

impl From<WaterIntake> for WaterIntakeResponse {
    fn from(record: WaterIntake) -> Self {
        Self {
            date: record.date,
            liters_drank: record.liters_drank,
            is_new: false,
        }
    }
}
