use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::DbPool;
use crate::error::{Error, Result};
use crate::models::dashboard::DailyTotals;
use crate::models::meals::{MealItem, MealSlot, NewMealItem};
use crate::models::water::WaterIntake;
use crate::queries;

/// Per-user, per-day records written by the dialogue.
///
/// Implementations must make both writes atomic upserts keyed by
/// `(user_id, date)`: appending never drops a concurrently appended item and
/// the water total is a plain overwrite.
#[async_trait]
pub trait DailyRecordStore: Send + Sync {
    async fn upsert_meal_item(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        slot: MealSlot,
        item: NewMealItem,
    ) -> Result<MealItem>;

    async fn upsert_water_total(&self, user_id: Uuid, date: NaiveDate, liters: f64) -> Result<WaterIntake>;

    async fn daily_totals(&self, user_id: Uuid, date: NaiveDate) -> Result<DailyTotals>;
}

/// Postgres-backed store.
pub struct PgDailyRecordStore {
    pool: DbPool,
}

impl PgDailyRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyRecordStore for PgDailyRecordStore {
    async fn upsert_meal_item(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        slot: MealSlot,
        item: NewMealItem,
    ) -> Result<MealItem> {
        let mut conn = self.pool.acquire().await.map_err(Error::Sqlx)?;
        queries::meal_plans::append_item(&mut conn, user_id, date, slot, &item).await
    }

    async fn upsert_water_total(&self, user_id: Uuid, date: NaiveDate, liters: f64) -> Result<WaterIntake> {
        let mut conn = self.pool.acquire().await.map_err(Error::Sqlx)?;
        queries::water_intake::upsert_total(&mut conn, user_id, date, liters).await
    }

    async fn daily_totals(&self, user_id: Uuid, date: NaiveDate) -> Result<DailyTotals> {
        let mut conn = self.pool.acquire().await.map_err(Error::Sqlx)?;
        let calories_consumed = queries::meal_plans::total_calories(&mut conn, user_id, date).await?;
        let calories_burned = queries::workouts::total_calories_burned(&mut conn, user_id, date).await?;
        let water_liters = queries::water_intake::get_for_date(&mut conn, user_id, date)
            .await?
            .map(|record| record.liters_drank)
            .unwrap_or(0.0);

        Ok(DailyTotals {
            calories_consumed,
            calories_burned,
            water_liters,
        })
    }
}
