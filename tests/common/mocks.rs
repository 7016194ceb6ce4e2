//! In-memory stand-ins for the chatbot collaborators.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fittrack::{
    error::{Error, Result},
    models::{
        dashboard::DailyTotals,
        meals::{MealItem, MealSlot, NewMealItem, NutritionFacts},
        water::WaterIntake,
    },
    services::{chatbot::DailyRecordStore, nutrition::NutritionLookup},
};
use uuid::Uuid;

/// Returns fixed calories per description, `None` for anything unknown.
pub struct StubNutrition {
    calories: HashMap<String, f64>,
}

impl StubNutrition {
    pub fn new(entries: &[(&str, f64)]) -> Self {
        Self {
            calories: entries
                .iter()
                .map(|(description, calories)| (description.to_string(), *calories))
                .collect(),
        }
    }
}

#[async_trait]
impl NutritionLookup for StubNutrition {
    async fn lookup(&self, description: &str) -> Result<Option<NutritionFacts>> {
        Ok(self.calories.get(description).map(|calories| NutritionFacts {
            calories: *calories,
            ..NutritionFacts::default()
        }))
    }
}

/// Never finds anything.
pub struct MissingNutrition;

#[async_trait]
impl NutritionLookup for MissingNutrition {
    async fn lookup(&self, _description: &str) -> Result<Option<NutritionFacts>> {
        Ok(None)
    }
}

/// Upstream always down.
pub struct FailingNutrition;

#[async_trait]
impl NutritionLookup for FailingNutrition {
    async fn lookup(&self, _description: &str) -> Result<Option<NutritionFacts>> {
        Err(Error::ExternalService("API Ninjas returned 500".to_string()))
    }
}

#[derive(Default)]
struct Records {
    meals: HashMap<(Uuid, NaiveDate), Vec<MealItem>>,
    water: HashMap<(Uuid, NaiveDate), WaterIntake>,
    burned: HashMap<(Uuid, NaiveDate), f64>,
}

/// Keeps daily records in memory with the same upsert semantics as the
/// Postgres store.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meal_items(&self, user_id: Uuid, date: NaiveDate) -> Vec<MealItem> {
        let records = self.records.lock().unwrap();
        records.meals.get(&(user_id, date)).cloned().unwrap_or_default()
    }

    pub fn water(&self, user_id: Uuid, date: NaiveDate) -> Option<f64> {
        let records = self.records.lock().unwrap();
        records.water.get(&(user_id, date)).map(|w| w.liters_drank)
    }

    pub fn set_burned(&self, user_id: Uuid, date: NaiveDate, calories: f64) {
        self.records.lock().unwrap().burned.insert((user_id, date), calories);
    }
}

#[async_trait]
impl DailyRecordStore for InMemoryRecordStore {
    async fn upsert_meal_item(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        slot: MealSlot,
        item: NewMealItem,
    ) -> Result<MealItem> {
        let saved = MealItem {
            id: Uuid::new_v4(),
            meal_plan_id: Uuid::nil(),
            slot,
            description: item.description,
            calories: item.facts.calories,
            protein_g: item.facts.protein_g,
            carbs_g: item.facts.carbs_g,
            fat_g: item.facts.fat_g,
            serving_size_g: item.facts.serving_size_g,
            created_at: Utc::now(),
        };
        let mut records = self.records.lock().unwrap();
        records.meals.entry((user_id, date)).or_default().push(saved.clone());
        Ok(saved)
    }

    async fn upsert_water_total(&self, user_id: Uuid, date: NaiveDate, liters: f64) -> Result<WaterIntake> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .water
            .entry((user_id, date))
            .and_modify(|record| {
                record.liters_drank = liters;
                record.updated_at = Utc::now();
            })
            .or_insert_with(|| WaterIntake {
                id: Uuid::new_v4(),
                user_id,
                date,
                liters_drank: liters,
                updated_at: Utc::now(),
            });
        Ok(record.clone())
    }

    async fn daily_totals(&self, user_id: Uuid, date: NaiveDate) -> Result<DailyTotals> {
        let records = self.records.lock().unwrap();
        let key = (user_id, date);
        Ok(DailyTotals {
            calories_consumed: records
                .meals
                .get(&key)
                .map(|items| items.iter().map(|item| item.calories).sum::<f64>())
                .unwrap_or(0.0),
            calories_burned: records.burned.get(&key).copied().unwrap_or(0.0),
            water_liters: records.water.get(&key).map(|w| w.liters_drank).unwrap_or(0.0),
        })
    }
}

/// Every write fails, as if the database were down.
pub struct FailingRecordStore;

#[async_trait]
impl DailyRecordStore for FailingRecordStore {
    async fn upsert_meal_item(
        &self,
        _user_id: Uuid,
        _date: NaiveDate,
        _slot: MealSlot,
        _item: NewMealItem,
    ) -> Result<MealItem> {
        Err(Error::Internal("connection refused".to_string()))
    }

    async fn upsert_water_total(&self, _user_id: Uuid, _date: NaiveDate, _liters: f64) -> Result<WaterIntake> {
        Err(Error::Internal("connection refused".to_string()))
    }

    async fn daily_totals(&self, _user_id: Uuid, _date: NaiveDate) -> Result<DailyTotals> {
        Err(Error::Internal("connection refused".to_string()))
    }
}
