//! API Ninjas client used for meal nutrition and workout calorie estimates.
//!
//! The dialogue engine and the meal/workout services only see the
//! [`NutritionLookup`] and [`ExerciseCaloriesLookup`] traits, so tests swap in
//! in-memory implementations.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::NutritionConfig;
use crate::error::{Error, Result};
use crate::models::meals::NutritionFacts;

/// Header carrying the API Ninjas key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Accepted body-weight range (pounds) of the calories-burned endpoint.
const MIN_WEIGHT_LB: f64 = 50.0;
const MAX_WEIGHT_LB: f64 = 500.0;
const LB_PER_KG: f64 = 2.204_622_6;

/// Resolves a free-text food description to nutrition values.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    /// `Ok(None)` when the description matched nothing.
    async fn lookup(&self, description: &str) -> Result<Option<NutritionFacts>>;
}

/// Estimates calories burned by an activity.
#[async_trait]
pub trait ExerciseCaloriesLookup: Send + Sync {
    /// `Ok(None)` when the activity matched nothing.
    async fn calories_burned(&self, activity: &str, duration_min: i32, weight_kg: f64) -> Result<Option<f64>>;
}

pub struct ApiNinjasClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl ApiNinjasClient {
    pub fn new(config: &NutritionConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or_else(|| Error::ServiceUnavailable("Nutrition API is not configured".to_string()))
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = self.api_key()?;
        let url = url::Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint), params)
            .map_err(|e| Error::Internal(format!("Invalid API Ninjas URL: {}", e)))?;

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = %status, "API Ninjas request failed");
            return Err(Error::ExternalService(format!(
                "API Ninjas {} returned {}",
                endpoint, status
            )));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Raw `/nutrition` response, proxied to the client unchanged.
    pub async fn nutrition_raw(&self, query: &str) -> Result<Value> {
        self.get_json("nutrition", &[("query", query.to_string())]).await
    }

    /// Raw `/caloriesburned` response, proxied to the client unchanged.
    pub async fn calories_burned_raw(
        &self,
        activity: &str,
        weight_lb: Option<f64>,
        duration_min: Option<i32>,
    ) -> Result<Value> {
        let mut params = vec![("activity", activity.to_string())];
        if let Some(weight) = weight_lb {
            params.push(("weight", format!("{:.0}", weight)));
        }
        if let Some(duration) = duration_min {
            params.push(("duration", duration.to_string()));
        }
        self.get_json("caloriesburned", &params).await
    }
}

#[async_trait]
impl NutritionLookup for ApiNinjasClient {
    async fn lookup(&self, description: &str) -> Result<Option<NutritionFacts>> {
        let body = self.nutrition_raw(description).await?;
        Ok(facts_from_response(&body))
    }
}

#[async_trait]
impl ExerciseCaloriesLookup for ApiNinjasClient {
    async fn calories_burned(&self, activity: &str, duration_min: i32, weight_kg: f64) -> Result<Option<f64>> {
        let body = self
            .calories_burned_raw(activity, Some(kg_to_lb(weight_kg)), Some(duration_min))
            .await?;
        Ok(burned_from_response(&body))
    }
}

fn number(item: &Value, key: &str) -> f64 {
    // Premium-only fields come back as strings on the free tier
    item.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Sums every matched item. A multi-food description ("2 eggs and toast")
/// yields one item per food.
///
/// `None` when nothing matched or no item carries numeric calories, so
/// callers treat a free-tier placeholder like a miss.
pub fn facts_from_response(body: &Value) -> Option<NutritionFacts> {
    let items = body.as_array()?;
    if !items
        .iter()
        .any(|item| item.get("calories").is_some_and(Value::is_number))
    {
        return None;
    }

    let facts = items.iter().fold(NutritionFacts::default(), |acc, item| NutritionFacts {
        calories: acc.calories + number(item, "calories"),
        protein_g: acc.protein_g + number(item, "protein_g"),
        carbs_g: acc.carbs_g + number(item, "carbohydrates_total_g"),
        fat_g: acc.fat_g + number(item, "fat_total_g"),
        serving_size_g: acc.serving_size_g + number(item, "serving_size_g"),
    });
    Some(facts)
}

/// Takes the best (first) match; later entries are variants of the same
/// activity, not additional ones.
pub fn burned_from_response(body: &Value) -> Option<f64> {
    body.as_array()?
        .first()
        .and_then(|item| item.get("total_calories"))
        .and_then(Value::as_f64)
}

/// Converts kilograms to the clamped pound value the API accepts.
pub fn kg_to_lb(weight_kg: f64) -> f64 {
    (weight_kg * LB_PER_KG).clamp(MIN_WEIGHT_LB, MAX_WEIGHT_LB)
}
