//! Side effects of the action states. Each action reports failures as a
//! user-facing message instead of an error so the dialogue always completes.

use std::str::FromStr;

use super::context::{keys, Context};
use super::engine::{ChatIdentity, DialogueEngine};
use super::table::Action;
use crate::models::meals::{MealSlot, NewMealItem, NutritionFacts};

const NOT_FOUND_WARNING: &str =
    "I couldn't find nutrition info for that, so it was logged with 0 calories. You can edit it in your meal plan.";
const LOOKUP_FAILED_WARNING: &str =
    "The nutrition lookup isn't available right now, so it was logged with 0 calories. You can edit it in your meal plan.";

impl DialogueEngine {
    pub(super) async fn run_action(
        &self,
        action: Action,
        identity: &ChatIdentity,
        context: &mut Context,
    ) -> Result<(), String> {
        match action {
            Action::SaveMeal => self.save_meal(identity, context).await,
            Action::SaveWater => self.save_water(identity, context).await,
            Action::LoadTodaySummary => self.load_today_summary(identity, context).await,
        }
    }

    async fn save_meal(&self, identity: &ChatIdentity, context: &mut Context) -> Result<(), String> {
        let slot = context
            .get_str(keys::MEAL_TYPE)
            .and_then(|value| MealSlot::from_str(value).ok())
            .ok_or_else(|| "I lost track of which meal you were logging. Let's start over.".to_string())?;
        let description = context
            .get_str(keys::FOOD_DESCRIPTION)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| "I didn't catch what you ate. Let's start over.".to_string())?;

        let (facts, warning) = match self.nutrition.lookup(&description).await {
            Ok(Some(facts)) => (facts, None),
            Ok(None) => (NutritionFacts::default(), Some(NOT_FOUND_WARNING)),
            Err(e) => {
                tracing::warn!(error = %e, "[Chatbot] Nutrition lookup failed");
                (NutritionFacts::default(), Some(LOOKUP_FAILED_WARNING))
            }
        };

        let item = NewMealItem { description, facts };
        match self
            .records
            .upsert_meal_item(identity.user_id, self.today(), slot, item)
            .await
        {
            Ok(saved) => {
                tracing::info!(
                    user_id = %identity.user_id,
                    slot = %slot,
                    calories = saved.calories,
                    "[Chatbot] Meal item logged"
                );
                context.set(keys::CALORIES, saved.calories);
                if let Some(warning) = warning {
                    context.set(keys::WARNING, warning);
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id = %identity.user_id, error = %e, "[Chatbot] Failed to save meal item");
                Err(format!(
                    "Sorry, I couldn't save your {} to your meal plan. Please try again.",
                    slot.label().to_lowercase()
                ))
            }
        }
    }

    async fn save_water(&self, identity: &ChatIdentity, context: &mut Context) -> Result<(), String> {
        let liters = context
            .get_f64(keys::LITERS)
            .filter(|liters| liters.is_finite() && *liters > 0.0)
            .ok_or_else(|| "I didn't catch how much water you had. Let's start over.".to_string())?;

        match self
            .records
            .upsert_water_total(identity.user_id, self.today(), liters)
            .await
        {
            Ok(saved) => {
                tracing::info!(user_id = %identity.user_id, liters = saved.liters_drank, "[Chatbot] Water total set");
                context.set(keys::LITERS, saved.liters_drank);
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id = %identity.user_id, error = %e, "[Chatbot] Failed to save water intake");
                Err("Sorry, I couldn't save your water intake. Please try again.".to_string())
            }
        }
    }

    async fn load_today_summary(&self, identity: &ChatIdentity, context: &mut Context) -> Result<(), String> {
        match self.records.daily_totals(identity.user_id, self.today()).await {
            Ok(totals) => {
                context.set(keys::CALORIES_CONSUMED, totals.calories_consumed.round());
                context.set(keys::CALORIES_BURNED, totals.calories_burned.round());
                context.set(keys::WATER_LITERS, totals.water_liters);
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id = %identity.user_id, error = %e, "[Chatbot] Failed to load daily totals");
                Err("Sorry, I couldn't load today's summary. Please try again.".to_string())
            }
        }
    }
}
