use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::engine::ChatIdentity;

/// Well-known context keys.
pub mod keys {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const USER_ID: &str = "userId";
    pub const MEAL_TYPE: &str = "mealType";
    pub const USER_INPUT: &str = "userInput";
    pub const FOOD_DESCRIPTION: &str = "foodDescription";
    pub const CALORIES: &str = "calories";
    pub const LITERS: &str = "liters";
    pub const CALORIES_CONSUMED: &str = "caloriesConsumed";
    pub const CALORIES_BURNED: &str = "caloriesBurned";
    pub const WATER_LITERS: &str = "waterLiters";
    pub const WARNING: &str = "warning";
    pub const ERROR_MESSAGE: &str = "errorMessage";
}

/// Keys only the server may set.
const IDENTITY_KEYS: [&str; 2] = [keys::DISPLAY_NAME, keys::USER_ID];

/// Keys that describe a single turn and must not leak into the next one.
const TRANSIENT_KEYS: [&str; 3] = [keys::USER_INPUT, keys::WARNING, keys::ERROR_MESSAGE];

pub const GUEST_NAME: &str = "Guest";

/// Key/value bag threaded through one dialogue turn and echoed by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the context from what the client echoed, dropping anything it
    /// must not control and stamping the trusted identity.
    pub fn from_carried(carried: Context, identity: Option<&ChatIdentity>) -> Self {
        let mut context = carried;
        for key in IDENTITY_KEYS.iter().chain(TRANSIENT_KEYS.iter()) {
            context.0.remove(*key);
        }

        match identity {
            Some(identity) => {
                context.set(keys::DISPLAY_NAME, identity.display_name.as_str());
                context.set(keys::USER_ID, identity.user_id.to_string());
            }
            None => context.set(keys::DISPLAY_NAME, GUEST_NAME),
        }
        context
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numbers, or numeric strings the client may have re-encoded.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Display name for prompts.
    pub fn display_name(&self) -> &str {
        self.get_str(keys::DISPLAY_NAME).unwrap_or(GUEST_NAME)
    }
}

/// Formats a quantity without trailing zeros: `2`, `1.5`, `0.25`.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}
