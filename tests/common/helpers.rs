//! Shared test helper functions

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use fittrack::services::chatbot::ChatIdentity;
use uuid::Uuid;

/// Generates a unique test email using nanosecond timestamp
pub fn generate_test_email() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}_{}@example.com", timestamp, Uuid::new_v4().simple())
}

/// Day used by engines built with `with_clock(fixed_today)`.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn member() -> ChatIdentity {
    member_named("Alex")
}

pub fn member_named(name: &str) -> ChatIdentity {
    ChatIdentity {
        user_id: Uuid::new_v4(),
        display_name: name.to_string(),
    }
}
