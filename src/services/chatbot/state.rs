//! Dialogue state identifiers.
//!
//! State names travel to the client and back on every turn, so their string
//! form (`MAIN_MENU`, `LOG_WATER_START`, ...) is part of the wire protocol.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Every state of the member and guest dialogues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatState {
    // Member dialogue
    MainMenu,
    LogMealStart,
    LogMealDetails,
    SaveMeal,
    LogMealConfirm,
    LogWaterStart,
    SaveWater,
    LogWaterConfirm,
    LogWaterInvalid,
    ViewToday,
    TodaySummary,
    Error,

    // Guest dialogue
    GuestWelcome,
    GuestFeatures,
    GuestGettingStarted,
    GuestError,
}

/// Which dialogue a request belongs to, decided by whether it carries an
/// authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Audience {
    Member,
    Guest,
}

impl Audience {
    /// State shown when a conversation starts or resumes without input.
    pub fn entry_state(self) -> ChatState {
        match self {
            Audience::Member => ChatState::MainMenu,
            Audience::Guest => ChatState::GuestWelcome,
        }
    }

    /// Fallback for anything the dialogue cannot resolve.
    pub fn error_state(self) -> ChatState {
        match self {
            Audience::Member => ChatState::Error,
            Audience::Guest => ChatState::GuestError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_wire_names() {
        assert_eq!(ChatState::LogWaterInvalid.to_string(), "LOG_WATER_INVALID");
        assert_eq!(ChatState::from_str("GUEST_WELCOME").unwrap(), ChatState::GuestWelcome);
        assert_eq!(
            serde_json::to_value(ChatState::TodaySummary).unwrap(),
            serde_json::json!("TODAY_SUMMARY")
        );
        assert!(ChatState::from_str("INITIAL").is_err());
    }

    #[test]
    fn test_audience_roots() {
        assert_eq!(Audience::Member.entry_state(), ChatState::MainMenu);
        assert_eq!(Audience::Guest.entry_state(), ChatState::GuestWelcome);
        assert_eq!(Audience::Member.error_state(), ChatState::Error);
        assert_eq!(Audience::Guest.error_state(), ChatState::GuestError);
    }
}
