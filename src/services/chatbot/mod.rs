//! Scripted FitTrack assistant.
//!
//! # Architecture
//!
//! - **States** ([ChatState]): wire names of every dialogue step, split into a
//!   member dialogue rooted at `MAIN_MENU` and a guest one rooted at
//!   `GUEST_WELCOME`
//! - **Table** ([STATE_TABLE]): immutable definitions of prompts, options,
//!   free-text rules and action states
//! - **Engine** ([DialogueEngine]): resolve-then-loop-then-render over the table
//! - **Context** ([Context]): the key/value bag the client echoes each turn
//!
//! No conversation state lives on the server; the client sends back the state
//! name and context it last received.
//!
//! ```text
//! MAIN_MENU ──Log Meal──> LOG_MEAL_START ──Lunch──> LOG_MEAL_DETAILS ──text──> [SAVE_MEAL] ──> LOG_MEAL_CONFIRM
//!     │
//!     ├──Log Water──> LOG_WATER_START ──"1.5"──> [SAVE_WATER] ──> LOG_WATER_CONFIRM
//!     │                     └──"abc"──> LOG_WATER_INVALID
//!     └──View Today's Summary──> [VIEW_TODAY] ──> TODAY_SUMMARY
//! ```

mod actions;
pub mod context;
pub mod engine;
pub mod state;
pub mod store;
pub mod table;

pub use context::Context;
pub use engine::{ChatIdentity, DialogueEngine, OptionView, TransitionRequest, TransitionResponse};
pub use state::{Audience, ChatState};
pub use store::{DailyRecordStore, PgDailyRecordStore};
pub use table::{StateTable, STATE_TABLE};
