pub mod admin;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod external;
pub mod google_calendar;
pub mod health;
pub mod meal_plans;
pub mod profile;
pub mod water_intake;
pub mod workouts;

pub use auth::{login, logout, register};
pub use chat::post_message;
pub use health::health_check;
