pub mod admin;
pub mod chatbot;
pub mod cookies;
pub mod dashboard;
pub mod google_calendar;
pub mod jwt;
pub mod meal_plans;
pub mod nutrition;
pub mod status;
pub mod users;
pub mod water_intake;
pub mod workouts;
