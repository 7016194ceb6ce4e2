pub mod calendar;
pub mod meal_plans;
pub mod status;
pub mod users;
pub mod water_intake;
pub mod workouts;
