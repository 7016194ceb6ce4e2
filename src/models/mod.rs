pub mod calendar;
pub mod dashboard;
pub mod meals;
pub mod status;
pub mod users;
pub mod water;
pub mod workouts;
