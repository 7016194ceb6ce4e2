use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    DbConn,
    error::Result,
    models::dashboard::{Goals, TodayProgress, TodaySummary},
    models::status::{Gender, UserStatus},
    queries,
};

/// Goal used until the user records a fitness status.
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Basal metabolic rate from the revised Harris-Benedict equation.
pub fn basal_metabolic_rate(status: &UserStatus) -> f64 {
    let weight = status.weight_kg;
    let height = status.height_cm;
    let age = f64::from(status.age);
    match status.gender {
        Gender::Male => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight + 3.098 * height - 4.330 * age,
    }
}

/// Daily calorie goal: BMR scaled by activity, shifted by the fitness goal.
pub fn calorie_goal(status: Option<&UserStatus>) -> f64 {
    match status {
        Some(status) => {
            basal_metabolic_rate(status) * status.activity_level.multiplier()
                + status.goal.calorie_adjustment()
        }
        None => DEFAULT_CALORIE_GOAL,
    }
}

pub async fn today_summary(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<TodaySummary> {
    let status = queries::status::get_status(conn, user_id).await?;
    let meals = queries::meal_plans::list_items_for_date(conn, user_id, date).await?;
    let workouts = queries::workouts::list_exercises_for_date(conn, user_id, date).await?;
    let water = queries::water_intake::get_for_date(conn, user_id, date).await?;

    let goal = calorie_goal(status.as_ref());
    let consumed: f64 = meals.iter().map(|item| item.calories).sum();
    let burned: f64 = workouts.iter().map(|exercise| exercise.calories_burned).sum();

    Ok(TodaySummary {
        goals: Goals {
            calorie_goal: goal.round() as i64,
        },
        today: TodayProgress {
            calories_consumed: consumed.round() as i64,
            calories_burned: burned.round() as i64,
            calories_left: (goal - consumed + burned).round() as i64,
            water_intake_liters: water.map(|record| record.liters_drank).unwrap_or(0.0),
            meals,
            workouts,
        },
    })
}
