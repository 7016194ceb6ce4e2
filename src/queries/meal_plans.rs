use chrono::NaiveDate;
use sqlx::Postgres;
use uuid::Uuid;

use crate::{
    error::Result,
    models::meals::{MealItem, MealSlot, NewMealItem},
    DbConn,
};

const ITEM_COLUMNS: &str = "id, meal_plan_id, slot, description, calories, protein_g, carbs_g, fat_g, serving_size_g, created_at";

/// Appends an item to the user's plan for `date`, creating the plan if needed.
///
/// Runs as a single statement so concurrent appends to the same day never
/// drop each other's items.
pub async fn append_item(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
    slot: MealSlot,
    item: &NewMealItem,
) -> Result<MealItem> {
    let sql = format!(
        r#"
        WITH plan AS (
            INSERT INTO meal_plans (user_id, date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, date) DO UPDATE SET updated_at = now()
            RETURNING id
        )
        INSERT INTO meal_items
            (meal_plan_id, slot, description, calories, protein_g, carbs_g, fat_g, serving_size_g)
        SELECT plan.id, $3, $4, $5::float8, $6::float8, $7::float8, $8::float8, $9::float8
        FROM plan
        RETURNING {}
        "#,
        ITEM_COLUMNS
    );
    let stored = sqlx::query_as::<Postgres, MealItem>(&sql)
        .bind(user_id)
        .bind(date)
        .bind(slot)
        .bind(&item.description)
        .bind(item.facts.calories)
        .bind(item.facts.protein_g)
        .bind(item.facts.carbs_g)
        .bind(item.facts.fat_g)
        .bind(item.facts.serving_size_g)
        .fetch_one(conn)
        .await?;
    Ok(stored)
}

/// All items logged by the user on `date`, oldest first.
pub async fn list_items_for_date(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<Vec<MealItem>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM meal_items
        WHERE meal_plan_id = (SELECT id FROM meal_plans WHERE user_id = $1 AND date = $2)
        ORDER BY created_at, id
        "#,
        ITEM_COLUMNS
    );
    let items = sqlx::query_as::<Postgres, MealItem>(&sql)
        .bind(user_id)
        .bind(date)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Deletes an item only if it belongs to the user's plan for `date`.
pub async fn delete_item(conn: &mut DbConn, user_id: Uuid, date: NaiveDate, item_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM meal_items
        WHERE id = $3
          AND meal_plan_id = (SELECT id FROM meal_plans WHERE user_id = $1 AND date = $2)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Sum of calories logged on `date`.
pub async fn total_calories(conn: &mut DbConn, user_id: Uuid, date: NaiveDate) -> Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(i.calories), 0)::float8
        FROM meal_items i
        JOIN meal_plans p ON p.id = i.meal_plan_id
        WHERE p.user_id = $1 AND p.date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(conn)
    .await?;
    Ok(total)
}
